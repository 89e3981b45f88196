use std::f64::consts::{FRAC_2_PI, FRAC_PI_2, PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Oscillator Bank
===============

Pure waveform functions: given a time and a frequency, produce one sample.
All state lives in the caller's timestamps, so any voice can evaluate any
waveform at any instant - the same property the envelope relies on.

Waveform Character
------------------

Sine: the purest tone, fundamental only.
  - Sound: smooth, hollow, flute-like
  - Use here: bell partials

Square: odd harmonics falling off as 1/n.
  - Sound: hollow, woody, reedy
  - Use here: harmonica partials

Triangle: odd harmonics falling off as 1/n² - much softer than square.

SawAdditive: all harmonics, built by literally summing 99 sine partials at
  1/k amplitude. Band-limited by construction, so it stays clean at high
  pitches; costs 99 sin() calls per sample. The harmonic count is a fixed
  fidelity/cost tradeoff, not derived from the sample rate.

Saw: the same shape from the closed-form ramp - one fmod instead of 99
  transcendentals. The cheap form ignores the vibrato LFO: only the scalar
  frequency enters the ramp, never the modulated phase. That asymmetry with
  the other waveforms is audible and intentional; don't "fix" it.

Noise: uniform random in [-1, 1], independent of time and frequency. The
  one waveform exempt from purity - two identical calls need not match.

Vibrato
-------

Frequency modulation is folded into the phase before the waveform shape is
applied:

    phase = 2π·hertz·time + lfo_depth·hertz·sin(2π·lfo_hertz·time)

A depth of 0.001 at 5 Hz is a gentle, musical wobble. Depth scales with the
carrier frequency so vibrato width is constant in pitch, not in hertz.

Output range is approximately [-1, 1]; SawAdditive and Saw can overshoot
slightly by construction and are NOT post-clamped here - hard limiting is
the mixer's job, once, after summation.
*/

/// Number of sine partials summed for [`Waveform::SawAdditive`].
pub const SAW_HARMONICS: u32 = 99;

/// The closed set of waveform shapes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    SawAdditive,
    Saw,
    Noise,
}

/// Sample a waveform with no vibrato.
#[inline]
pub fn sample(time: f64, hertz: f64, waveform: Waveform) -> f64 {
    sample_lfo(time, hertz, waveform, 0.0, 0.0)
}

/// Sample a waveform with vibrato (frequency-modulated phase).
///
/// `lfo_hertz` is the vibrato rate, `lfo_depth` its width relative to the
/// carrier frequency. Zero depth reduces to the unmodulated waveform.
#[inline]
pub fn sample_lfo(
    time: f64,
    hertz: f64,
    waveform: Waveform,
    lfo_hertz: f64,
    lfo_depth: f64,
) -> f64 {
    let phase = TAU * hertz * time + lfo_depth * hertz * (TAU * lfo_hertz * time).sin();

    match waveform {
        Waveform::Sine => phase.sin(),

        // Total mapping: sin(phase) == 0.0 lands on +1.
        Waveform::Square => {
            if phase.sin() >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }

        Waveform::Triangle => phase.sin().asin() * FRAC_2_PI,

        Waveform::SawAdditive => {
            let mut total = 0.0;
            for k in 1..=SAW_HARMONICS {
                let k = f64::from(k);
                total += (k * phase).sin() / k;
            }
            total * FRAC_2_PI
        }

        // Closed-form ramp on the raw frequency; the modulated phase above
        // deliberately does not participate.
        Waveform::Saw => FRAC_2_PI * (hertz * PI * (time % (1.0 / hertz)) - FRAC_PI_2),

        Waveform::Noise => fastrand::f64() * 2.0 - 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    // 1 kHz sweep points spread over a few carrier cycles.
    fn sweep() -> impl Iterator<Item = f64> {
        (0..1_000).map(|i| i as f64 * 3.7e-5)
    }

    #[test]
    fn sine_matches_reference_phase() {
        for t in sweep() {
            let expected = (TAU * 440.0 * t).sin();
            let actual = sample(t, 440.0, Waveform::Sine);
            assert!((actual - expected).abs() < 1e-12, "at t={t}");
        }
    }

    #[test]
    fn sine_stays_in_unit_range() {
        for t in sweep() {
            let s = sample(t, 440.0, Waveform::Sine);
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn square_is_exactly_bipolar() {
        for t in sweep() {
            let s = sample(t, 220.0, Waveform::Square);
            assert!(s == 1.0 || s == -1.0, "square produced {s} at t={t}");
        }
        // The zero-crossing itself maps to +1, keeping the function total.
        assert_eq!(sample(0.0, 220.0, Waveform::Square), 1.0);
    }

    #[test]
    fn triangle_stays_in_unit_range() {
        for t in sweep() {
            let s = sample(t, 330.0, Waveform::Triangle);
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn saw_is_periodic_in_the_carrier() {
        let hertz = 110.0;
        let period = 1.0 / hertz;
        for t in sweep() {
            let a = sample(t, hertz, Waveform::Saw);
            let b = sample(t + period, hertz, Waveform::Saw);
            assert!((a - b).abs() < 1e-9, "saw not periodic at t={t}");
        }
    }

    #[test]
    fn saw_ignores_vibrato() {
        for t in sweep() {
            let plain = sample(t, 110.0, Waveform::Saw);
            let wobbled = sample_lfo(t, 110.0, Waveform::Saw, 5.0, 0.3);
            assert_eq!(plain, wobbled);
        }
    }

    #[test]
    fn vibrato_bends_the_other_waveforms() {
        // At a quarter LFO cycle the modulation term peaks; the sine must
        // read differently from its unmodulated twin somewhere in the sweep.
        let bent = sweep().any(|t| {
            let plain = sample(t, 440.0, Waveform::Sine);
            let wobbled = sample_lfo(t, 440.0, Waveform::Sine, 5.0, 0.001);
            (plain - wobbled).abs() > 1e-9
        });
        assert!(bent);
    }

    #[test]
    fn additive_saw_approximates_the_ramp() {
        // The Fourier sum ramps downward while the closed form ramps upward,
        // so away from the discontinuity the two agree up to sign.
        let hertz = 110.0;
        for &t in &[0.2 / hertz, 0.5 / hertz, 0.8 / hertz] {
            let additive = sample(t, hertz, Waveform::SawAdditive);
            let ramp = sample(t, hertz, Waveform::Saw);
            assert!(
                (additive + ramp).abs() < 0.05,
                "additive {additive} vs ramp {ramp} at t={t}"
            );
        }
    }

    #[test]
    fn noise_stays_in_unit_range() {
        for t in sweep().take(200) {
            let s = sample(t, 440.0, Waveform::Noise);
            assert!((-1.0..=1.0).contains(&s));
        }
    }
}
