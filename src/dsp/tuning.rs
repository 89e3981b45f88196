//! Equal-tempered pitch mapping.
//!
//! The keyboard's sixteen keys index directly into an equal-tempered scale
//! anchored at A2. Each semitone multiplies the frequency by 2^(1/12), so
//! key id 12 lands exactly one octave above key id 0. Instruments reach
//! their harmonic partials by offsetting the key id in whole octaves
//! (+12, +24, ...) before converting.

/// Frequency of key id 0, the bottom of the keyboard (A2).
pub const OCTAVE_BASE_HZ: f64 = 220.0;

/// Convert a semitone index (key id plus any partial offset) to hertz.
#[inline]
pub fn pitch_hz(semitones: i32) -> f64 {
    OCTAVE_BASE_HZ * 2.0_f64.powf(f64::from(semitones) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octaves_double() {
        assert!((pitch_hz(0) - 220.0).abs() < 1e-9);
        assert!((pitch_hz(12) - 440.0).abs() < 1e-9);
        assert!((pitch_hz(24) - 880.0).abs() < 1e-9);
    }

    #[test]
    fn a_fifth_is_near_three_halves() {
        let ratio = pitch_hz(7) / pitch_hz(0);
        assert!((ratio - 1.4983).abs() < 1e-3);
    }
}
