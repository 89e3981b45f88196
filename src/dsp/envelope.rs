use crate::MIN_TIME;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Timestamp-Driven ADSR Envelope
==============================

This module implements a linear ADSR envelope evaluated purely from
timestamps - the amplitude control at the heart of every voice.

Vocabulary
----------

  amplitude   The envelope's output value (0.0 to 1.0). This multiplies the
              oscillator output to shape a voice's loudness over time.

  time_on     The moment (seconds on the shared clock) the key was last
              pressed for this voice.

  time_off    The moment the key was last released. 0.0 until the first
              release.

  life        Seconds elapsed since time_on. The held-phase formula is a
              function of life alone.

  held phase  Attack/decay/sustain. Encoded as time_on > time_off.

  release     The ramp to silence after key-up. Encoded as
              time_on <= time_off.


No State Machine, No State
--------------------------

Most envelope implementations run a mutable stage machine advanced once per
sample. This one holds only configuration. The phase is derived by COMPARING THE TWO
TIMESTAMPS, and the amplitude is recomputed from scratch on every call:

    amplitude(time, time_on, time_off) -> [0, 1]

Two calls with identical arguments give identical results. That purity is
load-bearing, not cosmetic: the release formula reconstructs where the held
phase WOULD have been at the instant of release, because nothing was cached
when the key went up. Retriggering a released note just moves time_on forward
- the comparison flips back to held and the same formula keeps working.


The Shape: Linear Ramps
-----------------------

  Amplitude
    start ┐    ╱╲
          │   ╱  ╲__________
  sustain │  ╱              ╲
          │ ╱                ╲
      0.0 └╱──────────────────╲──→ Time
          Attack Decay Sustain Release

Held phase, with life = time - time_on:

    life <= attack                 ramp 0 -> start_amp
    attack < life <= attack+decay  ramp start_amp -> sustain_amp
    life > attack+decay            hold sustain_amp

Release phase: evaluate the held formula at the CURRENT life to get the
release-start amplitude r, then ramp r -> 0 over release_time seconds
starting at time_off:

    amplitude = r + (time - time_off) / release_time * (0 - r)

Past the release window this goes negative; the epsilon snap below turns
that into exact silence. Callers must treat "amplitude reached 0 after a
release started" as the completion signal.


The Epsilon Snap
----------------

Any result at or below 1e-4 becomes exactly 0.0. This kills denormal noise
in the mix and gives voice reaping an unambiguous "this voice is silent"
signal. The top end is clamped to 1.0.
*/

/// Amplitudes at or below this snap to exactly zero.
pub const AMP_EPSILON: f64 = 1e-4;

/// Linear ADSR envelope configuration.
///
/// Immutable after construction and shared read-only by every voice of an
/// instrument. Evaluation is a pure function of the note's timestamps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct Adsr {
    attack_time: f64,  // seconds to ramp 0 -> start_amp
    decay_time: f64,   // seconds to ramp start_amp -> sustain_amp
    release_time: f64, // seconds to ramp release start -> 0
    start_amp: f64,    // peak reached at the end of attack
    sustain_amp: f64,  // level held until key-up
}

impl Adsr {
    /// Build an envelope with the given stage durations and sustain level.
    ///
    /// The attack peak defaults to full scale; use [`Adsr::with_start_amp`]
    /// for instruments that attack to a different level. Durations are
    /// floored at one sample period and amplitudes clamped to [0, 1] so a
    /// bad preset cannot divide by zero or overdrive a voice.
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            release_time: release.max(MIN_TIME),
            start_amp: 1.0,
            sustain_amp: sustain.clamp(0.0, 1.0),
        }
    }

    pub fn with_start_amp(mut self, start_amp: f64) -> Self {
        self.start_amp = start_amp.clamp(0.0, 1.0);
        self
    }

    /// Evaluate the envelope at `time` for a note with the given timestamps.
    ///
    /// `time_on > time_off` selects the held phase; otherwise the note is in
    /// release. The result is snapped to exactly 0.0 at or below
    /// [`AMP_EPSILON`] and clamped to at most 1.0.
    pub fn amplitude(&self, time: f64, time_on: f64, time_off: f64) -> f64 {
        let amp = if time_on > time_off {
            self.held_amplitude(time - time_on)
        } else {
            // Reconstruct what the held phase would read right now; nothing
            // was cached at the moment of release.
            let release_start = self.held_amplitude(time - time_on);
            release_start + (time - time_off) / self.release_time * (0.0 - release_start)
        };

        if amp <= AMP_EPSILON {
            0.0
        } else {
            amp.min(1.0)
        }
    }

    /// The three-piece attack/decay/sustain formula.
    fn held_amplitude(&self, life: f64) -> f64 {
        if life <= self.attack_time {
            (life / self.attack_time) * self.start_amp
        } else if life <= self.attack_time + self.decay_time {
            (life - self.attack_time) / self.decay_time * (self.sustain_amp - self.start_amp)
                + self.start_amp
        } else {
            self.sustain_amp
        }
    }

    pub fn release_time(&self) -> f64 {
        self.release_time
    }
}
