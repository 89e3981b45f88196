use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic engine clock, measured in seconds of rendered audio.
///
/// The audio callback advances the frame counter as it fills buffers; both
/// actors read time as `frames / sample_rate`. Deriving the clock from the
/// sample stream rather than the OS keeps note timestamps and the render
/// time on the same axis - an envelope never sees a `time` that the audio
/// stream hasn't reached.
///
/// A single relaxed atomic suffices: the counter is the only shared datum
/// and only ever increases.
#[derive(Debug)]
pub struct SampleClock {
    frames: AtomicU64,
    sample_rate: f64,
}

impl SampleClock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            frames: AtomicU64::new(0),
            sample_rate,
        }
    }

    /// Current time in seconds.
    pub fn now(&self) -> f64 {
        self.frames.load(Ordering::Relaxed) as f64 / self.sample_rate
    }

    /// Advance by `frames` rendered frames. Called by the audio callback
    /// after each buffer.
    pub fn advance(&self, frames: u64) {
        self.frames.fetch_add(frames, Ordering::Relaxed);
    }

    /// Seconds between consecutive frames.
    pub fn sample_period(&self) -> f64 {
        1.0 / self.sample_rate
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_tracks_rendered_frames() {
        let clock = SampleClock::new(48_000.0);
        assert_eq!(clock.now(), 0.0);

        clock.advance(48_000);
        assert!((clock.now() - 1.0).abs() < 1e-12);

        clock.advance(24_000);
        assert!((clock.now() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn period_is_the_sample_spacing() {
        let clock = SampleClock::new(44_100.0);
        assert!((clock.sample_period() - 1.0 / 44_100.0).abs() < 1e-18);
    }
}
