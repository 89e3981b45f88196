/// One sounding voice, created by a key press and reaped after its release
/// fades out.
///
/// The note's phase is never stored as a flag. It is derived, everywhere it
/// is needed, from comparing the two timestamps:
///
/// - `time_on > time_off` - held (attack/decay/sustain)
/// - `time_on <= time_off` - releasing
///
/// A fresh note has `time_off = 0.0`, so any positive strike time reads as
/// held. Retriggering simply moves `time_on` past the stale `time_off`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Key identity (0..16), doubling as the semitone index above the
    /// keyboard's base pitch.
    pub id: u8,
    /// Clock time of the most recent key-down.
    pub time_on: f64,
    /// Clock time of the most recent key-up; 0.0 before the first release.
    pub time_off: f64,
    /// False once the voice has finished and may be removed.
    pub active: bool,
    /// Selects which instrument renders this voice.
    pub channel: u8,
}

impl Note {
    /// A note freshly struck at `time` on the given instrument channel.
    pub fn strike(id: u8, channel: u8, time: f64) -> Self {
        Self {
            id,
            time_on: time,
            time_off: 0.0,
            active: true,
            channel,
        }
    }

    /// Held phase: the key is conceptually down.
    #[inline]
    pub fn is_held(&self) -> bool {
        self.time_on > self.time_off
    }

    /// The note has completed at least one release transition. Guards
    /// reaping: a voice that never released must not be removed, however
    /// quiet its envelope reads.
    #[inline]
    pub fn has_released(&self) -> bool {
        self.time_off > self.time_on
    }
}
