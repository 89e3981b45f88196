//! Key-hold tracking for terminals without release events.
//!
//! The kitty keyboard protocol reports real key releases; everything else
//! only repeats the press while a key is held. This tracker turns that
//! repeat stream back into hold state: every press or repeat re-arms the
//! key, and a sweep synthesizes the release once the repeats have been
//! silent for longer than the OS auto-repeat spacing.

use keytone::io::keymap::KEY_COUNT;

/// Seconds of repeat silence after which a key counts as released. Just
/// above typical OS auto-repeat spacing so held keys never flicker off.
pub const HOLD_TIMEOUT: f64 = 0.35;

/// Per-key hold state derived from press/repeat events.
pub struct KeyTracker {
    last_seen: [Option<f64>; KEY_COUNT],
    hold_timeout: f64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self {
            last_seen: [None; KEY_COUNT],
            hold_timeout: HOLD_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(timeout: f64) -> Self {
        Self {
            last_seen: [None; KEY_COUNT],
            hold_timeout: timeout,
        }
    }

    /// Re-arm a key on a press or repeat event.
    pub fn press(&mut self, id: u8, time: f64) {
        if let Some(slot) = self.last_seen.get_mut(usize::from(id)) {
            *slot = Some(time);
        }
    }

    /// Clear a key on a real release event (kitty protocol path).
    pub fn release(&mut self, id: u8) {
        if let Some(slot) = self.last_seen.get_mut(usize::from(id)) {
            *slot = None;
        }
    }

    /// Collect the keys whose repeats have gone silent, clearing them.
    /// Call once per input tick on the fallback path.
    pub fn sweep(&mut self, now: f64) -> Vec<u8> {
        let mut released = Vec::new();
        for (id, slot) in self.last_seen.iter_mut().enumerate() {
            if let Some(last) = *slot {
                if now - last > self.hold_timeout {
                    *slot = None;
                    released.push(id as u8);
                }
            }
        }
        released
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_survive_the_sweep() {
        let mut tracker = KeyTracker::with_timeout(0.1);
        tracker.press(3, 1.0);

        assert!(tracker.sweep(1.05).is_empty());
    }

    #[test]
    fn silent_keys_release_exactly_once() {
        let mut tracker = KeyTracker::with_timeout(0.1);
        tracker.press(3, 1.0);

        assert_eq!(tracker.sweep(1.2), vec![3]);
        assert!(tracker.sweep(1.3).is_empty(), "already released");
    }

    #[test]
    fn repeats_re_arm_the_key() {
        let mut tracker = KeyTracker::with_timeout(0.1);
        tracker.press(3, 1.0);
        tracker.press(3, 1.09); // auto-repeat just in time

        assert!(tracker.sweep(1.15).is_empty());
        assert_eq!(tracker.sweep(1.25), vec![3]);
    }

    #[test]
    fn explicit_release_clears_without_sweeping() {
        let mut tracker = KeyTracker::with_timeout(0.1);
        tracker.press(3, 1.0);
        tracker.release(3);

        assert!(tracker.sweep(2.0).is_empty());
    }
}
