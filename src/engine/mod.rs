//! The engine: the instrument roster plus the locked voice registry,
//! exposing the two entry points the outside world gets - key transitions
//! from the input actor and the render call from the audio transport.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

use crate::dsp::mix;
use crate::synth::{Note, Roster, VoiceRegistry};

/*
Concurrency model
-----------------

One mutex guards every read and write of the note collection. Key events
hold it for an O(1) lookup-and-mutate; a render pass holds it for the O(n)
sweep over all voices plus the reap. The two actors are totally ordered by
the lock and nothing more: a key-down arriving during a render pass lands in
a later pass. Consistency between fingers and speakers is eventual, never
synchronous.

Render runs on the audio deadline, so it must never block on anything except
this lock, and the lock must not be held longer than the pass itself. At
per-sample render granularity the acquisition overhead itself becomes
first-order, which is why the transport-facing binary calls `render_block`:
one acquisition per device buffer instead of one per frame.

The coarse lock is the known scalability limit. Sixteen keys cap the
registry at sixteen voices, which a single pass clears in a few
microseconds.
*/

/// Engine configuration constants.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Headroom factor applied after the final clamp. Chosen for the
    /// keyboard's worst-case polyphony, not derived from voice count.
    pub output_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_scale: mix::OUTPUT_SCALE,
        }
    }
}

/// Top-level synthesizer shared between the input and render actors.
///
/// All methods take `&self`; interior mutability is the registry mutex plus
/// an atomic for the current instrument channel. Wrap the engine in an
/// `Arc` and hand clones to both threads.
pub struct SynthEngine {
    registry: Mutex<VoiceRegistry>,
    roster: Roster,
    config: EngineConfig,
    /// Instrument channel assigned to newly struck notes.
    channel: AtomicU8,
}

impl SynthEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_roster(config, Roster::standard())
    }

    pub fn with_roster(config: EngineConfig, roster: Roster) -> Self {
        Self {
            registry: Mutex::new(VoiceRegistry::new()),
            roster,
            config,
            channel: AtomicU8::new(0),
        }
    }

    /// Key-down transition for note `id` at clock time `time`. New notes
    /// are struck on the engine's current instrument channel.
    pub fn key_down(&self, id: u8, time: f64) {
        let channel = self.channel.load(Ordering::Relaxed);
        self.registry.lock().unwrap().key_down(id, channel, time);
    }

    /// Key-up transition for note `id` at clock time `time`.
    pub fn key_up(&self, id: u8, time: f64) {
        self.registry.lock().unwrap().key_up(id, time);
    }

    /// Render entry point: one mixed sample at `time`. The transport's
    /// output channel is accepted for interface parity and ignored - every
    /// channel carries the same mono mix.
    pub fn render(&self, _channel: usize, time: f64) -> f64 {
        let total = self.registry.lock().unwrap().render_and_reap(time, &self.roster);
        mix::master(total, self.config.output_scale)
    }

    /// Render a whole buffer of frames under ONE lock acquisition,
    /// narrowing to the transport's sample format. `sample_period` is the
    /// seconds between consecutive frames (1 / sample rate).
    pub fn render_block(&self, out: &mut [f32], start_time: f64, sample_period: f64) {
        let mut registry = self.registry.lock().unwrap();
        for (i, frame) in out.iter_mut().enumerate() {
            let time = start_time + i as f64 * sample_period;
            let total = registry.render_and_reap(time, &self.roster);
            *frame = mix::master(total, self.config.output_scale) as f32;
        }
    }

    /// Switch the instrument channel used for newly struck notes. Sounding
    /// notes keep the channel they were struck on. Out-of-roster channels
    /// are ignored.
    pub fn set_channel(&self, channel: u8) {
        if usize::from(channel) < self.roster.len() {
            self.channel.store(channel, Ordering::Relaxed);
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel.load(Ordering::Relaxed)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn voice_count(&self) -> usize {
        self.registry.lock().unwrap().voice_count()
    }

    /// Clone of the live note list, for UI display. Takes the registry lock
    /// briefly; call from the UI cadence, never from the audio callback.
    pub fn snapshot(&self) -> Vec<Note> {
        self.registry.lock().unwrap().notes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Instrument;

    /// Saturating test timbre: always contributes a full-scale sample.
    struct Unit;

    impl Instrument for Unit {
        fn render(&self, _time: f64, _note: &Note) -> (f64, bool) {
            (1.0, false)
        }

        fn name(&self) -> &'static str {
            "unit"
        }
    }

    #[test]
    fn empty_registry_renders_silence() {
        let engine = SynthEngine::new(EngineConfig::default());
        assert_eq!(engine.render(0, 1.0), 0.0);
    }

    #[test]
    fn two_saturating_voices_clamp_then_scale() {
        let engine = SynthEngine::with_roster(
            EngineConfig::default(),
            Roster::new(vec![Box::new(Unit)]),
        );

        engine.key_down(3, 1.0);
        engine.key_down(7, 1.0);

        // clamp(1.0 + 1.0) * 0.02
        let out = engine.render(0, 1.5);
        assert!((out - 0.02).abs() < 1e-12);
    }

    #[test]
    fn channel_switch_only_affects_new_notes() {
        let engine = SynthEngine::new(EngineConfig::default());

        engine.key_down(0, 1.0);
        engine.set_channel(1);
        engine.key_down(4, 2.0);

        let notes = engine.snapshot();
        assert_eq!(notes.iter().find(|n| n.id == 0).unwrap().channel, 0);
        assert_eq!(notes.iter().find(|n| n.id == 4).unwrap().channel, 1);

        // Channels outside the roster are rejected.
        engine.set_channel(9);
        assert_eq!(engine.channel(), 1);
    }

    #[test]
    fn render_block_matches_per_sample_rendering() {
        let engine = SynthEngine::new(EngineConfig::default());
        engine.key_down(5, 0.0);

        let period = 1.0 / 48_000.0;
        let mut block = [0.0f32; 32];
        engine.render_block(&mut block, 1.0, period);

        // Same pure math, so a fresh engine in the same state agrees.
        let reference = SynthEngine::new(EngineConfig::default());
        reference.key_down(5, 0.0);
        for (i, &frame) in block.iter().enumerate() {
            let expected = reference.render(0, 1.0 + i as f64 * period) as f32;
            assert!((frame - expected).abs() < 1e-6, "frame {i}");
        }
    }
}
