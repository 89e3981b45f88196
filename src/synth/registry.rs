use crate::synth::instrument::Roster;
use crate::synth::note::Note;

/*
Voice Registry
==============

The one mutable, shared structure in the engine: the collection of currently
sounding notes. Two actors touch it - the input loop on key transitions, the
render callback once per frame - and the engine serializes them with a single
mutex around the whole collection. The methods here assume exclusive access
and stay oblivious to the locking.

Per key id the lifecycle is a four-state machine, with the state itself
encoded in the note's timestamps (see `Note`):

    absent ──key_down──> held ──key_up──> released ──silent──> absent
                           ^                  │
                           └────key_down──────┘   (retrigger)

Everything else is a no-op: key-down on a held note, key-up on a released or
absent note, any event for an id the registry does not know. Stray input is
expected, not exceptional.

Reaping happens only in `render_and_reap`, only after the full mix pass, and
only for notes that BOTH read a zero envelope AND have completed a release.
The second condition matters: the bell's envelope dies while the key is still
held, and that voice must survive so a later key-up can run its release.
*/

/// The collection of live notes. Exclusively owned by the engine; all
/// methods require the caller to hold the registry lock.
#[derive(Debug, Default)]
pub struct VoiceRegistry {
    notes: Vec<Note>,
}

impl VoiceRegistry {
    pub fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// Apply a key-down transition: insert a fresh note, retrigger a
    /// releasing one, or ignore a key that is already held.
    pub fn key_down(&mut self, id: u8, channel: u8, time: f64) {
        match self.notes.iter_mut().find(|note| note.id == id) {
            None => self.notes.push(Note::strike(id, channel, time)),
            Some(note) if note.has_released() => {
                // Retrigger in place: the new time_on outruns the stale
                // time_off, flipping the note back to held. time_off stays.
                note.time_on = time;
                note.active = true;
                debug_assert!(note.is_held());
            }
            Some(_) => {} // already held, keep ringing
        }
    }

    /// Apply a key-up transition: record the release time on a held note.
    /// The first key-up wins; later ones (and unknown ids) are no-ops.
    pub fn key_up(&mut self, id: u8, time: f64) {
        if let Some(note) = self.notes.iter_mut().find(|note| note.id == id) {
            if note.is_held() {
                debug_assert!(time >= note.time_on, "clock ran backwards");
                note.time_off = time;
            }
        }
    }

    /// Mix every live note at `time` and reap the voices that have finished.
    ///
    /// One full pass accumulates each voice's instrument output and flags
    /// finished-and-released notes; removal happens after the pass so the
    /// mix always sees a consistent snapshot. Returns the raw accumulated
    /// total - clamping and headroom are the mixer's job.
    pub fn render_and_reap(&mut self, time: f64, roster: &Roster) -> f64 {
        let mut total = 0.0;

        for note in &mut self.notes {
            let (sample, finished) = match roster.get(note.channel) {
                Some(instrument) => instrument.render(time, note),
                // Outside the roster: defined silence, finished so a
                // released orphan still reaps.
                None => (0.0, true),
            };
            total += sample;

            if finished && note.has_released() {
                note.active = false;
            }
        }

        self.notes.retain(|note| note.active);
        total
    }

    pub fn voice_count(&self) -> usize {
        self.notes.len()
    }

    /// Read-only view of the live notes, for UI snapshots.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}
