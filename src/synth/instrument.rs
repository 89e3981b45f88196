use crate::dsp::envelope::Adsr;
use crate::dsp::oscillator::{self, Waveform};
use crate::dsp::tuning;
use crate::synth::note::Note;

/*
Instruments
===========

An instrument is a timbre: an envelope plus a fixed table of weighted
oscillator terms. Rendering a voice is one pure evaluation -

    sample = envelope(time) * Σ weight_i * osc(life, pitch(id + offset_i))
                            * volume

- where life is time since the note's key-down, so every voice's waveform is
phase-aligned to its own strike. Instruments keep no per-note state; the
note itself carries everything (the same property that makes the envelope a
pure function).

The second return value reports completion: the envelope has read zero, so
the voice may be reclaimed. The registry adds the has-released guard - an
instrument whose envelope dies while the key is still held (the bell, with
its zero sustain) reports finished, but the voice stays until the key
actually goes up.

The roster is closed: a small fixed set of timbres keyed by channel number.
An unknown channel renders defined silence.
*/

/// A timbre that can render any voice's sample at any instant.
pub trait Instrument: Send + Sync {
    /// Render one sample of `note` at `time`. The second value reports
    /// whether the voice has finished sounding.
    fn render(&self, time: f64, note: &Note) -> (f64, bool);

    /// Short display name for the terminal UI.
    fn name(&self) -> &'static str;
}

/// Reedy square-wave timbre with a near-full sustain. The default channel.
#[derive(Debug, Clone, Copy)]
pub struct Harmonica {
    envelope: Adsr,
    volume: f64,
}

impl Harmonica {
    pub fn new() -> Self {
        Self {
            envelope: Adsr::new(0.05, 1.0, 0.95, 0.1),
            volume: 1.0,
        }
    }
}

impl Default for Harmonica {
    fn default() -> Self {
        Self::new()
    }
}

impl Instrument for Harmonica {
    fn render(&self, time: f64, note: &Note) -> (f64, bool) {
        let amp = self.envelope.amplitude(time, note.time_on, note.time_off);
        let finished = amp <= 0.0;

        let life = time - note.time_on;
        let id = i32::from(note.id);
        let sound = 1.00
            * oscillator::sample_lfo(life, tuning::pitch_hz(id), Waveform::Square, 5.0, 0.001)
            + 0.50 * oscillator::sample(life, tuning::pitch_hz(id + 12), Waveform::Square)
            + 0.05 * oscillator::sample(life, tuning::pitch_hz(id + 24), Waveform::Square);

        (amp * sound * self.volume, finished)
    }

    fn name(&self) -> &'static str {
        "harmonica"
    }
}

/// Struck-bell timbre: three sine partials at rising octaves with decaying
/// weights and a slow vibrato on the fundamental. Zero sustain - the tone
/// dies away even while the key is held.
#[derive(Debug, Clone, Copy)]
pub struct Bell {
    envelope: Adsr,
    volume: f64,
}

impl Bell {
    pub fn new() -> Self {
        Self {
            envelope: Adsr::new(0.01, 1.0, 0.0, 1.0),
            volume: 1.0,
        }
    }
}

impl Default for Bell {
    fn default() -> Self {
        Self::new()
    }
}

impl Instrument for Bell {
    fn render(&self, time: f64, note: &Note) -> (f64, bool) {
        let amp = self.envelope.amplitude(time, note.time_on, note.time_off);
        let finished = amp <= 0.0;

        let life = time - note.time_on;
        let id = i32::from(note.id);
        let sound = 1.00
            * oscillator::sample_lfo(life, tuning::pitch_hz(id + 12), Waveform::Sine, 5.0, 0.001)
            + 0.50 * oscillator::sample(life, tuning::pitch_hz(id + 24), Waveform::Sine)
            + 0.25 * oscillator::sample(life, tuning::pitch_hz(id + 36), Waveform::Sine);

        (amp * sound * self.volume, finished)
    }

    fn name(&self) -> &'static str {
        "bell"
    }
}

/// The engine's fixed instrument roster, keyed by note channel.
pub struct Roster {
    instruments: Vec<Box<dyn Instrument>>,
}

impl Roster {
    pub fn new(instruments: Vec<Box<dyn Instrument>>) -> Self {
        Self { instruments }
    }

    /// The stock two-timbre roster: channel 0 harmonica, channel 1 bell.
    pub fn standard() -> Self {
        Self::new(vec![Box::new(Harmonica::new()), Box::new(Bell::new())])
    }

    /// Look up the instrument for a channel. `None` means the channel is
    /// outside the roster; callers render silence for it.
    pub fn get(&self, channel: u8) -> Option<&dyn Instrument> {
        self.instruments
            .get(usize::from(channel))
            .map(|instrument| instrument.as_ref())
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.instruments.iter().map(|i| i.name())
    }
}
