//! TUI module for keytone
//!
//! Real-time view of the keyboard, live voices, and the audio output.

mod keyboard;
mod spectrum;
mod voices;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::sync::Arc;
use std::time::Duration;

use keytone::engine::SynthEngine;
use keytone::io::{keymap, SampleClock};
use keytone::synth::Note;

use super::input::KeyTracker;
use keyboard::render_keyboard;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use voices::render_voices;
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

/// UI application state
pub struct UiApp {
    engine: Arc<SynthEngine>,
    clock: Arc<SampleClock>,
    /// Ring buffer receiver for rendered audio samples
    scope_rx: Consumer<f32>,
    /// Audio sample buffer for visualization
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    /// Hold tracking for the no-release-events fallback
    tracker: KeyTracker,
    /// Whether the terminal reports real key releases (kitty protocol)
    supports_release: bool,
    /// Latest registry snapshot
    notes: Vec<Note>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        engine: Arc<SynthEngine>,
        clock: Arc<SampleClock>,
        scope_rx: Consumer<f32>,
        supports_release: bool,
    ) -> Self {
        let sample_rate = clock.sample_rate() as f32;
        Self {
            engine,
            clock,
            scope_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            tracker: KeyTracker::new(),
            supports_release,
            notes: Vec::new(),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            // Pull fresh audio and registry state
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);
            self.notes = self.engine.snapshot();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            // Without real release events, synthesize them from repeat
            // silence.
            if !self.supports_release {
                let now = self.clock.now();
                for id in self.tracker.sweep(now) {
                    self.engine.key_up(id, now);
                }
            }
        }

        Ok(())
    }

    /// Poll for new audio samples from the ring buffer
    fn poll_audio(&mut self) {
        let mut new_samples = Vec::new();
        while let Ok(sample) = self.scope_rx.pop() {
            new_samples.push(sample);
        }

        if !new_samples.is_empty() {
            // Append new samples and keep only the last VIS_BUFFER_SIZE
            self.audio_buffer.extend(new_samples);
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key.code {
                self.should_quit = true;
            }
            return;
        }

        match key.code {
            KeyCode::Char(c) => {
                if let Some(id) = keymap::note_id(c) {
                    let now = self.clock.now();
                    match key.kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => {
                            self.engine.key_down(id, now);
                            self.tracker.press(id, now);
                        }
                        KeyEventKind::Release => {
                            self.engine.key_up(id, now);
                            self.tracker.release(id);
                        }
                    }
                } else if key.kind == KeyEventKind::Press {
                    match c {
                        'q' | 'Q' => self.should_quit = true,
                        // Digits switch the instrument channel for new notes
                        '1'..='9' => self.engine.set_channel(c as u8 - b'1'),
                        _ => {}
                    }
                }
            }
            KeyCode::Esc if key.kind == KeyEventKind::Press => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Length(8),  // Keyboard
                Constraint::Min(6),     // Voices
                Constraint::Length(8),  // Waveform
                Constraint::Length(10), // Spectrum
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        self.render_status(frame, chunks[0]);
        render_keyboard(frame, chunks[1], &self.notes);

        let channel_names: Vec<&'static str> = self.engine.roster().names().collect();
        render_voices(frame, chunks[2], &self.notes, &channel_names);

        render_waveform(frame, chunks[3], &self.audio_buffer);
        render_spectrum(frame, chunks[4], self.spectrum.data());

        let help = Paragraph::new(" [Z-/] Play  [1/2] Instrument  [Q] Quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[5]);
    }

    /// Status bar: current instrument, polyphony, clock, output peak
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title(" keytone ").borders(Borders::ALL);

        let instrument = self
            .engine
            .roster()
            .get(self.engine.channel())
            .map(|i| i.name())
            .unwrap_or("-");
        let peak = self
            .audio_buffer
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let sample_rate_khz = self.clock.sample_rate() / 1000.0;

        let line = Line::from(vec![
            Span::styled(
                format!(" Instrument: {instrument}  "),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("Voices: {}  ", self.notes.len()),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!("t = {:.2}s  ", self.clock.now()),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("{sample_rate_khz:.1}kHz  "),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("Peak: {peak:.3}"),
                Style::default().fg(Color::Magenta),
            ),
        ]);

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
