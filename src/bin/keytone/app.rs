//! Keytone - main application builder and runner

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags};
use std::sync::Arc;

use keytone::engine::{EngineConfig, SynthEngine};
use keytone::io::SampleClock;
use keytone::MAX_BLOCK_SIZE;

use super::ui::UiApp;

/// Samples buffered between the audio callback and the scope view.
const SCOPE_RING_SIZE: usize = 8192;

/// Main application builder
pub struct Keytone {
    config: EngineConfig,
}

impl Keytone {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Override the output headroom factor.
    #[allow(dead_code)]
    pub fn output_scale(mut self, scale: f64) -> Self {
        self.config.output_scale = scale;
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        // Set up audio
        let host = cpal::default_host();

        // Report every sink we can see, then open the default one.
        let devices = host
            .output_devices()
            .wrap_err("failed to enumerate output devices")?;
        println!("=== keytone ===");
        for device in devices {
            if let Ok(name) = device.name() {
                println!("Found output device: {name}");
            }
        }

        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f64;
        let channels = config.channels() as usize;
        println!("Sample rate: {sample_rate} Hz");
        println!("Channels: {channels}");

        let engine = Arc::new(SynthEngine::new(self.config));
        let clock = Arc::new(SampleClock::new(sample_rate));

        // Lock-free feed from the audio callback to the scope/spectrum view.
        let (mut scope_tx, scope_rx) = rtrb::RingBuffer::<f32>::new(SCOPE_RING_SIZE);

        let render_engine = engine.clone();
        let render_clock = clock.clone();
        let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut mono[..frames_to_render];

                    // Whole block under one registry lock; the clock only
                    // advances past frames that have actually been rendered.
                    render_engine.render_block(
                        block,
                        render_clock.now(),
                        render_clock.sample_period(),
                    );
                    render_clock.advance(frames_to_render as u64);

                    // Fan the mono mix out to every channel and feed the scope.
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                        let _ = scope_tx.push(s); // drop-on-full, never block
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| eprintln!("audio error: {err}"),
            None,
        )?;

        stream.play()?;

        // Hand the terminal to the UI for the life of the stream. Key
        // release events need the kitty keyboard protocol; where the
        // terminal lacks it the input loop falls back to synthesizing
        // releases from repeat silence.
        let mut terminal = ratatui::init();
        let supports_release =
            crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        if supports_release {
            let _ = crossterm::execute!(
                std::io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            );
        }

        let result = UiApp::new(engine, clock, scope_rx, supports_release).run(&mut terminal);

        if supports_release {
            let _ = crossterm::execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        ratatui::restore();

        result
    }
}

impl Default for Keytone {
    fn default() -> Self {
        Self::new()
    }
}
