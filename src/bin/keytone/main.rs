//! keytone - polyphonic terminal synthesizer
//!
//! Run with: cargo run

mod app;
mod input;
mod ui;

use app::Keytone;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    Keytone::new().run()
}
