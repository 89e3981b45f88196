//! Live voice table - one row per note in the registry.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use keytone::dsp::tuning;
use keytone::io::keymap;
use keytone::synth::Note;

/// Render the voice table: key, pitch, instrument, and phase per note.
pub fn render_voices(frame: &mut Frame, area: Rect, notes: &[Note], channel_names: &[&str]) {
    let block = Block::default().title(" Voices ").borders(Borders::ALL);

    let header = Row::new(["Key", "Id", "Hz", "Instrument", "Phase"])
        .style(Style::default().fg(Color::DarkGray));

    let rows: Vec<Row> = notes
        .iter()
        .map(|note| {
            let key = keymap::key_for(note.id)
                .map(|c| c.to_ascii_uppercase().to_string())
                .unwrap_or_else(|| "?".into());
            let hertz = tuning::pitch_hz(i32::from(note.id));
            let instrument = channel_names
                .get(usize::from(note.channel))
                .copied()
                .unwrap_or("-");

            let (phase, style) = if note.is_held() {
                ("held", Style::default().fg(Color::Green))
            } else {
                ("release", Style::default().fg(Color::Yellow))
            };

            Row::new([
                Cell::from(key),
                Cell::from(note.id.to_string()),
                Cell::from(format!("{hertz:.1}")),
                Cell::from(instrument),
                Cell::from(phase),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}
