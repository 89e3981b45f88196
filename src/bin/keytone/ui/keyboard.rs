//! Keyboard widget - the two-octave piano with live key state.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use keytone::io::keymap;
use keytone::synth::Note;

/// The piano art the synth has always greeted players with. Every key
/// character in it maps back to a note id through the keymap.
const PIANO: [&str; 6] = [
    "|   |   |   |   |   | |   |   |   |   | |   | |   |   |   |",
    "|   | S |   |   | F | | G |   |   | J | | K | | L |   |   |",
    "|   |___|   |   |___| |___|   |   |___| |___| |___|   |   |__",
    "|     |     |     |     |     |     |     |     |     |     |",
    "|  Z  |  X  |  C  |  V  |  B  |  N  |  M  |  ,  |  .  |  /  |",
    "|_____|_____|_____|_____|_____|_____|_____|_____|_____|_____|",
];

/// Render the keyboard with held keys lit and releasing keys dimmed.
pub fn render_keyboard(frame: &mut Frame, area: Rect, notes: &[Note]) {
    let block = Block::default().title(" Keyboard ").borders(Borders::ALL);

    let mut held = [false; keymap::KEY_COUNT];
    let mut releasing = [false; keymap::KEY_COUNT];
    for note in notes {
        let slot = usize::from(note.id);
        if slot < keymap::KEY_COUNT {
            if note.is_held() {
                held[slot] = true;
            } else {
                releasing[slot] = true;
            }
        }
    }

    let lines: Vec<Line> = PIANO
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .chars()
                .map(|ch| {
                    let style = match keymap::note_id(ch) {
                        Some(id) if held[usize::from(id)] => Style::default()
                            .fg(Color::Black)
                            .bg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                        Some(id) if releasing[usize::from(id)] => {
                            Style::default().fg(Color::Yellow)
                        }
                        Some(_) => Style::default().fg(Color::White),
                        None => Style::default().fg(Color::DarkGray),
                    };
                    Span::styled(ch.to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
