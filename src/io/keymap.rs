//! The two-octave key row.
//!
//! Sixteen keys along the bottom of a QWERTY layout map 1:1 to note ids
//! 0..16, laid out like a piano: naturals on the bottom row, sharps on the
//! home row above them.
//!
//! ```text
//! |   |   |   |   |   | |   |   |   |   | |   | |   |   |   |
//! |   | S |   |   | F | | G |   |   | J | | K | | L |   |   |
//! |   |___|   |   |___| |___|   |   |___| |___| |___|   |   |__
//! |     |     |     |     |     |     |     |     |     |     |
//! |  Z  |  X  |  C  |  V  |  B  |  N  |  M  |  ,  |  .  |  /  |
//! |_____|_____|_____|_____|_____|_____|_____|_____|_____|_____|
//! ```

/// Keys in note-id order: index is the id.
pub const KEY_ROW: [char; 16] = [
    'z', 's', 'x', 'c', 'f', 'v', 'g', 'b', 'n', 'j', 'm', 'k', ',', 'l', '.', '/',
];

/// Number of playable keys.
pub const KEY_COUNT: usize = KEY_ROW.len();

/// Map a pressed character to its note id, case-insensitively.
pub fn note_id(key: char) -> Option<u8> {
    let key = key.to_ascii_lowercase();
    KEY_ROW.iter().position(|&c| c == key).map(|i| i as u8)
}

/// The character for a note id, for display.
pub fn key_for(id: u8) -> Option<char> {
    KEY_ROW.get(usize::from(id)).copied()
}
