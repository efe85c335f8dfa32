//! WebDriver key codes
//!
//! Special keys are private-use code points sent inside `send_keys` text.

pub const NULL: char = '\u{E000}';
pub const BACK_SPACE: char = '\u{E003}';
pub const TAB: char = '\u{E004}';
pub const ENTER: char = '\u{E007}';
pub const SHIFT: char = '\u{E008}';
pub const CONTROL: char = '\u{E009}';
pub const ALT: char = '\u{E00A}';
pub const ESCAPE: char = '\u{E00C}';
pub const SPACE: char = '\u{E00D}';
pub const END: char = '\u{E010}';
pub const HOME: char = '\u{E011}';
pub const ARROW_LEFT: char = '\u{E012}';
pub const ARROW_UP: char = '\u{E013}';
pub const ARROW_RIGHT: char = '\u{E014}';
pub const ARROW_DOWN: char = '\u{E015}';
pub const DELETE: char = '\u{E017}';
pub const F12: char = '\u{E03C}';
pub const F11: char = '\u{E03B}';

/// Press the given keys together, then release all modifiers.
pub fn chord(keys: &[char]) -> String {
    let mut out: String = keys.iter().collect();
    out.push(NULL);
    out
}

/// The same key `count` times.
pub fn repeat(key: char, count: usize) -> String {
    std::iter::repeat(key).take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_releases_modifiers() {
        let c = chord(&[CONTROL, SPACE]);
        assert_eq!(c.chars().collect::<Vec<_>>(), vec![CONTROL, SPACE, NULL]);
    }

    #[test]
    fn test_repeat() {
        assert_eq!(repeat(ARROW_DOWN, 3).chars().count(), 3);
        assert!(repeat(BACK_SPACE, 0).is_empty());
    }
}
