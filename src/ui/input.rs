/// Input layer: non-blocking key drain plus line editing.
///
/// The puzzle is text-driven, so there is no held-key tracking; each
/// frame drains whatever the terminal has queued and hands the Press
/// and Repeat events to the phase-specific key mapping in main. Text
/// entry goes through `edit_line`, which mutates the entry buffer the
/// renderer draws.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

/// Keep entries from growing past what any panel can show.
const MAX_ENTRY_LEN: usize = 120;

pub struct InputState {
    /// Press/Repeat events collected during the last drain.
    pub events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { events: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Release {
                    self.events.push(key);
                }
            }
        }
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

/// Apply one key to an entry buffer. Returns true if the buffer changed.
///
/// Plain characters append, Backspace deletes; everything else (arrows,
/// function keys, modified chords) is left for the caller's key map.
pub fn edit_line(buf: &mut String, key: &KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT) {
        return false;
    }
    match key.code {
        KeyCode::Char(c) => {
            if buf.chars().count() < MAX_ENTRY_LEN && !c.is_control() {
                buf.push(c);
                return true;
            }
            false
        }
        KeyCode::Backspace => buf.pop().is_some(),
        _ => false,
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn chars_append_and_backspace_deletes() {
        let mut buf = String::new();
        assert!(edit_line(&mut buf, &press(KeyCode::Char('2'))));
        assert!(edit_line(&mut buf, &press(KeyCode::Char('7'))));
        assert_eq!(buf, "27");
        assert!(edit_line(&mut buf, &press(KeyCode::Backspace)));
        assert_eq!(buf, "2");
    }

    #[test]
    fn backspace_on_empty_is_a_no_op() {
        let mut buf = String::new();
        assert!(!edit_line(&mut buf, &press(KeyCode::Backspace)));
    }

    #[test]
    fn control_chords_are_ignored() {
        let mut buf = String::new();
        let chord = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!edit_line(&mut buf, &chord));
        assert!(buf.is_empty());
    }

    #[test]
    fn entry_length_is_capped() {
        let mut buf = "x".repeat(MAX_ENTRY_LEN);
        assert!(!edit_line(&mut buf, &press(KeyCode::Char('y'))));
        assert_eq!(buf.chars().count(), MAX_ENTRY_LEN);
    }

    #[test]
    fn navigation_keys_fall_through() {
        let mut buf = String::from("27");
        assert!(!edit_line(&mut buf, &press(KeyCode::Enter)));
        assert!(!edit_line(&mut buf, &press(KeyCode::F(1))));
        assert_eq!(buf, "27");
    }
}
