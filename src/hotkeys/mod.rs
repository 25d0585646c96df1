//! Hotkey system
//!
//! Keyboard decoding for the region editor.
//!
//! # Architecture
//!
//! - **Key / KeyStroke**: Host-agnostic description of a key press
//! - **HotkeyContext**: Determines whether hotkeys are active
//! - **handle_hotkey()**: Maps a key press to an editor [`Command`]
//!
//! # Bindings
//!
//! | Key | Command |
//! |---|---|
//! | Space | toggle play |
//! | Tab / Shift+Tab | next / previous region |
//! | Escape | deselect |
//! | a-z | set active label |
//! | Left / Right | move cursor, or resize the active region (Alt: end edge, Shift: coarse) |
//! | Up / Down | zoom in / out |
//! | Backspace / Delete | delete active region, select left / right neighbor |
//! | Enter / Shift+Enter | insert region / split active region |

use std::str::FromStr;

use crate::editor::{Command, Direction};
use crate::error::EditorError;
use crate::state::LabelKey;

/// Key identity, named after DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(String),
    Tab,
    Escape,
    Enter,
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other(String),
}

impl Key {
    /// Decode a DOM key name (`"Tab"`, `"ArrowLeft"`, `"a"`, `" "`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "Tab" => Key::Tab,
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Space" | "Spacebar" => Key::Character(" ".to_string()),
            other if other.chars().count() == 1 => Key::Character(other.to_string()),
            other => Key::Other(other.to_string()),
        }
    }
}

/// A key press together with its modifier state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyStroke {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    pub fn resolve(&self, context: &HotkeyContext) -> HotkeyResult {
        handle_hotkey(&self.key, self.shift, self.ctrl, self.alt, self.meta, context)
    }
}

impl FromStr for KeyStroke {
    type Err = EditorError;

    /// Parse `modifier+...+Key`, e.g. `shift+Enter`, `alt+ArrowRight`, `a`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modifiers, key_name) = match s.rsplit_once('+') {
            // "+" itself, or a trailing "+" key such as "shift++"
            Some((head, "")) => (head.strip_suffix('+').unwrap_or(head), "+"),
            Some((head, key)) => (head, key),
            None => ("", s),
        };
        if key_name.is_empty() {
            return Err(EditorError::UnsupportedCommand(format!("key:{s}")));
        }

        let mut stroke = KeyStroke::new(Key::from_name(key_name));
        for modifier in modifiers.split('+').filter(|m| !m.is_empty()) {
            match modifier.to_ascii_lowercase().as_str() {
                "shift" => stroke.shift = true,
                "ctrl" | "control" => stroke.ctrl = true,
                "alt" | "option" => stroke.alt = true,
                "meta" | "cmd" | "super" => stroke.meta = true,
                _ => return Err(EditorError::UnsupportedCommand(format!("key:{s}"))),
            }
        }
        Ok(stroke)
    }
}

/// Context information that affects which hotkeys are active.
#[derive(Debug, Clone, Default)]
pub struct HotkeyContext {
    /// Whether an input field has focus (should suppress all hotkeys)
    pub input_focused: bool,
}

/// Result of processing a key event.
#[derive(Debug, Clone, PartialEq)]
pub enum HotkeyResult {
    /// A hotkey matched and the command should be applied
    Action(Command),
    /// No matching hotkey for this key/context combination
    NoMatch,
    /// Hotkey would match but is suppressed (e.g., input field focused)
    Suppressed,
}

/// Maps a key event to a command, considering the current context.
///
/// Ctrl/Meta chords are left to the host and never match.
pub fn handle_hotkey(
    key: &Key,
    shift: bool,
    ctrl: bool,
    alt: bool,
    meta: bool,
    context: &HotkeyContext,
) -> HotkeyResult {
    if context.input_focused {
        return HotkeyResult::Suppressed;
    }
    if ctrl || meta {
        return HotkeyResult::NoMatch;
    }

    let command = match key {
        Key::Character(c) if c == " " => Command::TogglePlay,
        Key::Character(c) => match single_lowercase(c) {
            Some(letter) => Command::SetActiveLabel(LabelKey::from(letter)),
            None => return HotkeyResult::NoMatch,
        },
        Key::Tab if shift => Command::PrevRegion,
        Key::Tab => Command::NextRegion,
        Key::Escape => Command::Deselect,
        Key::ArrowLeft | Key::ArrowRight => Command::Nudge {
            direction: if *key == Key::ArrowLeft {
                Direction::Backward
            } else {
                Direction::Forward
            },
            coarse: shift,
            end_edge: alt,
        },
        Key::ArrowUp => Command::Zoom(1),
        Key::ArrowDown => Command::Zoom(-1),
        Key::Backspace => Command::DeleteActive(Direction::Backward),
        Key::Delete => Command::DeleteActive(Direction::Forward),
        Key::Enter if shift => Command::SplitActive,
        Key::Enter => Command::InsertRegion,
        Key::Other(_) => return HotkeyResult::NoMatch,
    };

    HotkeyResult::Action(command)
}

fn single_lowercase(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(stroke: &str) -> HotkeyResult {
        stroke
            .parse::<KeyStroke>()
            .unwrap()
            .resolve(&HotkeyContext::default())
    }

    #[test]
    fn test_space_toggles_playback() {
        assert_eq!(press("Space"), HotkeyResult::Action(Command::TogglePlay));
        assert_eq!(press(" "), HotkeyResult::Action(Command::TogglePlay));
    }

    #[test]
    fn test_tab_navigation() {
        assert_eq!(press("Tab"), HotkeyResult::Action(Command::NextRegion));
        assert_eq!(press("shift+Tab"), HotkeyResult::Action(Command::PrevRegion));
    }

    #[test]
    fn test_letters_select_labels() {
        assert_eq!(
            press("c"),
            HotkeyResult::Action(Command::SetActiveLabel(LabelKey::new("c")))
        );
        // Uppercase and digits are not label keys
        assert_eq!(press("C"), HotkeyResult::NoMatch);
        assert_eq!(press("7"), HotkeyResult::NoMatch);
    }

    #[test]
    fn test_arrows_carry_modifiers() {
        assert_eq!(
            press("shift+alt+ArrowLeft"),
            HotkeyResult::Action(Command::Nudge {
                direction: Direction::Backward,
                coarse: true,
                end_edge: true
            })
        );
        assert_eq!(press("ArrowUp"), HotkeyResult::Action(Command::Zoom(1)));
        assert_eq!(press("ArrowDown"), HotkeyResult::Action(Command::Zoom(-1)));
    }

    #[test]
    fn test_delete_and_enter() {
        assert_eq!(
            press("Backspace"),
            HotkeyResult::Action(Command::DeleteActive(Direction::Backward))
        );
        assert_eq!(
            press("Delete"),
            HotkeyResult::Action(Command::DeleteActive(Direction::Forward))
        );
        assert_eq!(press("Enter"), HotkeyResult::Action(Command::InsertRegion));
        assert_eq!(press("shift+Enter"), HotkeyResult::Action(Command::SplitActive));
    }

    #[test]
    fn test_ctrl_chords_pass_through() {
        assert_eq!(press("ctrl+s"), HotkeyResult::NoMatch);
        assert_eq!(press("meta+Tab"), HotkeyResult::NoMatch);
    }

    #[test]
    fn test_suppressed_when_input_focused() {
        let ctx = HotkeyContext {
            input_focused: true,
        };
        let result = handle_hotkey(&Key::Tab, false, false, false, false, &ctx);
        assert_eq!(result, HotkeyResult::Suppressed);
    }

    #[test]
    fn test_keystroke_parsing() {
        let stroke: KeyStroke = "ctrl++".parse().unwrap();
        assert_eq!(stroke.key, Key::Character("+".to_string()));
        assert!(stroke.ctrl);
        assert!("hyper+a".parse::<KeyStroke>().is_err());
        assert_eq!(
            "F5".parse::<KeyStroke>().unwrap().key,
            Key::Other("F5".to_string())
        );
    }
}
