//! Input aggregation
//!
//! Keyboard and on-screen touch buttons feed the same three actions. Either
//! source alone is enough to trigger an action.

use serde::{Deserialize, Serialize};

/// Logical input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
}

/// Held keyboard keys relevant to gameplay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardState {
    pub left: bool,
    pub right: bool,
    pub space: bool,
}

/// Held touch buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchState {
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

/// On-screen touch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Left,
    Right,
    Shoot,
}

/// Merge both sources into a single intent
pub fn aggregate(keyboard: &KeyboardState, touch: &TouchState) -> Intent {
    Intent {
        move_left: keyboard.left || touch.left,
        move_right: keyboard.right || touch.right,
        fire: keyboard.space || touch.shoot,
    }
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Space,
    Enter,
    Backspace,
    Escape,
    /// `h` / `H` toggles the high score table
    HighScores,
    /// Any other single ASCII letter (uppercased)
    Letter(char),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            " " => Some(Key::Space),
            "Enter" => Some(Key::Enter),
            "Backspace" => Some(Key::Backspace),
            "Escape" | "Esc" | "ESC" => Some(Key::Escape),
            "h" | "H" => Some(Key::HighScores),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => {
                        Some(Key::Letter(c.to_ascii_uppercase()))
                    }
                    _ => None,
                }
            }
        }
    }

    /// The letter this key types during initials entry, if any
    pub fn as_letter(self) -> Option<char> {
        match self {
            Key::Letter(c) => Some(c),
            Key::HighScores => Some('H'),
            _ => None,
        }
    }
}

impl KeyboardState {
    /// Record a key press; returns true if it changed held state
    pub fn key_down(&mut self, key: Key) -> bool {
        self.set(key, true)
    }

    /// Record a key release; returns true if it changed held state
    pub fn key_up(&mut self, key: Key) -> bool {
        self.set(key, false)
    }

    fn set(&mut self, key: Key, held: bool) -> bool {
        let slot = match key {
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Space => &mut self.space,
            _ => return false,
        };
        let changed = *slot != held;
        *slot = held;
        changed
    }
}

impl TouchState {
    pub fn press(&mut self, button: TouchButton) {
        *self.slot(button) = true;
    }

    pub fn release(&mut self, button: TouchButton) {
        *self.slot(button) = false;
    }

    fn slot(&mut self, button: TouchButton) -> &mut bool {
        match button {
            TouchButton::Left => &mut self.left,
            TouchButton::Right => &mut self.right,
            TouchButton::Shoot => &mut self.shoot,
        }
    }
}
