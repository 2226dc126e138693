//! Keyboard input types.

use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// True when a command modifier (Ctrl, Alt or Meta) is held.
    /// Shift alone does not count.
    pub fn has_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// A key press delivered to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Logical key: a single character (`"r"`) or a named key
    /// (`"Delete"`, `"Backspace"`, `"Escape"`).
    pub key: String,
    /// Modifier keys held during the press.
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Whether keyboard focus is inside a text input (property form,
    /// canvas size fields). Shortcuts are suppressed while it is.
    #[serde(default)]
    pub text_input_focused: bool,
}

impl KeyEvent {
    /// A plain key press with no modifiers and no form focus.
    pub fn pressed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            text_input_focused: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.text_input_focused = true;
        self
    }
}
