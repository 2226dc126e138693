//! Keyboard shortcut mapping and registry.

use crate::input::KeyEvent;
use crate::tools::ToolKind;

/// What a recognized shortcut asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SetTool(ToolKind),
    DeleteSelected,
    ClearSelection,
}

impl ShortcutAction {
    /// Map a key press to an action.
    ///
    /// Returns None while a text input has focus, when a command modifier is
    /// held, or for keys without a binding.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        if event.text_input_focused || event.modifiers.has_command() {
            return None;
        }

        match event.key.as_str() {
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelected),
            "Escape" => Some(ShortcutAction::ClearSelection),
            "v" | "V" | "s" | "S" => Some(ShortcutAction::SetTool(ToolKind::Select)),
            "r" | "R" => Some(ShortcutAction::SetTool(ToolKind::Rectangle)),
            "c" | "C" => Some(ShortcutAction::SetTool(ToolKind::Ellipse)),
            "t" | "T" => Some(ShortcutAction::SetTool(ToolKind::Text)),
            _ => None,
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, description: &'static str) -> Self {
        Self { key, description }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("V", "Select tool"),
            Shortcut::new("S", "Select tool"),
            Shortcut::new("R", "Rectangle tool"),
            Shortcut::new("C", "Circle tool"),
            Shortcut::new("T", "Text tool"),
            Shortcut::new("Delete", "Delete selected shape"),
            Shortcut::new("Backspace", "Delete selected shape"),
            Shortcut::new("Escape", "Clear selection"),
        ]
    }

    /// Format all shortcuts as a help table.
    pub fn help_text() -> String {
        let mut out = String::from("Keyboard shortcuts:\n");
        for shortcut in Self::all() {
            out.push_str(&format!("  {:12} {}\n", shortcut.key, shortcut.description));
        }
        out
    }
}
