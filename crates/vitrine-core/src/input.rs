//! Pointer and keyboard events fed to an editing session.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => *position,
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Editor action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Cancel,
    Delete,
    Undo,
    Redo,
    Copy,
    Paste,
    Duplicate,
    BringForward,
    SendBackward,
}

/// Map a key name (as reported by the host, e.g. `"Escape"`, `"z"`) to a
/// command.
pub fn shortcut(key: &str, modifiers: Modifiers) -> Option<Command> {
    match key {
        "Escape" => return Some(Command::Cancel),
        "Delete" | "Backspace" => return Some(Command::Delete),
        _ => {}
    }
    if !modifiers.command() {
        return None;
    }
    match key.to_lowercase().as_str() {
        "z" if modifiers.shift => Some(Command::Redo),
        "z" => Some(Command::Undo),
        "y" => Some(Command::Redo),
        "c" => Some(Command::Copy),
        "v" => Some(Command::Paste),
        "d" => Some(Command::Duplicate),
        "]" => Some(Command::BringForward),
        "[" => Some(Command::SendBackward),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_keys() {
        assert_eq!(shortcut("Escape", Modifiers::NONE), Some(Command::Cancel));
        assert_eq!(shortcut("Backspace", Modifiers::NONE), Some(Command::Delete));
        assert_eq!(shortcut("z", Modifiers::NONE), None);
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(shortcut("z", Modifiers::CTRL), Some(Command::Undo));
        let redo = Modifiers {
            shift: true,
            ..Modifiers::CTRL
        };
        assert_eq!(shortcut("Z", redo), Some(Command::Redo));
        let mac = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(shortcut("v", mac), Some(Command::Paste));
    }
}
