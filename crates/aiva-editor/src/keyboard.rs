// crates/aiva-editor/src/keyboard.rs
//
// Key → command table. Each binding maps to exactly one EditorCommand;
// unbound keys return None and are left to whatever owns focus.

use aiva_core::commands::EditorCommand;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Home,
    End,
    Space,
    Delete,
    Backspace,
    Char(char),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub command: bool,
    pub shift:   bool,
}

impl Modifiers {
    pub const NONE: Self = Self { command: false, shift: false };
    pub const COMMAND: Self = Self { command: true, shift: false };
    pub const COMMAND_SHIFT: Self = Self { command: true, shift: true };
}

/// Parse a combo like `left`, `space`, `s`, `ctrl+z`, `ctrl+shift+z`.
pub fn parse_combo(combo: &str) -> Option<(Key, Modifiers)> {
    let mut mods = Modifiers::NONE;
    let mut key = None;
    for part in combo.split('+').map(str::trim) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "cmd" | "command" => mods.command = true,
            "shift"                    => mods.shift = true,
            "left"                     => key = Some(Key::Left),
            "right"                    => key = Some(Key::Right),
            "home"                     => key = Some(Key::Home),
            "end"                      => key = Some(Key::End),
            "space"                    => key = Some(Key::Space),
            "delete" | "del"           => key = Some(Key::Delete),
            "backspace"                => key = Some(Key::Backspace),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => key = Some(Key::Char(c)),
                    _ => return None,
                }
            }
        }
    }
    key.map(|k| (k, mods))
}

pub fn command_for(key: Key, mods: Modifiers) -> Option<EditorCommand> {
    let cmd = match (key, mods.command) {
        (Key::Left,  false) => EditorCommand::StepBack,
        (Key::Right, false) => EditorCommand::StepForward,
        (Key::Home,  false) => EditorCommand::JumpToStart,
        (Key::End,   false) => EditorCommand::JumpToEnd,
        (Key::Space, false) => EditorCommand::TogglePlay,
        (Key::Delete | Key::Backspace, false) => EditorCommand::DeleteSelected,
        (Key::Char(c), false) if c.eq_ignore_ascii_case(&'s') => EditorCommand::SplitAtPlayhead,
        (Key::Char(c), true)  if c.eq_ignore_ascii_case(&'b') => EditorCommand::SplitAtPlayhead,
        (Key::Char(c), true)  if c.eq_ignore_ascii_case(&'z') => {
            if mods.shift { EditorCommand::Redo } else { EditorCommand::Undo }
        }
        _ => return None,
    };
    Some(cmd)
}
