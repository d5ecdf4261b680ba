//! Input handling.
//!
//! Maps keyboard events to presenter commands so the key bindings can be
//! tested without a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Action requested from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show the previous slide.
    Previous,
    /// Show the next slide.
    Next,
    /// Pause or resume autoplay.
    TogglePause,
    /// Switch between light and dark (turns auto-theme off).
    ToggleTheme,
    /// Hand the theme back to the time-of-day schedule.
    EnableAutoTheme,
    /// Show or hide the clock overlay.
    ToggleClock,
    /// Show or hide the key help.
    ToggleHelp,
    /// Load the slide list again.
    Reload,
    /// End the session.
    Quit,
}

/// Key binding for a key event, if any. Key releases are ignored.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'q')).then_some(Command::Quit);
    }

    match key.code {
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h' | 'k') => Some(Command::Previous),
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l' | 'j' | 'n') => Some(Command::Next),
        KeyCode::Char(' ' | 'p') => Some(Command::TogglePause),
        KeyCode::Char('t') => Some(Command::ToggleTheme),
        KeyCode::Char('a') => Some(Command::EnableAutoTheme),
        KeyCode::Char('c') => Some(Command::ToggleClock),
        KeyCode::Char('?') | KeyCode::F(1) => Some(Command::ToggleHelp),
        KeyCode::Char('r') => Some(Command::Reload),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

/// Key and description pairs shown in the help modal.
pub const KEY_HELP: &[(&str, &str)] = &[
    ("←/h/PgUp", "Previous slide"),
    ("→/l/PgDn", "Next slide"),
    ("Space/p", "Pause / resume"),
    ("t", "Toggle light/dark theme"),
    ("a", "Automatic theme by time of day"),
    ("c", "Show/hide clock"),
    ("r", "Reload slide list"),
    ("F1 / ?", "Show/hide this help"),
    ("Esc / q", "Quit"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn arrows_navigate() {
        assert_eq!(command_for_key(make_key(KeyCode::Left)), Some(Command::Previous));
        assert_eq!(command_for_key(make_key(KeyCode::Right)), Some(Command::Next));
        assert_eq!(command_for_key(make_key(KeyCode::PageDown)), Some(Command::Next));
    }

    #[test]
    fn letters_map_to_controls() {
        assert_eq!(command_for_key(make_key(KeyCode::Char(' '))), Some(Command::TogglePause));
        assert_eq!(command_for_key(make_key(KeyCode::Char('t'))), Some(Command::ToggleTheme));
        assert_eq!(command_for_key(make_key(KeyCode::Char('a'))), Some(Command::EnableAutoTheme));
        assert_eq!(command_for_key(make_key(KeyCode::Char('c'))), Some(Command::ToggleClock));
        assert_eq!(command_for_key(make_key(KeyCode::F(1))), Some(Command::ToggleHelp));
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        assert_eq!(command_for_key(make_key(KeyCode::Esc)), Some(Command::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(command_for_key(ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn unbound_and_released_keys_are_ignored() {
        assert_eq!(command_for_key(make_key(KeyCode::Char('z'))), None);
        let release = KeyEvent {
            code: KeyCode::Right,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Release,
            state: KeyEventState::empty(),
        };
        assert_eq!(command_for_key(release), None);
    }
}
