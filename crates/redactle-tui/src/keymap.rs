//! Key bindings.
//!
//! Printable characters always go to the guess buffer, so navigation lives on
//! non-printing keys: Tab/Shift-Tab switch panels, arrows and PageUp/PageDown
//! scroll, Home/End jump, Enter submits, Esc quits.

use crossterm::event::{KeyCode, KeyModifiers};

/// An action the TUI can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPanel,
    PrevPanel,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ScrollToTop,
    ScrollToBottom,
    Input(char),
    Backspace,
    ClearInput,
    Submit,
    None,
}

/// Resolves key presses to actions.
#[derive(Debug, Default)]
pub struct KeyMapper;

impl KeyMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, key: KeyCode, modifiers: KeyModifiers) -> Action {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return match key {
                KeyCode::Char('c') => Action::Quit,
                KeyCode::Char('u') => Action::ClearInput,
                _ => Action::None,
            };
        }

        match key {
            KeyCode::Esc => Action::Quit,
            KeyCode::Tab => Action::NextPanel,
            KeyCode::BackTab => Action::PrevPanel,
            KeyCode::Down => Action::ScrollDown,
            KeyCode::Up => Action::ScrollUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Home => Action::ScrollToTop,
            KeyCode::End => Action::ScrollToBottom,
            KeyCode::Enter => Action::Submit,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(c) if !c.is_control() => Action::Input(c),
            _ => Action::None,
        }
    }
}
