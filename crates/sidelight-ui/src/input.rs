//! Canonical key-event model.
//!
//! Shields the dispatcher from whatever event source the embedder uses. A
//! bare shift press arrives as its own event (`Key::Shift`) because the
//! activation gesture counts shift keydowns, not shifted characters.

/// Canonical key set consumed by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Shift,
    Up,
    Down,
    Left,
    Right,
}

/// Canonical keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            shift: false,
            ctrl: false,
            alt: false,
        }
    }
}

/// Canonical key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::none(),
        }
    }
}
