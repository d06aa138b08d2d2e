//! Defaults for every configurable value.

use hint_labels::{DEFAULT_DOUBLES, DEFAULT_SINGLES};
use vkey::{Chord, Key};

use crate::{Action, Binding, ScrollDir};

/// Pixels between a label box and its target's top edge.
pub const PLACEMENT_GAP: i32 = 6;
/// Pixels from the target's left edge.
pub const PLACEMENT_X_OFFSET: i32 = 8;
/// Labels are never flipped below the target by default.
pub const PLACEMENT_FLIP_MARGIN: i32 = 0;

/// Message of the default `q+w+e` notification.
pub const QWE_MESSAGE: &str = "QWE shortcut triggered!";

// Serde default functions
pub fn default_singles() -> String {
    DEFAULT_SINGLES.to_string()
}
pub fn default_doubles() -> String {
    DEFAULT_DOUBLES.to_string()
}
pub fn default_toggle_modifiers() -> Vec<Key> {
    vec![Key::Control, Key::LeftControl, Key::RightControl]
}
pub const fn default_cancel_key() -> Key {
    Key::Escape
}

/// Build a binding from keys known to form a valid chord.
fn bind(keys: &[Key], action: Action) -> Option<Binding> {
    Chord::new(keys.to_vec()).map(|c| Binding::new(c, action))
}

/// `s+d+f` shows hints, `q+w+e` notifies, `g+h` switches windows.
pub fn default_shortcuts() -> Vec<Binding> {
    [
        bind(&[Key::S, Key::D, Key::F], Action::ShowHints),
        bind(
            &[Key::Q, Key::W, Key::E],
            Action::Notify(QWE_MESSAGE.to_string()),
        ),
        bind(&[Key::G, Key::H], Action::SwitchWindow),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// `d+f` scrolls down and `j+k` scrolls up while held.
pub fn default_gestures() -> Vec<Binding> {
    [
        bind(&[Key::D, Key::F], Action::Scroll(ScrollDir::Down)),
        bind(&[Key::J, Key::K], Action::Scroll(ScrollDir::Up)),
    ]
    .into_iter()
    .flatten()
    .collect()
}
