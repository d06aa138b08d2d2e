//! Core configuration data types used in the config crate.

use std::fmt;

use serde::{Deserialize, Serialize};
use vkey::Chord;

use crate::defaults;

/// Direction for scroll gestures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDir {
    /// Scroll content down (wheel towards the user).
    Down,
    /// Scroll content up.
    Up,
}

/// Something a shortcut or gesture asks the engine to do.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Scan the foreground window and open a hint session.
    ShowHints,
    /// Close the open hint session, if any.
    CloseHints,
    /// Switch to the previously focused window.
    SwitchWindow,
    /// Scroll the foreground window.
    Scroll(ScrollDir),
    /// Show a message to the user.
    Notify(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShowHints => f.write_str("show_hints"),
            Self::CloseHints => f.write_str("close_hints"),
            Self::SwitchWindow => f.write_str("switch_window"),
            Self::Scroll(ScrollDir::Down) => f.write_str("scroll(down)"),
            Self::Scroll(ScrollDir::Up) => f.write_str("scroll(up)"),
            Self::Notify(text) => write!(f, "notify({:?})", text),
        }
    }
}

/// Which OS input channel decides key handling.
///
/// Both channels see every keystroke; events from the other one are ignored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// The low-level keyboard hook. The only channel that can suppress keys.
    #[default]
    Hook,
    /// Raw Input (`WM_INPUT`) notifications.
    RawInput,
}

impl Channel {
    /// Lowercase name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hook => "hook",
            Self::RawInput => "raw_input",
        }
    }
}

/// A chord bound to an action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Binding {
    /// Keys that must be held together, written "s+d+f".
    pub keys: Chord,
    /// What to do when the chord fires.
    pub action: Action,
}

impl Binding {
    /// Convenience constructor.
    pub fn new(keys: Chord, action: Action) -> Self {
        Self { keys, action }
    }
}

/// Where label boxes sit relative to their target, in unscaled pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Placement {
    /// Vertical distance between the label box and the target's top edge.
    pub gap: i32,
    /// Horizontal offset from the target's left edge.
    pub x_offset: i32,
    /// Screen y below which a label above the target would be clipped, so it
    /// is drawn below the top edge instead.
    pub flip_margin: i32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            gap: defaults::PLACEMENT_GAP,
            x_offset: defaults::PLACEMENT_X_OFFSET,
            flip_margin: defaults::PLACEMENT_FLIP_MARGIN,
        }
    }
}
