use std::collections::HashSet;

use hint_labels::Alphabet;
use keymode::Mode;
use serde::{Deserialize, Serialize};
use vkey::Key;

use crate::{Binding, Channel, Error, Placement, defaults};

/// Complete, validated user configuration.
///
/// Every field has a default, so an empty RON struct `()` is a valid file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Letters used for one-letter labels.
    pub singles: String,
    /// Letters that start multi-letter labels. Must not overlap `singles`.
    pub doubles: String,
    /// Keys whose tap toggles between insert and command mode.
    pub toggle_modifiers: Vec<Key>,
    /// Key that closes an open hint session.
    pub cancel_key: Key,
    /// Input channel whose events are acted on.
    pub authoritative_channel: Channel,
    /// Mode at startup: `insert` or `command`.
    pub initial_mode: Mode,
    /// Edge-triggered chords, checked in order.
    pub shortcuts: Vec<Binding>,
    /// Continuous gestures, matched by exact held-key equality.
    pub gestures: Vec<Binding>,
    /// Label box placement.
    pub placement: Placement,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            singles: defaults::default_singles(),
            doubles: defaults::default_doubles(),
            toggle_modifiers: defaults::default_toggle_modifiers(),
            cancel_key: defaults::default_cancel_key(),
            authoritative_channel: Channel::default(),
            initial_mode: Mode::Command,
            shortcuts: defaults::default_shortcuts(),
            gestures: defaults::default_gestures(),
            placement: Placement::default(),
        }
    }
}

/// Shorthand for a validation failure without location.
fn invalid(message: impl Into<String>) -> Error {
    Error::Validation {
        path: None,
        line: None,
        col: None,
        message: message.into(),
        excerpt: None,
    }
}

impl Config {
    /// The label alphabet described by `singles` and `doubles`.
    pub fn alphabet(&self) -> Result<Alphabet, Error> {
        Alphabet::new(&self.singles, &self.doubles).map_err(|e| invalid(e.to_string()))
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        self.alphabet()?;

        if self.toggle_modifiers.is_empty() {
            return Err(invalid("toggle_modifiers must name at least one key"));
        }
        if let Some(k) = self.toggle_modifiers.iter().find(|k| k.is_letter()) {
            return Err(invalid(format!(
                "toggle modifier '{}' is a letter; letters are reserved for labels",
                k
            )));
        }
        if self.cancel_key.is_letter() {
            return Err(invalid(format!(
                "cancel_key '{}' is a letter; letters are reserved for labels",
                self.cancel_key
            )));
        }
        if self.toggle_modifiers.contains(&self.cancel_key) {
            return Err(invalid(format!(
                "cancel_key '{}' is also a toggle modifier",
                self.cancel_key
            )));
        }
        if self.initial_mode == Mode::LabelCapture {
            return Err(invalid(
                "initial_mode must be insert or command; label_capture needs an open session",
            ));
        }

        let mut seen = HashSet::new();
        for b in &self.shortcuts {
            let mut keys = b.keys.keys().to_vec();
            keys.sort();
            if !seen.insert(keys) {
                return Err(invalid(format!(
                    "shortcut '{}' is bound more than once",
                    b.keys
                )));
            }
        }
        Ok(())
    }
}
