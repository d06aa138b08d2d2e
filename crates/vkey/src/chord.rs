use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{Key, KeySet};

/// A chord: an ordered, duplicate-free set of keys that must all be held.
///
/// Order is kept as written so that display and diagnostics match the user's
/// configuration; matching itself is order-insensitive.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Chord {
    /// Keys in the order they were specified.
    keys: Vec<Key>,
}

impl Chord {
    /// Build a chord from keys. Returns `None` for an empty list or duplicates.
    pub fn new(keys: Vec<Key>) -> Option<Self> {
        if keys.is_empty() {
            return None;
        }
        for (i, k) in keys.iter().enumerate() {
            if keys[..i].contains(k) {
                return None;
            }
        }
        Some(Self { keys })
    }

    /// Parses a chord specification of the form "s+d+f".
    ///
    /// - Case-insensitive for every component.
    /// - Components are separated by "+"; each accepts the full `Key::from_spec`
    ///   space (letters, digits, punctuation, aliases, or names).
    /// - Empty components and repeated keys are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let mut keys = Vec::new();
        for part in s.split('+') {
            let pt = part.trim();
            if pt.is_empty() {
                return None;
            }
            keys.push(Key::from_spec(pt)?);
        }
        Self::new(keys)
    }

    /// Keys in configuration order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Number of keys in the chord.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false for a constructed chord; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True when every key of the chord is currently held.
    pub fn is_held(&self, held: &KeySet) -> bool {
        held.contains_all(&self.keys)
    }

    /// True when exactly the chord's keys are held and nothing else.
    pub fn is_exactly_held(&self, held: &KeySet) -> bool {
        held.len() == self.keys.len() && self.is_held(held)
    }

    /// Returns the canonical string form, e.g. "s+d+f".
    pub fn to_string_canonical(&self) -> String {
        let parts: Vec<String> = self.keys.iter().map(|k| k.to_spec()).collect();
        parts.join("+")
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_canonical())
    }
}

impl Serialize for Chord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_canonical())
    }
}

impl<'de> Deserialize<'de> for Chord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid chord '{s}'")))
    }
}
