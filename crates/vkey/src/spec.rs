use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Key;

// Central mapping between enum variants and spec strings for shorthand/non-name specs.
// Extend this list to cover more punctuation or shorthand.
macro_rules! key_spec_map {
    ($m:ident, $arg:tt) => {
        $m! { $arg,
            Digit0 => "0",
            Digit1 => "1",
            Digit2 => "2",
            Digit3 => "3",
            Digit4 => "4",
            Digit5 => "5",
            Digit6 => "6",
            Digit7 => "7",
            Digit8 => "8",
            Digit9 => "9",
            Space => " ",
            Minus => "-",
            Equal => "=",
            LeftBracket => "[",
            RightBracket => "]",
            Backslash => "\\",
            Semicolon => ";",
            Quote => "'",
            Comma => ",",
            Period => ".",
            Slash => "/",
            Grave => "`",
            Control => "ctrl",
            LeftControl => "lctrl",
            RightControl => "rctrl",
            Menu => "alt",
            LeftMenu => "lalt",
            RightMenu => "ralt",
            LeftShift => "lshift",
            RightShift => "rshift",
            Escape => "esc",
        }
    };
}

macro_rules! to_spec_match {
    ( $key:expr, $( $k:ident => $s:expr, )* ) => {
        match $key {
            $( Key::$k => $s, )*
            _ => $key.name(),
        }
    }
}

macro_rules! from_spec_match {
    ( $s:expr, $( $k:ident => $v:expr, )* ) => {{
        match $s {
            $( $v => Some(Key::$k), )*
            _ => None,
        }
    }}
}

// Aliases that only apply to parsing specs (not emitted by to_spec).
macro_rules! key_spec_aliases {
    ($m:ident, $arg:expr) => {
        $m! { $arg,
            // modifiers
            Control => "ctrl",
            Control => "control",
            LeftControl => "lctrl",
            RightControl => "rctrl",
            Menu => "alt",
            LeftMenu => "lalt",
            RightMenu => "ralt",
            LeftShift => "lshift",
            RightShift => "rshift",
            LeftWin => "win",
            LeftWin => "lwin",
            RightWin => "rwin",
            CapsLock => "caps",

            // enter/return/delete variants
            Return => "enter",
            Return => "ret",
            Back => "backspace",
            Back => "bs",
            Delete => "del",
            Insert => "ins",
            Backslash => "backslash",
            Comma => "comma",
            Period => "period",
            Slash => "slash",
            Minus => "minus",
            Equal => "equal",
            Semicolon => "semicolon",
            Quote => "quote",
            Grave => "grave",
            LeftBracket => "leftbracket",
            RightBracket => "rightbracket",

            Escape => "esc",
            Space => "space",

            // arrows and navigation
            LeftArrow => "left",
            RightArrow => "right",
            UpArrow => "up",
            DownArrow => "down",
            PageUp => "pgup",
            PageDown => "pgdn",
        }
    };
}

/// Parses a key specification into a `Key`.
///
/// First tries a case-insensitive enum name (via `Key::from_name`). If that
/// fails, falls back to shorthand specs like digits and punctuation centrally
/// defined in `key_spec_map`, then to alias words.
pub fn from_spec(s: &str) -> Option<Key> {
    if let Some(k) = Key::from_name(s) {
        return Some(k);
    }
    if let some @ Some(_) = key_spec_map!(from_spec_match, s) {
        return some;
    }
    let lowered = s.to_ascii_lowercase();
    key_spec_aliases!(from_spec_match, lowered.as_str())
}

/// Returns the key specification string for a `Key`.
///
/// Uses centrally defined shorthand first (digits, punctuation, modifiers),
/// then falls back to the lowercased enum variant name.
pub fn to_spec(key: Key) -> String {
    let s = key_spec_map!(to_spec_match, key);
    s.to_ascii_lowercase()
}

impl Key {
    /// Parses a key specification string into a `Key`.
    ///
    /// Spec parsing differs from `from_name` as follows:
    /// - Accepts enum variant names in a case-insensitive manner.
    /// - Accepts symbol shorthands for digits and punctuation, and space.
    /// - Accepts common alias words (case-insensitive), including: esc, enter,
    ///   ret, ctrl, lctrl, rctrl, alt, win, caps, left, right, up, down, pgup,
    ///   pgdn. Returns `None` if no mapping matches.
    pub fn from_spec(s: &str) -> Option<Self> {
        from_spec(s)
    }

    /// Returns the key specification string for this `Key`.
    pub fn to_spec(self) -> String {
        to_spec(self)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_spec())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_spec(&s).ok_or_else(|| de::Error::custom(format!("unknown key '{s}'")))
    }
}
