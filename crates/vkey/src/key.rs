//! Virtual-key codes and conversions.
//!
//! A "virtual key" here is the Windows `VK_*` value reported by both the
//! low-level keyboard hook (`KBDLLHOOKSTRUCT::vkCode`) and Raw Input
//! (`RAWKEYBOARD::VKey`). It is layout independent for letters and digits and
//! always fits in a byte.

use std::fmt;

/// Windows virtual-key code (`VK_*`).
pub type VirtualKey = u16;

// Single table of variants and their codes. Digits are `DigitN`, arrows are
// `*Arrow`, and the OEM punctuation keys use their US-layout names.
macro_rules! key_table {
    ( $( $name:ident = $code:literal, )* ) => {
        /// A virtual key.
        #[repr(u16)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[allow(missing_docs)]
        pub enum Key {
            $( $name = $code, )*
        }

        impl Key {
            /// Every known key, in ascending code order.
            pub const ALL: &'static [Key] = &[ $( Key::$name, )* ];

            /// Returns the canonical name for this key (the enum variant string).
            pub fn name(self) -> &'static str {
                match self {
                    $( Key::$name => stringify!($name), )*
                }
            }

            /// Looks up a `Key` from a virtual-key code.
            pub fn from_code(code: VirtualKey) -> Option<Self> {
                match code {
                    $( $code => Some(Key::$name), )*
                    _ => None,
                }
            }
        }
    };
}

key_table! {
    Back = 0x08,
    Tab = 0x09,
    Return = 0x0D,
    Shift = 0x10,
    Control = 0x11,
    Menu = 0x12,
    Pause = 0x13,
    CapsLock = 0x14,
    Escape = 0x1B,
    Space = 0x20,
    PageUp = 0x21,
    PageDown = 0x22,
    End = 0x23,
    Home = 0x24,
    LeftArrow = 0x25,
    UpArrow = 0x26,
    RightArrow = 0x27,
    DownArrow = 0x28,
    Insert = 0x2D,
    Delete = 0x2E,
    Digit0 = 0x30,
    Digit1 = 0x31,
    Digit2 = 0x32,
    Digit3 = 0x33,
    Digit4 = 0x34,
    Digit5 = 0x35,
    Digit6 = 0x36,
    Digit7 = 0x37,
    Digit8 = 0x38,
    Digit9 = 0x39,
    A = 0x41,
    B = 0x42,
    C = 0x43,
    D = 0x44,
    E = 0x45,
    F = 0x46,
    G = 0x47,
    H = 0x48,
    I = 0x49,
    J = 0x4A,
    K = 0x4B,
    L = 0x4C,
    M = 0x4D,
    N = 0x4E,
    O = 0x4F,
    P = 0x50,
    Q = 0x51,
    R = 0x52,
    S = 0x53,
    T = 0x54,
    U = 0x55,
    V = 0x56,
    W = 0x57,
    X = 0x58,
    Y = 0x59,
    Z = 0x5A,
    LeftWin = 0x5B,
    RightWin = 0x5C,
    Apps = 0x5D,
    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,
    F6 = 0x75,
    F7 = 0x76,
    F8 = 0x77,
    F9 = 0x78,
    F10 = 0x79,
    F11 = 0x7A,
    F12 = 0x7B,
    LeftShift = 0xA0,
    RightShift = 0xA1,
    LeftControl = 0xA2,
    RightControl = 0xA3,
    LeftMenu = 0xA4,
    RightMenu = 0xA5,
    Semicolon = 0xBA,
    Equal = 0xBB,
    Comma = 0xBC,
    Minus = 0xBD,
    Period = 0xBE,
    Slash = 0xBF,
    Grave = 0xC0,
    LeftBracket = 0xDB,
    Backslash = 0xDC,
    RightBracket = 0xDD,
    Quote = 0xDE,
}

impl Key {
    /// Case-insensitive lookup of a `Key` from its name.
    ///
    /// Accepts strings like "Tab", "tab", or "TAB".
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }

    /// Returns the virtual-key code for this key.
    pub const fn code(self) -> VirtualKey {
        self as u16
    }

    /// Returns the uppercase letter for `A`..`Z`, `None` for every other key.
    pub fn letter(self) -> Option<char> {
        let code = self.code();
        if (0x41..=0x5A).contains(&code) {
            char::from_u32(u32::from(code))
        } else {
            None
        }
    }

    /// True for the letter keys `A`..`Z`.
    pub fn is_letter(self) -> bool {
        self.letter().is_some()
    }

    /// Looks up the letter key for an ASCII letter, in either case.
    pub fn from_letter(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Self::from_code(c.to_ascii_uppercase() as u16)
        } else {
            None
        }
    }
}

impl TryFrom<VirtualKey> for Key {
    type Error = ();
    fn try_from(value: VirtualKey) -> Result<Self, Self::Error> {
        Key::from_code(value).ok_or(())
    }
}

impl From<Key> for VirtualKey {
    fn from(k: Key) -> Self {
        k.code()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_spec())
    }
}
