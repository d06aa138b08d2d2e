use thiserror::Error;

/// Alphabet validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// One of the two letter sets is empty.
    #[error("the {which} alphabet is empty")]
    Empty {
        /// Which set ("singles" or "doubles").
        which: &'static str,
    },
    /// A character is not an ASCII letter.
    #[error("'{ch}' in the {which} alphabet is not an ASCII letter")]
    NotLetter {
        /// Which set ("singles" or "doubles").
        which: &'static str,
        /// Offending character.
        ch: char,
    },
    /// A letter appears twice in the same set.
    #[error("'{ch}' appears more than once in the {which} alphabet")]
    Duplicate {
        /// Which set ("singles" or "doubles").
        which: &'static str,
        /// Offending letter (uppercase).
        ch: char,
    },
    /// A letter appears in both sets; labels would no longer be prefix-free.
    #[error("'{ch}' appears in both the singles and doubles alphabets")]
    Overlap {
        /// Offending letter (uppercase).
        ch: char,
    },
}
