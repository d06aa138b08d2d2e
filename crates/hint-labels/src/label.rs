use std::fmt;

/// A hint label: a short run of uppercase ASCII letters.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    /// Wrap already-normalized letters. Callers guarantee uppercase ASCII.
    pub(crate) fn from_normalized(letters: String) -> Self {
        Self(letters)
    }

    /// The label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of letters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty label (never produced by the generator).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact, case-insensitive comparison against typed input.
    pub fn matches_ignore_case(&self, typed: &str) -> bool {
        self.0.eq_ignore_ascii_case(typed)
    }

    /// True when `typed` is a (case-insensitive) prefix of this label.
    pub fn has_prefix_ignore_case(&self, typed: &str) -> bool {
        typed.len() <= self.0.len() && self.0[..typed.len()].eq_ignore_ascii_case(typed)
    }

    /// True when this label is a proper or equal prefix of `other`.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
