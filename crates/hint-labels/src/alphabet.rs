use crate::{Label, LabelError};

/// Letters preferred for one-keystroke labels.
pub const DEFAULT_SINGLES: &str = "EMCGHWLP";
/// Letters that start every multi-letter label.
pub const DEFAULT_DOUBLES: &str = "ASDFJKIO";

/// The two disjoint letter sets labels are drawn from.
///
/// Labels come in tiers of increasing length, each in nested lexicographic
/// order (outer letter slowest), where `A = singles ++ doubles`:
///
/// | tier | compact layout  | overflow layout |
/// |------|-----------------|-----------------|
/// | 1    | `S`             | `S`             |
/// | 2    | `D D`           | `D D`           |
/// | 3    | `D S A`         | `D S S`         |
/// | 4    | -               | `D S D A`       |
///
/// Tier 1 never collides with longer tiers because they start with a `D`
/// letter, and tier 2 never collides with tiers 3/4 because their second
/// letter is an `S` letter. The compact layout is used whenever it has room
/// for the request; beyond that the overflow layout splits the third letter
/// between tiers 3 and 4 so that no tier-3 label prefixes a tier-4 label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    /// Tier-1 letters, uppercase.
    singles: Vec<char>,
    /// Leading letters of multi-letter tiers, uppercase.
    doubles: Vec<char>,
}

/// Which tier layout a request is served from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    /// Tiers 1-3 with a free third letter.
    Compact,
    /// Tiers 1-4 with the third letter split between tiers 3 and 4.
    Overflow,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            singles: DEFAULT_SINGLES.chars().collect(),
            doubles: DEFAULT_DOUBLES.chars().collect(),
        }
    }
}

/// Normalize one letter set, rejecting non-letters and repeats.
fn letters(which: &'static str, s: &str) -> Result<Vec<char>, LabelError> {
    let mut out: Vec<char> = Vec::with_capacity(s.len());
    for ch in s.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(LabelError::NotLetter { which, ch });
        }
        let up = ch.to_ascii_uppercase();
        if out.contains(&up) {
            return Err(LabelError::Duplicate { which, ch: up });
        }
        out.push(up);
    }
    if out.is_empty() {
        return Err(LabelError::Empty { which });
    }
    Ok(out)
}

/// Append the cartesian product of `sets` (outer set slowest) to `out`, stopping at `want`.
fn fill(out: &mut Vec<Label>, want: usize, prefix: &mut String, sets: &[&[char]]) {
    let Some((first, rest)) = sets.split_first() else {
        out.push(Label::from_normalized(prefix.clone()));
        return;
    };
    for &c in *first {
        if out.len() >= want {
            return;
        }
        prefix.push(c);
        fill(out, want, prefix, rest);
        prefix.pop();
    }
}

impl Alphabet {
    /// Build an alphabet from two letter sets. Letters are case-insensitive.
    pub fn new(singles: &str, doubles: &str) -> Result<Self, LabelError> {
        let singles = letters("singles", singles)?;
        let doubles = letters("doubles", doubles)?;
        if let Some(ch) = singles.iter().find(|c| doubles.contains(c)) {
            return Err(LabelError::Overlap { ch: *ch });
        }
        Ok(Self { singles, doubles })
    }

    /// Tier-1 letters.
    pub fn singles(&self) -> &[char] {
        &self.singles
    }

    /// Leading letters of multi-letter labels.
    pub fn doubles(&self) -> &[char] {
        &self.doubles
    }

    /// Capacity of tiers 1-3 in the compact layout.
    fn compact_capacity(&self) -> usize {
        let (s, d) = (self.singles.len(), self.doubles.len());
        s + d * d + d * s * (s + d)
    }

    /// Maximum number of labels this alphabet can address (overflow layout).
    pub fn capacity(&self) -> usize {
        let (s, d) = (self.singles.len(), self.doubles.len());
        s + d * d + d * s * s + d * s * d * (s + d)
    }

    /// Layout used for a request of `count` labels.
    fn layout_for(&self, count: usize) -> Layout {
        if count > self.compact_capacity() {
            Layout::Overflow
        } else {
            Layout::Compact
        }
    }

    /// Length of the longest label in `generate(count)`, or 0 when `count` is 0.
    pub fn max_label_len(&self, count: usize) -> usize {
        let want = count.min(self.capacity());
        let (s, d) = (self.singles.len(), self.doubles.len());
        if want == 0 {
            0
        } else if want <= s {
            1
        } else if want <= s + d * d {
            2
        } else {
            match self.layout_for(count) {
                Layout::Compact => 3,
                Layout::Overflow => 4,
            }
        }
    }

    /// Generate up to `count` labels.
    ///
    /// Deterministic for a given `count`. When `count` exceeds
    /// [`capacity`](Self::capacity), every addressable label is returned and the
    /// caller decides how to degrade.
    pub fn generate(&self, count: usize) -> Vec<Label> {
        let want = count.min(self.capacity());
        let mut out = Vec::with_capacity(want);
        let mut prefix = String::with_capacity(4);
        let all: Vec<char> = self.singles.iter().chain(&self.doubles).copied().collect();
        let (s, d, a) = (
            self.singles.as_slice(),
            self.doubles.as_slice(),
            all.as_slice(),
        );

        fill(&mut out, want, &mut prefix, &[s]);
        fill(&mut out, want, &mut prefix, &[d, d]);
        match self.layout_for(count) {
            Layout::Compact => {
                fill(&mut out, want, &mut prefix, &[d, s, a]);
            }
            Layout::Overflow => {
                fill(&mut out, want, &mut prefix, &[d, s, s]);
                fill(&mut out, want, &mut prefix, &[d, s, d, a]);
            }
        }
        out
    }
}
