use vkey::{Chord, KeySet};

/// Edge detector for one chord binding.
///
/// Fires when the chord becomes fully held, then stays quiet until every key
/// of the chord has been released. Re-pressing one key of a held chord, or
/// OS auto-repeat, therefore never fires twice.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ChordEdge {
    /// The chord fired and has not been fully released since.
    latched: bool,
}

impl ChordEdge {
    /// Create an armed detector.
    pub const fn new() -> Self {
        Self { latched: false }
    }

    /// Evaluate `chord` against the held keys; true exactly when the binding fires.
    pub fn update(&mut self, chord: &Chord, held: &KeySet) -> bool {
        if self.latched {
            if !held.contains_any(chord.keys()) {
                self.latched = false;
            }
            return false;
        }
        if chord.is_held(held) {
            self.latched = true;
            return true;
        }
        false
    }

    /// True while the binding is waiting for a full release.
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Re-arm the detector.
    pub fn reset(&mut self) {
        self.latched = false;
    }
}
