use std::fmt;

use crate::Key;

/// Number of 64-bit words needed to cover every virtual-key code (< 256).
const WORDS: usize = 4;

/// Set of currently held keys.
///
/// Backed by a 256-bit bitmap indexed by virtual-key code, so every operation
/// is constant time and allocation free.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct KeySet {
    /// One bit per virtual-key code.
    bits: [u64; WORDS],
}

impl KeySet {
    /// An empty set.
    pub const fn new() -> Self {
        Self { bits: [0; WORDS] }
    }

    /// Word index and bit mask for a key.
    fn slot(key: Key) -> (usize, u64) {
        let code = usize::from(key.code() & 0xFF);
        (code / 64, 1u64 << (code % 64))
    }

    /// Insert a key; returns true if it was not already present.
    pub fn insert(&mut self, key: Key) -> bool {
        let (w, m) = Self::slot(key);
        let fresh = self.bits[w] & m == 0;
        self.bits[w] |= m;
        fresh
    }

    /// Remove a key; returns true if it was present.
    pub fn remove(&mut self, key: Key) -> bool {
        let (w, m) = Self::slot(key);
        let present = self.bits[w] & m != 0;
        self.bits[w] &= !m;
        present
    }

    /// True if the key is held.
    pub fn contains(&self, key: Key) -> bool {
        let (w, m) = Self::slot(key);
        self.bits[w] & m != 0
    }

    /// True if every key in `keys` is held. An empty slice is never "held".
    pub fn contains_all(&self, keys: &[Key]) -> bool {
        !keys.is_empty() && keys.iter().all(|k| self.contains(*k))
    }

    /// True if any key in `keys` is held.
    pub fn contains_any(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.contains(*k))
    }

    /// Number of held keys.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    /// Forget every held key.
    pub fn clear(&mut self) {
        self.bits = [0; WORDS];
    }

    /// Iterate held keys in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL.iter().copied().filter(|k| self.contains(*k))
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut set = Self::new();
        for k in iter {
            set.insert(k);
        }
        set
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
