use vkey::{Key, KeySet};

/// Tracks held keys so key-down, key-up and OS repeat events can be told apart.
#[derive(Clone, Debug, Default)]
pub struct KeyStateTracker {
    /// Keys currently held, as seen by the funnel.
    held: KeySet,
    /// Keys that were held when the tracker was last cleared. Their repeats
    /// and releases still arrive but must not count as fresh input.
    stale: KeySet,
}

impl KeyStateTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key down; returns true for the first down, false for repeats.
    ///
    /// Repeats of a stale key also return false and do not enter the held set.
    pub fn on_key_down(&mut self, key: Key) -> bool {
        if self.stale.contains(key) {
            return false;
        }
        self.held.insert(key)
    }

    /// Record a key up.
    pub fn on_key_up(&mut self, key: Key) {
        self.held.remove(key);
        self.stale.remove(key);
    }

    /// True if the key is currently considered down.
    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(key)
    }

    /// True if the key was held across the last clear and has not been released.
    pub fn is_stale(&self, key: Key) -> bool {
        self.stale.contains(key)
    }

    /// Snapshot of the held keys.
    pub fn held(&self) -> KeySet {
        self.held
    }

    /// Forget every held key, remembering them as stale until released.
    pub fn clear(&mut self) {
        for k in self.held.iter() {
            self.stale.insert(k);
        }
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_down_then_repeat() {
        let mut t = KeyStateTracker::new();
        assert!(t.on_key_down(Key::A));
        assert!(!t.on_key_down(Key::A));
        assert!(t.is_down(Key::A));
        t.on_key_up(Key::A);
        assert!(!t.is_down(Key::A));
        assert!(t.on_key_down(Key::A));
    }

    #[test]
    fn cleared_keys_stay_stale_until_released() {
        let mut t = KeyStateTracker::new();
        t.on_key_down(Key::S);
        t.on_key_down(Key::D);
        t.clear();
        assert!(t.held().is_empty());
        assert!(t.is_stale(Key::S));
        // OS repeat of a key held across the clear
        assert!(!t.on_key_down(Key::S));
        assert!(t.held().is_empty());
        t.on_key_up(Key::S);
        assert!(!t.is_stale(Key::S));
        assert!(t.on_key_down(Key::S));
        assert!(t.is_stale(Key::D));
    }
}
