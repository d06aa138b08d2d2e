use vkey::Key;

/// What a key event meant to the tap detector.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Tap {
    /// Not a toggle modifier.
    Other,
    /// A toggle modifier event that did not complete a tap.
    Modifier,
    /// A toggle modifier was released with nothing else pressed meanwhile.
    Tapped,
}

/// Detects a clean tap of one of a set of modifier keys.
///
/// A tap is a modifier down followed by the same modifier up with no other
/// key-down in between. Auto-repeat downs of the held modifier are ignored.
#[derive(Clone, Debug)]
pub struct ModifierTap {
    /// Keys that count as the toggle modifier.
    modifiers: Vec<Key>,
    /// Modifier currently held, if any.
    held: Option<Key>,
    /// Another key went down while `held` was down.
    spoiled: bool,
}

impl ModifierTap {
    /// Create a detector for the given modifier keys.
    pub fn new(modifiers: Vec<Key>) -> Self {
        Self {
            modifiers,
            held: None,
            spoiled: false,
        }
    }

    /// True when `key` is one of the toggle modifiers.
    pub fn is_modifier(&self, key: Key) -> bool {
        self.modifiers.contains(&key)
    }

    /// Feed one key event. `repeat` marks a down for a key that was already held.
    pub fn observe(&mut self, key: Key, down: bool, repeat: bool) -> Tap {
        if !self.is_modifier(key) {
            if down && self.held.is_some() {
                self.spoiled = true;
            }
            return Tap::Other;
        }
        if down {
            match self.held {
                None => {
                    self.held = Some(key);
                    self.spoiled = false;
                }
                Some(h) if h == key && repeat => {}
                // A second modifier (or a fresh down we missed the up for).
                Some(_) => self.spoiled = true,
            }
            return Tap::Modifier;
        }
        if self.held != Some(key) {
            return Tap::Modifier;
        }
        let clean = !self.spoiled;
        self.reset();
        if clean { Tap::Tapped } else { Tap::Modifier }
    }

    /// Forget any partial tap.
    pub fn reset(&mut self) {
        self.held = None;
        self.spoiled = false;
    }
}
