use config::{Action, Binding};
use keymode::ChordEdge;
use tracing::{debug, trace};
use vkey::{Chord, KeySet};

/// One registered chord with its edge state.
#[derive(Debug, Clone)]
struct Entry {
    /// Keys and action.
    binding: Binding,
    /// Fires once per full press.
    edge: ChordEdge,
}

/// Ordered chord bindings plus continuous gestures.
#[derive(Debug, Clone, Default)]
pub struct ShortcutRegistry {
    /// Edge-triggered bindings in registration order.
    entries: Vec<Entry>,
    /// Continuous gestures, matched by exact held-set equality.
    gestures: Vec<Binding>,
}

impl ShortcutRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configured shortcuts and gestures.
    pub fn from_bindings(shortcuts: &[Binding], gestures: &[Binding]) -> Self {
        let mut reg = Self::new();
        for b in shortcuts {
            reg.register(b.keys.clone(), b.action.clone());
        }
        for g in gestures {
            reg.register_gesture(g.keys.clone(), g.action.clone());
        }
        reg
    }

    /// Append an edge-triggered binding.
    pub fn register(&mut self, keys: Chord, action: Action) {
        debug!(keys = %keys, action = %action, "shortcut_register");
        self.entries.push(Entry {
            binding: Binding::new(keys, action),
            edge: ChordEdge::new(),
        });
    }

    /// Append a continuous gesture.
    pub fn register_gesture(&mut self, keys: Chord, action: Action) {
        debug!(keys = %keys, action = %action, "gesture_register");
        self.gestures.push(Binding::new(keys, action));
    }

    /// Evaluate every binding against `held`, returning fired actions in order.
    ///
    /// Chords fire on the edge into "all held". Gestures fire on every call
    /// while exactly their keys are held, except while a hint session is open.
    pub fn dispatch(&mut self, held: &KeySet, session_active: bool) -> Vec<Action> {
        let mut fired = Vec::new();
        for e in &mut self.entries {
            if e.edge.update(&e.binding.keys, held) {
                trace!(keys = %e.binding.keys, "shortcut_fire");
                fired.push(e.binding.action.clone());
            }
        }
        if !session_active {
            for g in &self.gestures {
                if g.keys.is_exactly_held(held) {
                    fired.push(g.action.clone());
                }
            }
        }
        fired
    }

    /// Let latched chords re-arm on releases without firing anything.
    pub fn settle(&mut self, held: &KeySet) {
        for e in &mut self.entries {
            if e.edge.is_latched() && !held.contains_any(e.binding.keys.keys()) {
                e.edge.reset();
            }
        }
    }

    /// Re-arm every chord.
    pub fn reset_edges(&mut self) {
        for e in &mut self.entries {
            e.edge.reset();
        }
    }

    /// Remove every binding and gesture.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.gestures.clear();
    }

    /// Number of edge-triggered bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.gestures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use config::ScrollDir;
    use vkey::Key;

    use super::*;

    fn chord(s: &str) -> Chord {
        Chord::parse(s).unwrap()
    }

    fn defaults() -> ShortcutRegistry {
        let cfg = config::Config::default();
        ShortcutRegistry::from_bindings(&cfg.shortcuts, &cfg.gestures)
    }

    #[test]
    fn registration_order_is_firing_order() {
        let mut reg = ShortcutRegistry::new();
        reg.register(chord("a+b"), Action::SwitchWindow);
        reg.register(chord("b"), Action::CloseHints);
        let held: KeySet = [Key::A, Key::B].into_iter().collect();
        assert_eq!(
            reg.dispatch(&held, false),
            vec![Action::SwitchWindow, Action::CloseHints]
        );
        assert!(reg.dispatch(&held, false).is_empty());
    }

    #[test]
    fn gestures_repeat_and_need_exact_set() {
        let mut reg = defaults();
        let df: KeySet = [Key::D, Key::F].into_iter().collect();
        let down = Action::Scroll(ScrollDir::Down);
        assert_eq!(reg.dispatch(&df, false), vec![down.clone()]);
        assert_eq!(reg.dispatch(&df, false), vec![down]);

        // s+d+f is the hint chord, not a scroll
        let sdf: KeySet = [Key::S, Key::D, Key::F].into_iter().collect();
        assert_eq!(reg.dispatch(&sdf, false), vec![Action::ShowHints]);
    }

    #[test]
    fn gestures_suppressed_during_session() {
        let mut reg = defaults();
        let jk: KeySet = [Key::J, Key::K].into_iter().collect();
        assert!(reg.dispatch(&jk, true).is_empty());
        assert_eq!(
            reg.dispatch(&jk, false),
            vec![Action::Scroll(ScrollDir::Up)]
        );
    }

    #[test]
    fn settle_rearms_without_firing() {
        let mut reg = ShortcutRegistry::new();
        reg.register(chord("g+h"), Action::SwitchWindow);
        let gh: KeySet = [Key::G, Key::H].into_iter().collect();
        assert_eq!(reg.dispatch(&gh, false).len(), 1);
        reg.settle(&KeySet::new());
        assert_eq!(reg.dispatch(&gh, false).len(), 1);
    }

    #[test]
    fn clear_and_reset() {
        let mut reg = defaults();
        assert_eq!(reg.len(), 3);
        let qwe: KeySet = [Key::Q, Key::W, Key::E].into_iter().collect();
        assert_eq!(reg.dispatch(&qwe, false).len(), 1);
        reg.reset_edges();
        assert_eq!(reg.dispatch(&qwe, false).len(), 1);
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.dispatch(&qwe, false).is_empty());
    }
}
