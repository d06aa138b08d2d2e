//! The key event funnel: every key event from either OS channel passes
//! through [`FunnelState::handle`], which decides whether the keystroke is
//! swallowed and applies all resulting state transitions before returning.
//!
//! Nothing here talks to collaborators. Work that needs them is described as
//! an [`Effect`] and performed later by the polling loop.

use config::{Action, Channel, Placement};
use hint_labels::Alphabet;
use keymode::{Mode, ModeCell, ModifierTap, Tap};
use tracing::{debug, info, trace};
use vkey::Key;

use crate::{
    deps::Target,
    geom::Display,
    key_state::KeyStateTracker,
    session::{Session, Typed},
    shortcuts::ShortcutRegistry,
};

/// What the OS should do with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Swallow the keystroke.
    Consumed,
    /// Let the keystroke reach the foreground application.
    PassThrough,
    /// The event came from the non-authoritative channel and was not looked at.
    Ignored,
}

impl Decision {
    /// True when the hook should suppress the event.
    pub fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Collaborator work queued for the polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Activate the selected element.
    Activate(Target),
    /// Hide the label overlay.
    CloseOverlay,
    /// Scan and open a hint session.
    OpenSession,
    /// Show the command-mode cursor indicator.
    ShowCursor,
    /// Hide the command-mode cursor indicator.
    HideCursor,
    /// Hand an action to the action sink.
    Perform(Action),
}

/// Configuration the funnel and session coordinator read on every event.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Channel whose events are acted on.
    pub channel: Channel,
    /// Closes an open session.
    pub cancel_key: Key,
    /// Label box placement.
    pub placement: Placement,
    /// Label alphabet.
    pub alphabet: Alphabet,
}

/// Mutable engine state, guarded by one mutex.
///
/// Invariant: the mode is `LabelCapture` exactly when `session` is `Some`,
/// and the mode cell is only written while this state is locked.
#[derive(Debug)]
pub struct FunnelState {
    /// Held keys.
    pub keys: KeyStateTracker,
    /// Insert/command toggle detector.
    pub tap: ModifierTap,
    /// Chords and gestures.
    pub shortcuts: ShortcutRegistry,
    /// Open hint session.
    pub session: Option<Session>,
    /// True while a session open is scanning outside the lock.
    pub opening: bool,
    /// Current settings.
    pub settings: Settings,
    /// Virtual screen geometry for label placement.
    pub display: Display,
}

impl FunnelState {
    /// Decide one accepted key event and apply its transitions.
    pub fn handle(
        &mut self,
        mode: &ModeCell,
        key: Key,
        down: bool,
        out: &mut Vec<Effect>,
    ) -> Decision {
        let stale = self.keys.is_stale(key);
        let repeat = if down {
            !self.keys.on_key_down(key)
        } else {
            self.keys.on_key_up(key);
            false
        };
        // Observed before capture handling so letters typed with the
        // modifier held still spoil the tap.
        let tap = self.tap.observe(key, down, repeat);

        let current = mode.load();
        if current == Mode::LabelCapture {
            if stale {
                // Held since before the session opened. Toggle modifiers
                // always pass so the foreground app never sees a lone down.
                if self.tap.is_modifier(key) {
                    return Decision::PassThrough;
                }
                return Decision::Consumed;
            }
            if down && let Some(d) = self.capture_key(mode, key, out) {
                return d;
            }
        }

        match tap {
            Tap::Tapped => {
                if let Some(next) = mode.toggle_insert() {
                    info!(mode = next.name(), "mode_toggle");
                    out.push(match next {
                        Mode::Insert => Effect::HideCursor,
                        _ => Effect::ShowCursor,
                    });
                }
                return Decision::PassThrough;
            }
            Tap::Modifier => return Decision::PassThrough,
            Tap::Other => {}
        }

        if !current.swallows_keys() {
            self.shortcuts.settle(&self.keys.held());
            return Decision::PassThrough;
        }

        let session_active = self.session.is_some();
        let fired = self.shortcuts.dispatch(&self.keys.held(), session_active);
        for action in fired {
            debug!(action = %action, "shortcut_action");
            match action {
                Action::ShowHints => out.push(Effect::OpenSession),
                Action::CloseHints => {
                    if self.close_session(mode) {
                        out.push(Effect::CloseOverlay);
                    }
                }
                other => out.push(Effect::Perform(other)),
            }
        }
        Decision::Consumed
    }

    /// Label-capture handling for a key-down. `None` means "not a capture key".
    fn capture_key(
        &mut self,
        mode: &ModeCell,
        key: Key,
        out: &mut Vec<Effect>,
    ) -> Option<Decision> {
        if key == self.settings.cancel_key {
            debug!("session_cancel");
            if self.close_session(mode) {
                out.push(Effect::CloseOverlay);
            }
            return Some(Decision::Consumed);
        }
        let letter = key.letter()?;
        let session = self.session.as_mut()?;
        match session.push(letter) {
            Typed::Matched(target) => {
                info!(handle = target.handle.0, "label_match");
                out.push(Effect::Activate(target));
                if self.close_session(mode) {
                    out.push(Effect::CloseOverlay);
                }
            }
            Typed::Pending => trace!(typed = session.typed(), "label_pending"),
            Typed::Reset => debug!("label_buffer_reset"),
        }
        Some(Decision::Consumed)
    }

    /// Tear down the session and return to command mode.
    ///
    /// Keys still held become stale, as they do when a session opens.
    /// Returns true when a session was open, so the caller should close the overlay.
    pub fn close_session(&mut self, mode: &ModeCell) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        mode.swap(Mode::Command);
        self.keys.clear();
        self.shortcuts.reset_edges();
        info!(labels = session.len(), "session_close");
        true
    }
}
