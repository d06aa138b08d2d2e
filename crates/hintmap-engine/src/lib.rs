//! hintmap engine
//!
//! The engine turns raw key events into hint-mode behavior:
//! - arbitrates between the two OS key channels and decides, per event,
//!   whether the keystroke is swallowed
//! - tracks held keys, the insert/command toggle, and chord shortcuts
//! - opens hint sessions (scan, label, overlay) and resolves typed labels to
//!   element activations
//!
//! It exposes a small API:
//! - [`Engine`]: the primary type you construct and drive
//! - [`Services`] and the traits in [`deps`]: the platform collaborators
//!
//! The engine has two callers. The OS key callback calls
//! [`Engine::handle_key`], which only takes a short lock and never calls a
//! collaborator. The polling loop calls [`Engine::pump`], which performs the
//! queued collaborator work and opens sessions.
use std::sync::Arc;

use config::{Action, Channel, Config};
use crossbeam_channel::{Receiver, Sender, unbounded};
use hint_labels::Alphabet;
use keymode::{Mode, ModeCell, ModifierTap};
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};
use vkey::{Key, KeySet, VirtualKey};

pub mod deps;
mod error;
mod funnel;
pub mod geom;
mod key_state;
mod services;
mod session;
mod shortcuts;
pub mod test_support;

pub use deps::{
    ActionSink, ActivateError, Activator, CursorRenderer, ElementHandle, ElementScan, LabelBox,
    OverlayRenderer, Target,
};
pub use error::{Error, Result};
pub use funnel::Decision;
pub use geom::{Category, Display, Point, Rect, Rgb, ScanFilter};
pub use services::Services;
pub use session::{Session, Typed};
pub use shortcuts::ShortcutRegistry;

use funnel::{Effect, FunnelState, Settings};
use key_state::KeyStateTracker;

/// What the overlay should currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    /// Every live label with its target and position.
    pub boxes: Vec<LabelBox>,
    /// Letters typed so far, so renderers can dim labels that no longer match.
    pub typed: String,
}

/// Engine coordinates key handling, mode, shortcuts and hint sessions.
///
/// Cheap to clone; clones share state. Construct via [`Engine::new`], feed key
/// events with [`Engine::handle_key`] and call [`Engine::pump`] from the
/// polling loop.
#[derive(Clone)]
pub struct Engine {
    /// Current input mode, readable without the state lock.
    mode: Arc<ModeCell>,
    /// Everything the funnel mutates.
    state: Arc<Mutex<FunnelState>>,
    /// Producer side of the effect queue.
    effects_tx: Sender<Effect>,
    /// Consumer side of the effect queue, drained by `pump`.
    effects_rx: Receiver<Effect>,
    /// Platform collaborators.
    services: Services,
}

/// Build funnel settings and shortcuts from a validated config.
fn settings_from(cfg: &Config) -> Result<(Settings, ShortcutRegistry)> {
    cfg.validate()?;
    let alphabet = Alphabet::new(&cfg.singles, &cfg.doubles)?;
    let settings = Settings {
        channel: cfg.authoritative_channel,
        cancel_key: cfg.cancel_key,
        placement: cfg.placement,
        alphabet,
    };
    Ok((
        settings,
        ShortcutRegistry::from_bindings(&cfg.shortcuts, &cfg.gestures),
    ))
}

impl Engine {
    /// Create an engine from a configuration and its collaborators.
    ///
    /// When starting in command mode the cursor indicator is shown on the
    /// first [`pump`](Self::pump).
    pub fn new(cfg: &Config, services: Services) -> Result<Self> {
        let (settings, shortcuts) = settings_from(cfg)?;
        let (effects_tx, effects_rx) = unbounded();
        let state = FunnelState {
            keys: KeyStateTracker::new(),
            tap: ModifierTap::new(cfg.toggle_modifiers.clone()),
            shortcuts,
            session: None,
            opening: false,
            settings,
            display: Display::default(),
        };
        let engine = Self {
            mode: Arc::new(ModeCell::new(cfg.initial_mode)),
            state: Arc::new(Mutex::new(state)),
            effects_tx,
            effects_rx,
            services,
        };
        if cfg.initial_mode == Mode::Command {
            engine.queue(Effect::ShowCursor);
        }
        info!(
            mode = cfg.initial_mode.name(),
            channel = cfg.authoritative_channel.name(),
            shortcuts = cfg.shortcuts.len(),
            "engine_start"
        );
        Ok(engine)
    }

    /// Replace settings and shortcuts with those of `cfg`.
    ///
    /// Any open session is closed first; mode and held keys are kept.
    pub fn reload(&self, cfg: &Config) -> Result<()> {
        let (settings, shortcuts) = settings_from(cfg)?;
        let closed = {
            let mut st = self.state.lock();
            let closed = st.close_session(&self.mode);
            st.settings = settings;
            st.shortcuts = shortcuts;
            st.tap = ModifierTap::new(cfg.toggle_modifiers.clone());
            closed
        };
        if closed {
            self.services.overlay.close();
        }
        info!("engine_reload");
        Ok(())
    }

    /// Push an effect for the polling loop. The receiver lives in `self`, so
    /// the send cannot fail while the engine exists.
    fn queue(&self, effect: Effect) {
        if self.effects_tx.send(effect).is_err() {
            warn!("effect_queue_closed");
        }
    }

    // ---- Callback context ----

    /// Handle one key event from `channel`.
    ///
    /// Events from the non-authoritative channel return [`Decision::Ignored`]
    /// without touching any state. All mode, key and session transitions are
    /// applied before this returns; collaborator work is queued for
    /// [`pump`](Self::pump).
    pub fn handle_key(&self, key: Key, down: bool, channel: Channel) -> Decision {
        let mut effects = Vec::new();
        let decision = {
            let mut st = self.state.lock();
            if channel != st.settings.channel {
                return Decision::Ignored;
            }
            st.handle(&self.mode, key, down, &mut effects)
        };
        trace!(key = %key, down, decision = ?decision, "key_event");
        for e in effects {
            self.queue(e);
        }
        decision
    }

    /// Handle a raw virtual-key code. Codes outside the known key table are
    /// swallowed in command and label-capture modes and otherwise passed on.
    pub fn handle_vk(&self, code: VirtualKey, down: bool, channel: Channel) -> Decision {
        if let Some(key) = Key::from_code(code) {
            return self.handle_key(key, down, channel);
        }
        if channel != self.state.lock().settings.channel {
            return Decision::Ignored;
        }
        if self.mode.load().swallows_keys() {
            Decision::Consumed
        } else {
            Decision::PassThrough
        }
    }

    // ---- Polling loop ----

    /// Perform all queued collaborator work. Returns the number of effects run.
    pub fn pump(&self) -> usize {
        let mut n = 0;
        while let Ok(effect) = self.effects_rx.try_recv() {
            n += 1;
            match effect {
                Effect::Activate(target) => {
                    if let Err(e) = self.services.activator.activate(&target) {
                        warn!(handle = target.handle.0, error = %e, "activate_failed");
                    }
                }
                Effect::CloseOverlay => self.services.overlay.close(),
                Effect::OpenSession => self.open_session(),
                Effect::ShowCursor => self.services.cursor.show(),
                Effect::HideCursor => self.services.cursor.hide(),
                Effect::Perform(action) => self.perform(&action),
            }
        }
        n
    }

    /// Carry out an action as if its shortcut had fired.
    pub fn perform(&self, action: &Action) {
        match action {
            Action::ShowHints => self.open_session(),
            Action::CloseHints => self.close_session(),
            other => self.services.actions.perform(other),
        }
    }

    /// Scan, label and show a hint session, then enter label-capture mode.
    ///
    /// A no-op when a session is already open or being opened, when the scan
    /// finds nothing, or when the user switched to insert mode while the scan
    /// ran.
    pub fn open_session(&self) {
        {
            let mut st = self.state.lock();
            if st.session.is_some() || st.opening {
                debug!("session_already_open");
                return;
            }
            st.opening = true;
            st.keys.clear();
            st.shortcuts.reset_edges();
        }

        let mut targets = self.services.scan.scan();
        if targets.is_empty() {
            debug!("scan_empty");
            self.state.lock().opening = false;
            return;
        }

        let (alphabet, placement, display) = {
            let st = self.state.lock();
            (st.settings.alphabet.clone(), st.settings.placement, st.display)
        };
        let labels = alphabet.generate(targets.len());
        if labels.len() < targets.len() {
            warn!(
                requested = targets.len(),
                labeled = labels.len(),
                "label_shortage"
            );
            targets.truncate(labels.len());
        }
        let session = Session::new(targets, labels);
        let boxes = session.boxes(&placement, &display);
        self.services.overlay.open(&boxes);

        // `opening` keeps every other open out, so the overlay shown above is
        // ours to close if the session is not installed.
        let installed = {
            let mut st = self.state.lock();
            st.opening = false;
            if self
                .mode
                .transition(Mode::Command, Mode::LabelCapture)
                .is_ok()
            {
                st.session = Some(session);
                true
            } else {
                false
            }
        };
        if installed {
            info!(labels = boxes.len(), "session_open");
        } else {
            debug!(mode = self.mode.load().name(), "session_open_aborted");
            self.services.overlay.close();
        }
    }

    /// Close the open session, if any, and return to command mode.
    pub fn close_session(&self) {
        let closed = self.state.lock().close_session(&self.mode);
        if closed {
            self.services.overlay.close();
        }
    }

    /// Set the virtual screen geometry used to place label boxes.
    pub fn set_display(&self, display: Display) {
        self.state.lock().display = display;
    }

    // ---- Accessors ----

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode.load()
    }

    /// Keys currently held, as seen by the funnel.
    pub fn held_keys(&self) -> KeySet {
        self.state.lock().keys.held()
    }

    /// Letters typed into the open session, or an empty string.
    pub fn typed(&self) -> String {
        self.state
            .lock()
            .session
            .as_ref()
            .map(|s| s.typed().to_string())
            .unwrap_or_default()
    }

    /// True while a hint session is open.
    pub fn session_active(&self) -> bool {
        self.state.lock().session.is_some()
    }

    /// What the overlay should show, or `None` when no session is open.
    pub fn overlay_view(&self) -> Option<OverlayView> {
        let st = self.state.lock();
        let session = st.session.as_ref()?;
        Some(OverlayView {
            boxes: session.boxes(&st.settings.placement, &st.display),
            typed: session.typed().to_string(),
        })
    }

    /// The channel whose events are acted on.
    pub fn authoritative_channel(&self) -> Channel {
        self.state.lock().settings.channel
    }
}
