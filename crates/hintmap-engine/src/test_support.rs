//! Test support utilities for hintmap-engine integration and unit tests.
//! These helpers are public so integration tests and the replay driver can
//! share them. They record calls and never touch the OS.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use config::{Action, Channel};
use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;
use vkey::Key;

use crate::{
    ActionSink, ActivateError, Activator, CursorRenderer, Decision, ElementHandle, ElementScan,
    Engine, LabelBox, OverlayRenderer, Services, Target,
    geom::{Category, Rect},
};

/// Scanner that returns a configurable list of targets.
#[derive(Default)]
pub struct MockScan {
    /// Targets returned by every scan.
    targets: Mutex<Vec<Target>>,
    /// Number of scans performed.
    scans: AtomicUsize,
    /// When set, each scan waits for a message (or one second) before returning.
    gate: Mutex<Option<Receiver<()>>>,
}

impl MockScan {
    /// Replace the targets returned by future scans.
    pub fn set_targets(&self, targets: Vec<Target>) {
        *self.targets.lock() = targets;
    }

    /// Number of scans performed so far.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    /// Make future scans block until released through the returned sender.
    pub fn hold_scans(&self) -> Sender<()> {
        let (tx, rx) = bounded(0);
        *self.gate.lock() = Some(rx);
        tx
    }
}

impl ElementScan for MockScan {
    fn scan(&self) -> Vec<Target> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().clone();
        if let Some(rx) = gate {
            rx.recv_timeout(Duration::from_secs(1)).ok();
        }
        self.targets.lock().clone()
    }
}

/// Activator that records handles and can be told to fail.
#[derive(Default)]
pub struct MockActivator {
    /// Every activation attempt, in order.
    calls: Mutex<Vec<ElementHandle>>,
    /// When set, activations fail with `ActivateError::Unsupported`.
    fail: AtomicBool,
}

impl MockActivator {
    /// Handles passed to `activate`, in order.
    pub fn calls(&self) -> Vec<ElementHandle> {
        self.calls.lock().clone()
    }

    /// Make future activations fail.
    pub fn set_fail(&self, v: bool) {
        self.fail.store(v, Ordering::SeqCst);
    }
}

impl Activator for MockActivator {
    fn activate(&self, target: &Target) -> Result<(), ActivateError> {
        self.calls.lock().push(target.handle);
        if self.fail.load(Ordering::SeqCst) {
            Err(ActivateError::Unsupported(target.handle))
        } else {
            Ok(())
        }
    }
}

/// Overlay that remembers what it was asked to show.
#[derive(Default)]
pub struct MockOverlay {
    /// Boxes passed to each `open`.
    opens: Mutex<Vec<Vec<LabelBox>>>,
    /// Number of `close` calls.
    closes: AtomicUsize,
    /// Whether the overlay is currently shown.
    visible: AtomicBool,
}

impl MockOverlay {
    /// Number of `open` calls.
    pub fn open_count(&self) -> usize {
        self.opens.lock().len()
    }

    /// Number of `close` calls.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Boxes from the most recent `open`.
    pub fn last_boxes(&self) -> Vec<LabelBox> {
        self.opens.lock().last().cloned().unwrap_or_default()
    }

    /// True between an `open` and the next `close`.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl OverlayRenderer for MockOverlay {
    fn open(&self, boxes: &[LabelBox]) {
        self.opens.lock().push(boxes.to_vec());
        self.visible.store(true, Ordering::SeqCst);
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.visible.store(false, Ordering::SeqCst);
    }
}

/// Cursor indicator that records "show"/"hide" calls.
#[derive(Default)]
pub struct MockCursor {
    /// Calls in order.
    calls: Mutex<Vec<&'static str>>,
}

impl MockCursor {
    /// Recorded calls.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    /// Result of the most recent call, if any.
    pub fn last(&self) -> Option<&'static str> {
        self.calls.lock().last().copied()
    }
}

impl CursorRenderer for MockCursor {
    fn show(&self) {
        self.calls.lock().push("show");
    }

    fn hide(&self) {
        self.calls.lock().push("hide");
    }
}

/// Action sink that records performed actions.
#[derive(Default)]
pub struct MockActions {
    /// Actions in order.
    performed: Mutex<Vec<Action>>,
}

impl MockActions {
    /// Recorded actions.
    pub fn performed(&self) -> Vec<Action> {
        self.performed.lock().clone()
    }
}

impl ActionSink for MockActions {
    fn perform(&self, action: &Action) {
        self.performed.lock().push(action.clone());
    }
}

/// One of each mock, shared with the engine through [`Mocks::services`].
#[derive(Clone, Default)]
pub struct Mocks {
    /// Scanner.
    pub scan: Arc<MockScan>,
    /// Activator.
    pub activator: Arc<MockActivator>,
    /// Overlay.
    pub overlay: Arc<MockOverlay>,
    /// Cursor indicator.
    pub cursor: Arc<MockCursor>,
    /// Action sink.
    pub actions: Arc<MockActions>,
}

impl Mocks {
    /// Create fresh mocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Services backed by these mocks.
    pub fn services(&self) -> Services {
        Services {
            scan: self.scan.clone(),
            activator: self.activator.clone(),
            overlay: self.overlay.clone(),
            cursor: self.cursor.clone(),
            actions: self.actions.clone(),
        }
    }
}

/// `n` button targets laid out on a grid, handles `0..n`.
pub fn grid_targets(n: usize) -> Vec<Target> {
    (0..n)
        .map(|i| {
            let (col, row) = ((i % 20) as i32, (i / 20) as i32);
            let (left, top) = (20 + col * 60, 40 + row * 30);
            Target {
                handle: ElementHandle(i as u64),
                rect: Rect::new(left, top, left + 50, top + 20),
                category: Category::Button,
            }
        })
        .collect()
}

/// Key down then up on the hook channel. Returns the key-down decision.
pub fn tap_key(engine: &Engine, key: Key) -> Decision {
    let d = engine.handle_key(key, true, Channel::Hook);
    engine.handle_key(key, false, Channel::Hook);
    d
}

/// Type a label letter by letter on the hook channel.
pub fn type_label(engine: &Engine, label: &str) {
    for c in label.chars() {
        if let Some(k) = Key::from_letter(c) {
            tap_key(engine, k);
        }
    }
}

/// Press keys in order, then release them in reverse, on the hook channel.
pub fn chord(engine: &Engine, keys: &[Key]) {
    for k in keys {
        engine.handle_key(*k, true, Channel::Hook);
    }
    for k in keys.iter().rev() {
        engine.handle_key(*k, false, Channel::Hook);
    }
}
