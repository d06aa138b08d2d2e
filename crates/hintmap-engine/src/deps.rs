use hint_labels::Label;
use thiserror::Error;

use crate::geom::{Category, Point, Rect, Rgb};

/// Opaque reference to a UI element, owned by the scan collaborator.
///
/// The engine never dereferences it; it only hands it back to the activator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub u64);

/// One interactable on-screen element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Scanner-owned handle.
    pub handle: ElementHandle,
    /// Bounds in screen coordinates.
    pub rect: Rect,
    /// Control type, used for label colors.
    pub category: Category,
}

/// A label paired with its target and where to draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBox {
    /// Label text.
    pub label: Label,
    /// Element the label selects.
    pub target: Target,
    /// Overlay-space top-left corner of the label box.
    pub origin: Point,
    /// Background color for the box.
    pub color: Rgb,
}

/// Why an activation did not happen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActivateError {
    /// The element no longer exists.
    #[error("element {0:?} is gone")]
    Stale(ElementHandle),
    /// The element supports no invoke or default action.
    #[error("element {0:?} has no default action")]
    Unsupported(ElementHandle),
    /// Platform call failed.
    #[error("activation failed: {0}")]
    Platform(String),
}

// ---- Collaborator abstractions ----
//
// All methods are called from the polling loop, never from the key callback.

/// Enumerates interactable elements of the foreground window.
pub trait ElementScan: Send + Sync {
    /// Current candidates; may be empty.
    fn scan(&self) -> Vec<Target>;
}

/// Performs the default action of an element.
pub trait Activator: Send + Sync {
    /// Invoke `target`, falling back to its accessible default action.
    fn activate(&self, target: &Target) -> Result<(), ActivateError>;
}

/// Draws label boxes over the screen. Both calls are idempotent.
pub trait OverlayRenderer: Send + Sync {
    /// Show the overlay with these boxes, replacing any previous content.
    fn open(&self, boxes: &[LabelBox]);
    /// Hide the overlay.
    fn close(&self);
}

/// Draws the command-mode indicator around the mouse cursor. Both calls are idempotent.
pub trait CursorRenderer: Send + Sync {
    /// Show the indicator.
    fn show(&self);
    /// Hide the indicator.
    fn hide(&self);
}

/// Performs shortcut actions that are not hint-session operations.
pub trait ActionSink: Send + Sync {
    /// Carry out `action` (window switch, scroll, notification).
    fn perform(&self, action: &config::Action);
}
