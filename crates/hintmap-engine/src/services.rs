use std::sync::Arc;

use crate::deps::{ActionSink, Activator, CursorRenderer, ElementScan, OverlayRenderer};

/// Groups the engine's platform collaborators so construction sites name
/// every dependency explicitly.
#[derive(Clone)]
pub struct Services {
    /// Element enumeration.
    pub scan: Arc<dyn ElementScan>,
    /// Element activation.
    pub activator: Arc<dyn Activator>,
    /// Label overlay.
    pub overlay: Arc<dyn OverlayRenderer>,
    /// Command-mode cursor indicator.
    pub cursor: Arc<dyn CursorRenderer>,
    /// Window switch, scroll and notification actions.
    pub actions: Arc<dyn ActionSink>,
}
