//! Input mode and chord state for the hint engine.
//!
//! - [`Mode`] and [`ModeCell`]: the single source of truth for which mode the
//!   keyboard is in, readable from any thread without locking.
//! - [`ModifierTap`]: detects a clean tap of a toggle modifier.
//! - [`ChordEdge`]: per-binding edge detector for chords.

mod edge;
mod mode;
mod tap;

pub use edge::ChordEdge;
pub use mode::{Mode, ModeCell};
pub use tap::{ModifierTap, Tap};
