//! Forward tracing events to an in-process diagnostic channel.
//!
//! This module provides a small tracing [`Layer`] that forwards rendered log
//! events to a bounded `crossbeam_channel` when a sink is set. A tray or a
//! status window can drain the channel to show recent warnings.
//!
//! Usage:
//! - Call [`set_sink`] with a `crossbeam_channel::Sender<RenderedLog>`.
//! - Install the [`layer`] in your tracing subscriber.
//! - Call [`clear_sink`] when the consumer goes away.
//!
//! The layer is lightweight and no-ops when no sink is set. It never blocks:
//! when the channel is full the event is dropped and counted.

use std::sync::{
    OnceLock,
    atomic::{AtomicU64, Ordering},
};

use crossbeam_channel::{Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::fmt::{self, RenderedLog};

/// A global sink that, when present, receives every rendered event.
static LOG_SINK: OnceLock<Mutex<Option<Sender<RenderedLog>>>> = OnceLock::new();

/// Count of log events dropped due to a full channel.
static LOG_DROPS: AtomicU64 = AtomicU64::new(0);

/// Access the global sink.
fn sink() -> &'static Mutex<Option<Sender<RenderedLog>>> {
    LOG_SINK.get_or_init(|| Mutex::new(None))
}

/// Set the forwarding sink.
pub fn set_sink(tx: Sender<RenderedLog>) {
    let mut guard = sink().lock();
    *guard = Some(tx);
}

/// Clear the forwarding sink.
pub fn clear_sink() {
    let mut guard = sink().lock();
    *guard = None;
}

/// Number of events dropped because the sink was full.
pub fn dropped() -> u64 {
    LOG_DROPS.load(Ordering::Relaxed)
}

/// Tracing layer that forwards events when a sink is set.
pub struct ForwardLayer;

impl<S> Layer<S> for ForwardLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let tx_opt = { sink().lock().clone() };
        let Some(tx) = tx_opt else { return };

        match tx.try_send(fmt::render_event(event)) {
            Ok(()) => {}
            Err(TrySendError::Disconnected(_)) => {
                // Receiver is gone; stop rendering for nobody.
                clear_sink();
            }
            Err(TrySendError::Full(_)) => {
                let n = LOG_DROPS.fetch_add(1, Ordering::Relaxed) + 1;
                if n == 1 || n.is_multiple_of(1000) {
                    // Throttled so a stuck consumer cannot cause a log storm.
                    tracing::debug!(count = n, "diag_log_drop");
                }
            }
        }
    }
}

/// Create the forwarding layer instance to add to your subscriber.
pub fn layer() -> ForwardLayer {
    ForwardLayer
}
