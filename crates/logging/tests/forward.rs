//! The forward layer uses a process-wide sink, so everything runs in one test.

#[cfg(test)]
mod tests {
    use crossbeam_channel::{bounded, unbounded};
    use tracing::{info, warn};
    use tracing_subscriber::prelude::*;

    #[test]
    fn forwards_while_sink_set_counts_drops_and_stops_after_clear() {
        let (tx, rx) = unbounded();
        logging::forward::set_sink(tx);

        let subscriber = tracing_subscriber::registry().with(logging::forward::layer());

        tracing::subscriber::with_default(subscriber, || {
            info!(target: "test_forward", "hello world");
            let got = rx.try_recv().expect("forwarded log");
            assert_eq!(got.level, "INFO");
            assert_eq!(got.target, "test_forward");
            assert_eq!(got.message, "hello world");

            warn!(target: "test_forward", requested = 3, labeled = 2, "label_shortage");
            let got = rx.try_recv().expect("forwarded warning");
            assert_eq!(got.message, "label_shortage requested=3 labeled=2");

            // A full channel drops instead of blocking.
            let (small_tx, small_rx) = bounded(1);
            logging::forward::set_sink(small_tx);
            let before = logging::forward::dropped();
            info!("first");
            info!("second");
            assert_eq!(small_rx.len(), 1);
            assert!(logging::forward::dropped() > before);

            logging::forward::clear_sink();
            info!(target: "test_forward", "this should not forward");
            assert!(rx.try_recv().is_err());
            assert_eq!(small_rx.len(), 1);
        });
    }
}
