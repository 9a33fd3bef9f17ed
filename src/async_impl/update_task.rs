use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::controller::driver::{LoopStats, UpdateRouter};
use crate::ipc::channels::BusChannels;
use crate::metrics::TimingMetrics;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Tokio variant of the measurement flow.
///
/// The bus channels are synchronous, so the task polls with `try_recv` and
/// yields between polls rather than parking an executor thread.
pub async fn measurement_task(
    channels: BusChannels,
    router: UpdateRouter,
    stats: Arc<LoopStats>,
    metrics: TimingMetrics,
) {
    loop {
        if stats.shutdown.load(Ordering::Relaxed) {
            break;
        }

        match channels.measurement_rx.try_recv() {
            Ok(envelope) => {
                if router.ingest_measurement(&envelope) {
                    stats.measurements_accepted.fetch_add(1, Ordering::Relaxed);
                    metrics.record_ingest(envelope.sent_at.elapsed().unwrap_or_default());
                } else {
                    stats.measurements_rejected.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(crossbeam::channel::TryRecvError::Empty) => {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            Err(_) => break,
        }
    }
}

/// Tokio variant of the target flow.
pub async fn target_task(
    channels: BusChannels,
    router: UpdateRouter,
    stats: Arc<LoopStats>,
    metrics: TimingMetrics,
) {
    loop {
        if stats.shutdown.load(Ordering::Relaxed) {
            break;
        }

        match channels.target_rx.try_recv() {
            Ok(envelope) => {
                if router.ingest_target(&envelope) {
                    stats.targets_accepted.fetch_add(1, Ordering::Relaxed);
                    metrics.record_ingest(envelope.sent_at.elapsed().unwrap_or_default());
                } else {
                    stats.targets_rejected.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(crossbeam::channel::TryRecvError::Empty) => {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            Err(_) => break,
        }
    }
}
