use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::controller::driver::{ControlLoop, LoopStats};
use crate::ipc::channels::BusChannels;
use crate::metrics::TimingMetrics;

/// Tokio variant of the control flow, paced by an async interval.
pub async fn control_task(
    channels: BusChannels,
    mut control: ControlLoop,
    stats: Arc<LoopStats>,
    metrics: TimingMetrics,
    period: Duration,
) {
    let mut timer = interval(period);

    loop {
        timer.tick().await;
        if stats.shutdown.load(Ordering::Relaxed) {
            break;
        }

        let cycle_start = Instant::now();
        stats.ticks.fetch_add(1, Ordering::Relaxed);

        match control.tick() {
            Some(command) => {
                metrics.record_tick(cycle_start.elapsed());
                match channels.actuation_tx.try_send(command) {
                    Ok(()) => {
                        stats.published.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(crossbeam::channel::TrySendError::Full(_)) => {
                        stats.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(crossbeam::channel::TrySendError::Disconnected(_)) => break,
                }
            }
            None => {
                stats.skipped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
