use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::controller::driver::{LoopStats, UpdateRouter};
use crate::ipc::channels::BusChannels;
use crate::ipc::shared_state::DiagnosticLog;
use crate::metrics::TimingMetrics;

const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Drain the measurement flow into shared state until shutdown.
pub fn spawn_measurement_thread(
    channels: BusChannels,
    router: UpdateRouter,
    stats: Arc<LoopStats>,
    log: DiagnosticLog,
    metrics: TimingMetrics,
    verbose: bool,
) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        if stats.shutdown.load(Ordering::Relaxed) {
            break;
        }

        let envelope = match channels.measurement_rx.recv_timeout(RECV_TIMEOUT) {
            Ok(envelope) => envelope,
            Err(crossbeam::channel::RecvTimeoutError::Timeout) => continue,
            Err(_) => {
                log.write("[BUS] Measurement channel closed".to_string());
                break;
            }
        };

        if router.ingest_measurement(&envelope) {
            stats.measurements_accepted.fetch_add(1, Ordering::Relaxed);
            metrics.record_ingest(envelope.sent_at.elapsed().unwrap_or_default());
            if verbose {
                println!("[BUS] New reading: {:.3}", envelope.payload.ground_speed);
                log.write(format!(
                    "[BUS] Reading {:.3} from sender {}",
                    envelope.payload.ground_speed, envelope.sender_stamp
                ));
            }
        } else {
            stats.measurements_rejected.fetch_add(1, Ordering::Relaxed);
        }
    })
}

/// Drain the target flow into shared state until shutdown.
pub fn spawn_target_thread(
    channels: BusChannels,
    router: UpdateRouter,
    stats: Arc<LoopStats>,
    log: DiagnosticLog,
    metrics: TimingMetrics,
    verbose: bool,
) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        if stats.shutdown.load(Ordering::Relaxed) {
            break;
        }

        let envelope = match channels.target_rx.recv_timeout(RECV_TIMEOUT) {
            Ok(envelope) => envelope,
            Err(crossbeam::channel::RecvTimeoutError::Timeout) => continue,
            Err(_) => {
                log.write("[BUS] Target channel closed".to_string());
                break;
            }
        };

        if router.ingest_target(&envelope) {
            stats.targets_accepted.fetch_add(1, Ordering::Relaxed);
            metrics.record_ingest(envelope.sent_at.elapsed().unwrap_or_default());
            if verbose {
                println!("[BUS] New target set: {:.3}", envelope.payload.ground_speed);
                log.write(format!(
                    "[BUS] Target {:.3} from sender {}",
                    envelope.payload.ground_speed, envelope.sender_stamp
                ));
            }
        } else {
            stats.targets_rejected.fetch_add(1, Ordering::Relaxed);
        }
    })
}
