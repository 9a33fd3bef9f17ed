use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::controller::driver::{ControlLoop, LoopStats};
use crate::ipc::channels::BusChannels;
use crate::ipc::shared_state::DiagnosticLog;
use crate::metrics::TimingMetrics;

/// Drive the control loop at a fixed period until shutdown.
///
/// Ticks are paced by sleeping out the remainder of each period, so a slow
/// tick shortens the following sleep instead of shifting every later tick.
pub fn spawn_control_thread(
    channels: BusChannels,
    mut control: ControlLoop,
    stats: Arc<LoopStats>,
    log: DiagnosticLog,
    metrics: TimingMetrics,
    period: Duration,
    verbose: bool,
) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        if stats.shutdown.load(Ordering::Relaxed) {
            break;
        }

        let cycle_start = Instant::now();
        let tick_number = stats.ticks.fetch_add(1, Ordering::Relaxed) + 1;

        match control.tick() {
            Some(command) => {
                metrics.record_tick(cycle_start.elapsed());

                // Never block the tick on a slow transport consumer
                let publish_start = Instant::now();
                match channels.actuation_tx.try_send(command) {
                    Ok(()) => {
                        metrics.record_publish(publish_start.elapsed());
                        stats.published.fetch_add(1, Ordering::Relaxed);
                        if verbose {
                            println!(
                                "[CONTROL] Tick #{}: acceleration {:.3}",
                                tick_number, command.payload.acceleration
                            );
                        }
                    }
                    Err(crossbeam::channel::TrySendError::Full(_)) => {
                        stats.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(crossbeam::channel::TrySendError::Disconnected(_)) => {
                        log.write("[CONTROL] Actuation channel closed".to_string());
                        break;
                    }
                }
            }
            None => {
                // Inputs not complete yet; output is withheld, not zeroed.
                stats.skipped.fetch_add(1, Ordering::Relaxed);
            }
        }

        let elapsed = cycle_start.elapsed();
        if elapsed < period {
            thread::sleep(period - elapsed);
        }
    })
}
