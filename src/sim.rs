//! Sim module - Simulated bus traffic for the demo binary
//!
//! Stands in for the vehicle-side proxies: a noisy ground-speed sensor and a
//! planner stepping through target speeds. Also emits traffic under a
//! foreign sender stamp, which the routers must drop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::bus::{Envelope, GroundSpeedReading, GroundSpeedRequest};
use crate::config::RuntimeConfig;
use crate::controller::driver::LoopStats;
use crate::ipc::channels::BusChannels;

const FEED_INTERVAL_MS: u64 = 10;
const TARGET_HOLD_TICKS: u64 = 100;
const FOREIGN_EVERY: u64 = 25;
const TARGET_SCHEDULE: &[f32] = &[6.0, 10.0, 7.5, 12.0];

pub struct SpeedGenerator {
    rng: StdRng,
    pub base_speed: f32,
    pub noise_amplitude: f32,
}

impl SpeedGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_speed: 8.0,
            noise_amplitude: 0.4,
        }
    }

    pub fn sample(&mut self) -> f32 {
        let noise = self
            .rng
            .gen_range(-self.noise_amplitude..self.noise_amplitude);
        self.base_speed + noise
    }

    /// Pull the simulated vehicle toward a speed, for visible convergence.
    pub fn drift_toward(&mut self, speed: f32, rate: f32) {
        self.base_speed += (speed - self.base_speed) * rate;
    }
}

/// Produce measurement and target envelopes until shutdown is flagged.
pub fn spawn_feed_thread(
    channels: BusChannels,
    config: &RuntimeConfig,
    stats: Arc<LoopStats>,
) -> thread::JoinHandle<()> {
    let input_sender_id = config.input_sender_id;
    let control_sender_id = config.control_sender_id;

    thread::spawn(move || {
        let mut generator = SpeedGenerator::new(42);
        let mut iteration = 0u64;
        let mut target_index = 0usize;
        let mut current_target = TARGET_SCHEDULE[0];

        loop {
            if stats.shutdown.load(Ordering::Relaxed) {
                break;
            }

            let reading = GroundSpeedReading {
                ground_speed: generator.sample(),
            };
            if let Err(crossbeam::channel::TrySendError::Disconnected(_)) = channels
                .measurement_tx
                .try_send(Envelope::new(input_sender_id, reading))
            {
                break;
            }

            if iteration % TARGET_HOLD_TICKS == 0 {
                current_target = TARGET_SCHEDULE[target_index % TARGET_SCHEDULE.len()];
                target_index += 1;
                let request = GroundSpeedRequest {
                    ground_speed: current_target,
                };
                if let Err(crossbeam::channel::TrySendError::Disconnected(_)) = channels
                    .target_tx
                    .try_send(Envelope::new(control_sender_id, request))
                {
                    break;
                }
            }

            // Unrelated bus participant; the measurement router must drop it.
            if iteration % FOREIGN_EVERY == 0 {
                let foreign = GroundSpeedReading { ground_speed: -1.0 };
                let _ = channels
                    .measurement_tx
                    .try_send(Envelope::new(input_sender_id.wrapping_add(1), foreign));
            }

            generator.drift_toward(current_target, 0.02);
            iteration += 1;
            thread::sleep(Duration::from_millis(FEED_INTERVAL_MS));
        }
    })
}
