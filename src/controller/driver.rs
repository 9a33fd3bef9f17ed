use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

use crate::bus::{ActuationRequest, Envelope, GroundSpeedReading, GroundSpeedRequest};
use crate::controller::pid::PidController;
use crate::ipc::shared_state::SharedState;

// ============================================================================
// UPDATE ROUTER - Inbound envelope filtering into shared state
// ============================================================================

/// Routes inbound envelopes into [`SharedState`], dropping any whose sender
/// stamp does not match the configured source.
///
/// Measurements are accepted from `input_sender_id` only, targets from
/// `control_sender_id` only. A mismatch is not a fault, just someone else's
/// traffic on the bus.
#[derive(Clone)]
pub struct UpdateRouter {
    state: Arc<SharedState>,
    input_sender_id: u32,
    control_sender_id: u32,
}

impl UpdateRouter {
    pub fn new(state: Arc<SharedState>, input_sender_id: u32, control_sender_id: u32) -> Self {
        Self {
            state,
            input_sender_id,
            control_sender_id,
        }
    }

    /// Returns true when the envelope was accepted and the state updated.
    pub fn ingest_measurement(&self, envelope: &Envelope<GroundSpeedReading>) -> bool {
        if envelope.sender_stamp != self.input_sender_id {
            return false;
        }
        self.state
            .update_measurement(f64::from(envelope.payload.ground_speed));
        true
    }

    /// Returns true when the envelope was accepted and the state updated.
    pub fn ingest_target(&self, envelope: &Envelope<GroundSpeedRequest>) -> bool {
        if envelope.sender_stamp != self.control_sender_id {
            return false;
        }
        self.state
            .update_target(f64::from(envelope.payload.ground_speed));
        true
    }
}

// ============================================================================
// CONTROL LOOP - One tick: snapshot, step, package
// ============================================================================

/// The per-tick body of the control loop, independent of how ticks are
/// scheduled (thread pacing or an async interval).
pub struct ControlLoop {
    pid: PidController,
    state: Arc<SharedState>,
    output_sender_id: u32,
}

impl ControlLoop {
    pub fn new(pid: PidController, state: Arc<SharedState>, output_sender_id: u32) -> Self {
        Self {
            pid,
            state,
            output_sender_id,
        }
    }

    /// Run one tick. `None` while either input is still missing; the tick is
    /// a silent skip, not an error, and the controller state does not move.
    pub fn tick(&mut self) -> Option<Envelope<ActuationRequest>> {
        let snapshot = self.state.snapshot()?;
        let control = self.pid.step(snapshot.target, snapshot.measurement);

        Some(Envelope::new(
            self.output_sender_id,
            ActuationRequest {
                acceleration: control as f32,
                steering: 0.0,
                is_valid: true,
            },
        ))
    }

    pub fn pid(&self) -> &PidController {
        &self.pid
    }
}

// ============================================================================
// LOOP STATS - Run counters shared across threads
// ============================================================================

pub struct LoopStats {
    pub ticks: AtomicU64,
    pub skipped: AtomicU64,
    pub published: AtomicU64,
    pub dropped: AtomicU64,
    pub measurements_accepted: AtomicU64,
    pub measurements_rejected: AtomicU64,
    pub targets_accepted: AtomicU64,
    pub targets_rejected: AtomicU64,
    pub shutdown: AtomicBool,
}

impl LoopStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ticks: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            published: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            measurements_accepted: AtomicU64::new(0),
            measurements_rejected: AtomicU64::new(0),
            targets_accepted: AtomicU64::new(0),
            targets_rejected: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        })
    }
}
