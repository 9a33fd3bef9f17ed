//! Integration tests for the ground speed PID controller

use realtime_speed_controller::{
    ActuationRequest, BusChannels, ControlLoop, Envelope, GroundSpeedReading, PidConfig,
    PidController, SharedState, Snapshot,
};
use std::sync::Arc;
use std::time::Duration;

fn pid_config() -> PidConfig {
    PidConfig {
        kp: None,
        kd: None,
        ki: None,
        i_limit: None,
        output_min: None,
        output_max: None,
        dt: 0.02,
    }
}

// ============================================================================
// PID CONTROLLER TESTS
// ============================================================================

#[test]
fn test_proportional_only_returns_scaled_error() {
    let mut pid = PidController::new(PidConfig::proportional(2.5, 0.02));

    let control = pid.step(12.0, 10.0);
    assert_eq!(control, 2.5 * 2.0, "P-only output should be kp * error");
    assert_eq!(pid.integral(), 0.0, "Disabled I term should not accumulate");
}

#[test]
fn test_proportional_only_leaves_integral_untouched() {
    let mut pid = PidController::new(PidConfig::proportional(1.0, 0.02));

    for _ in 0..50 {
        pid.step(5.0, 1.0);
    }
    assert_eq!(pid.integral(), 0.0, "Integral should stay at zero across ticks");
}

#[test]
fn test_disabled_terms_produce_zero_output() {
    let mut pid = PidController::new(pid_config());

    let control = pid.step(100.0, -100.0);
    assert_eq!(control, 0.0, "All terms disabled should output zero");
}

#[test]
fn test_integral_accumulates_monotonically() {
    let mut pid = PidController::new(PidConfig {
        ki: Some(1.0),
        dt: 1.0,
        ..pid_config()
    });

    // Constant error of 3.0 per tick
    let first = pid.step(3.0, 0.0);
    let second = pid.step(3.0, 0.0);
    assert_eq!(first, 3.0, "First tick should integrate one error step");
    assert_eq!(second, 6.0, "Second tick should integrate two error steps");
}

#[test]
fn test_integral_pins_at_positive_limit() {
    let mut pid = PidController::new(PidConfig {
        ki: Some(1.0),
        i_limit: Some(2.0),
        dt: 1.0,
        ..pid_config()
    });

    for _ in 0..10 {
        pid.step(1.0, 0.0);
    }
    assert_eq!(pid.integral(), 2.0, "Integral should be pinned at the limit");
    assert_eq!(pid.step(1.0, 0.0), 2.0, "Output should reflect the pinned integral");
}

#[test]
fn test_integral_pins_at_negative_limit() {
    let mut pid = PidController::new(PidConfig {
        ki: Some(1.0),
        i_limit: Some(2.0),
        dt: 1.0,
        ..pid_config()
    });

    for _ in 0..10 {
        pid.step(0.0, 1.0);
    }
    assert_eq!(pid.integral(), -2.0, "Integral should be pinned at minus the limit");
}

#[test]
fn test_derivative_of_error_step() {
    let mut pid = PidController::new(PidConfig {
        kd: Some(0.5),
        dt: 0.02,
        ..pid_config()
    });

    // prev_error starts at 0.0, so the first tick spikes by kd * e0 / dt
    let first = pid.step(1.0, 0.0);
    assert_eq!(first, 0.5 * 1.0 / 0.02, "First tick differentiates against zero");

    let second = pid.step(3.0, 0.0);
    assert_eq!(
        second,
        0.5 * (3.0 - 1.0) / 0.02,
        "Second tick should scale the error change by kd / dt"
    );
}

#[test]
fn test_derivative_constant_error_is_zero() {
    let mut pid = PidController::new(PidConfig {
        kd: Some(0.5),
        dt: 0.02,
        ..pid_config()
    });

    pid.step(2.0, 0.0);
    let second = pid.step(2.0, 0.0);
    assert_eq!(second, 0.0, "Unchanged error should produce no derivative output");
}

#[test]
fn test_output_min_acts_as_floor() {
    let mut pid = PidController::new(PidConfig {
        kp: Some(1.0),
        output_min: Some(-0.5),
        ..pid_config()
    });

    let control = pid.step(0.0, 2.0);
    assert_eq!(control, -0.5, "Output below the minimum should clamp to it");

    let unclamped = pid.step(1.0, 0.0);
    assert_eq!(unclamped, 1.0, "Output above the minimum should pass through");
}

#[test]
fn test_output_max_bound_raises_output_from_below() {
    let mut pid = PidController::new(PidConfig {
        kp: Some(1.0),
        output_max: Some(5.0),
        ..pid_config()
    });

    // The upper bound engages from below: output under the bound is raised
    // to it, output above passes through.
    let below = pid.step(2.0, 0.0);
    assert_eq!(below, 5.0, "Output under the bound is forced up to it");

    let above = pid.step(10.0, 0.0);
    assert_eq!(above, 10.0, "Output over the bound passes through unchanged");
}

#[test]
fn test_output_bounds_apply_min_then_max() {
    let mut pid = PidController::new(PidConfig {
        kp: Some(1.0),
        output_min: Some(0.0),
        output_max: Some(3.0),
        ..pid_config()
    });

    let control = pid.step(1.0, 0.0);
    assert_eq!(control, 3.0, "Output between the bounds lands on the upper one");
}

#[test]
fn test_reset_clears_accumulated_state() {
    let mut pid = PidController::new(PidConfig {
        ki: Some(1.0),
        kd: Some(1.0),
        dt: 1.0,
        ..pid_config()
    });

    pid.step(4.0, 0.0);
    assert!(pid.integral() != 0.0);
    pid.reset();
    assert_eq!(pid.integral(), 0.0);
    assert_eq!(pid.prev_error(), 0.0);
}

// ============================================================================
// SHARED STATE TESTS
// ============================================================================

#[test]
fn test_state_starts_not_ready() {
    let state = SharedState::new();
    assert!(!state.ready(), "Fresh state should not be ready");
    assert!(state.snapshot().is_none(), "Fresh state should have no snapshot");
}

#[test]
fn test_state_needs_both_values() {
    let state = SharedState::new();

    state.update_measurement(10.0);
    assert!(!state.ready(), "Measurement alone should not make state ready");

    state.update_target(12.0);
    assert!(state.ready(), "Both values present should make state ready");
    assert_eq!(
        state.snapshot(),
        Some(Snapshot {
            measurement: 10.0,
            target: 12.0
        })
    );
}

#[test]
fn test_state_keeps_latest_value() {
    let state = SharedState::new();
    state.update_measurement(1.0);
    state.update_measurement(2.0);
    state.update_target(5.0);

    let snapshot = state.snapshot().expect("State should be ready");
    assert_eq!(snapshot.measurement, 2.0, "Snapshot should carry the latest write");
}

#[test]
fn test_state_survives_concurrent_writers() {
    let state = Arc::new(SharedState::new());

    let writer_m = {
        let state = state.clone();
        std::thread::spawn(move || {
            for i in 0..1000 {
                state.update_measurement(f64::from(i));
            }
        })
    };
    let writer_t = {
        let state = state.clone();
        std::thread::spawn(move || {
            for i in 0..1000 {
                state.update_target(f64::from(i));
            }
        })
    };
    let reader = {
        let state = state.clone();
        std::thread::spawn(move || {
            for _ in 0..1000 {
                if let Some(snapshot) = state.snapshot() {
                    assert!(snapshot.measurement >= 0.0 && snapshot.measurement < 1000.0);
                    assert!(snapshot.target >= 0.0 && snapshot.target < 1000.0);
                }
            }
        })
    };

    writer_m.join().expect("Measurement writer should not panic");
    writer_t.join().expect("Target writer should not panic");
    reader.join().expect("Reader should not panic");

    let snapshot = state.snapshot().expect("State should be ready after writes");
    assert_eq!(snapshot.measurement, 999.0);
    assert_eq!(snapshot.target, 999.0);
}

// ============================================================================
// CONTROL LOOP TESTS
// ============================================================================

#[test]
fn test_tick_withholds_output_until_ready() {
    let state = Arc::new(SharedState::new());
    let pid = PidController::new(PidConfig::proportional(1.0, 0.02));
    let mut control = ControlLoop::new(pid, state.clone(), 7);

    for _ in 0..5 {
        assert!(control.tick().is_none(), "Tick before readiness should be a no-op");
    }

    state.update_measurement(10.0);
    assert!(control.tick().is_none(), "Tick with only a measurement should skip");

    state.update_target(12.0);
    let envelope = control.tick().expect("Tick after both updates should publish");
    assert_eq!(envelope.sender_stamp, 7, "Output should carry the output identity");
}

#[test]
fn test_skipped_ticks_leave_controller_state_alone() {
    let state = Arc::new(SharedState::new());
    let pid = PidController::new(PidConfig {
        ki: Some(1.0),
        dt: 1.0,
        ..pid_config()
    });
    let mut control = ControlLoop::new(pid, state.clone(), 0);

    for _ in 0..10 {
        control.tick();
    }
    assert_eq!(
        control.pid().integral(),
        0.0,
        "Skipped ticks must not advance the integral"
    );
}

#[test]
fn test_end_to_end_first_ready_tick() {
    // freq = 50 Hz, kp = 1.0, measurement 10.0, target 12.0
    let state = Arc::new(SharedState::new());
    let pid = PidController::new(PidConfig::proportional(1.0, 1.0 / 50.0));
    let mut control = ControlLoop::new(pid, state.clone(), 0);

    state.update_measurement(10.0);
    state.update_target(12.0);

    let envelope = control.tick().expect("First ready tick should publish");
    assert_eq!(
        envelope.payload,
        ActuationRequest {
            acceleration: 2.0,
            steering: 0.0,
            is_valid: true,
        }
    );
}

// ============================================================================
// BUS CHANNEL TESTS
// ============================================================================

#[test]
fn test_channels_transmit_envelopes() {
    let channels = BusChannels::new(10);
    let envelope = Envelope::new(3, GroundSpeedReading { ground_speed: 9.5 });

    channels
        .measurement_tx
        .send(envelope)
        .expect("Send should succeed");

    let received = channels
        .measurement_rx
        .recv_timeout(Duration::from_millis(100))
        .expect("Receive should succeed");

    assert_eq!(received.sender_stamp, 3);
    assert_eq!(received.payload, envelope.payload);
}

#[test]
fn test_inbound_flows_are_independent() {
    let channels = BusChannels::new(1);

    // Filling the measurement channel must not block target delivery
    channels
        .measurement_tx
        .send(Envelope::new(0, GroundSpeedReading { ground_speed: 1.0 }))
        .expect("Send should succeed");
    channels
        .target_tx
        .send(Envelope::new(
            0,
            realtime_speed_controller::GroundSpeedRequest { ground_speed: 2.0 },
        ))
        .expect("Target send should succeed with a full measurement channel");
}
