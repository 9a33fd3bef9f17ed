//! Bus module - Message types exchanged with the pub/sub transport

use std::time::SystemTime;

/// Wrapper around a bus payload carrying the sender identity and send time.
///
/// Delivery, session handling, and serialization belong to the transport;
/// this crate only routes envelopes by their sender stamp.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<T> {
    pub sender_stamp: u32,
    pub sent_at: SystemTime,
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn new(sender_stamp: u32, payload: T) -> Self {
        Self {
            sender_stamp,
            sent_at: SystemTime::now(),
            payload,
        }
    }
}

/// Measured ground speed, published by a speed sensor proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSpeedReading {
    pub ground_speed: f32,
}

/// Requested ground speed, published by a planner or remote operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSpeedRequest {
    pub ground_speed: f32,
}

/// Actuation command computed by the control loop.
///
/// Steering is always 0.0: this controller commands longitudinal
/// acceleration only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuationRequest {
    pub acceleration: f32,
    pub steering: f32,
    pub is_valid: bool,
}
