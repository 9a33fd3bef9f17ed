use crossbeam::channel::{bounded, Receiver, Sender};
use std::sync::Arc;

use crate::bus::{ActuationRequest, Envelope, GroundSpeedReading, GroundSpeedRequest};

/// Channel bundle connecting the three independent flows: measurement
/// updates, target updates, and the outbound actuation stream.
///
/// The two inbound flows are deliberately separate channels; a stalled
/// target producer never blocks measurement delivery.
#[derive(Clone)]
pub struct BusChannels {
    // Transport -> measurement flow
    pub measurement_tx: Sender<Envelope<GroundSpeedReading>>,
    pub measurement_rx: Arc<Receiver<Envelope<GroundSpeedReading>>>,

    // Transport -> target flow
    pub target_tx: Sender<Envelope<GroundSpeedRequest>>,
    pub target_rx: Arc<Receiver<Envelope<GroundSpeedRequest>>>,

    // Control loop -> transport
    pub actuation_tx: Sender<Envelope<ActuationRequest>>,
    pub actuation_rx: Arc<Receiver<Envelope<ActuationRequest>>>,
}

impl BusChannels {
    pub fn new(buffer_size: usize) -> Self {
        let (measurement_tx, measurement_rx) = bounded(buffer_size);
        let (target_tx, target_rx) = bounded(buffer_size);
        let (actuation_tx, actuation_rx) = bounded(buffer_size);

        Self {
            measurement_tx,
            measurement_rx: Arc::new(measurement_rx),
            target_tx,
            target_rx: Arc::new(target_rx),
            actuation_tx,
            actuation_rx: Arc::new(actuation_rx),
        }
    }
}
