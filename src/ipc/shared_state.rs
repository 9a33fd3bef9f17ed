use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;

// ============================================================================
// SHARED STATE - Latest known measurement and target
// ============================================================================

/// Consistent view of both values, taken while holding both locks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub measurement: f64,
    pub target: f64,
}

/// Latest measured speed and latest target speed, each behind its own lock.
///
/// The two values come from unrelated producers and are never written
/// together, so each gets an independent mutex; a measurement writer never
/// waits on a target writer. `None` means the value has not arrived yet, and
/// no snapshot is produced until both are present.
pub struct SharedState {
    measurement: Mutex<Option<f64>>,
    target: Mutex<Option<f64>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            measurement: Mutex::new(None),
            target: Mutex::new(None),
        }
    }

    /// Overwrite the stored measurement and mark it present.
    pub fn update_measurement(&self, value: f64) {
        *self.measurement.lock() = Some(value);
    }

    /// Overwrite the stored target and mark it present.
    pub fn update_target(&self, value: f64) {
        *self.target.lock() = Some(value);
    }

    /// Both values have been observed at least once.
    pub fn ready(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Read both values under both locks, or `None` while either is missing.
    ///
    /// Lock order is target then measurement, everywhere.
    pub fn snapshot(&self) -> Option<Snapshot> {
        let target = self.target.lock();
        let measurement = self.measurement.lock();
        match (*target, *measurement) {
            (Some(target), Some(measurement)) => Some(Snapshot {
                measurement,
                target,
            }),
            _ => None,
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// DIAGNOSTIC LOG - Bounded thread-safe log ring
// ============================================================================

#[derive(Clone)]
pub struct DiagnosticLog {
    entries: Arc<RwLock<VecDeque<String>>>,
    max_size: usize,
}

impl DiagnosticLog {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(max_size))),
            max_size,
        }
    }

    pub fn write(&self, message: String) {
        let mut log = self.entries.write();
        log.push_back(message);
        if log.len() > self.max_size {
            log.pop_front();
        }
    }

    pub fn read_all(&self) -> Vec<String> {
        self.entries.read().iter().cloned().collect()
    }

    /// Last `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> Vec<String> {
        let log = self.entries.read();
        log.iter().skip(log.len().saturating_sub(n)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
