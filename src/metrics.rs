//! Metrics module - Timing histograms for the three flows

use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// TIMING METRICS - Thread-safe performance tracking
// ============================================================================

#[derive(Clone)]
pub struct TimingMetrics {
    tick_hist: Arc<Mutex<Histogram<u64>>>,
    publish_hist: Arc<Mutex<Histogram<u64>>>,
    ingest_hist: Arc<Mutex<Histogram<u64>>>,
    // Jitter tracking (variation between consecutive tick durations)
    last_tick_ns: Arc<AtomicU64>,
    jitter_hist: Arc<Mutex<Histogram<u64>>>,
}

impl TimingMetrics {
    pub fn new() -> Self {
        Self {
            tick_hist: Arc::new(Mutex::new(Histogram::new(3).unwrap())),
            publish_hist: Arc::new(Mutex::new(Histogram::new(3).unwrap())),
            ingest_hist: Arc::new(Mutex::new(Histogram::new(3).unwrap())),
            last_tick_ns: Arc::new(AtomicU64::new(0)),
            jitter_hist: Arc::new(Mutex::new(Histogram::new(3).unwrap())),
        }
    }

    /// Duration of one full tick body (snapshot + step + packaging).
    pub fn record_tick(&self, duration: Duration) {
        let nanos = duration.as_nanos() as u64;
        self.tick_hist.lock().record(nanos).ok();

        let last = self.last_tick_ns.swap(nanos, Ordering::Relaxed);
        if last > 0 {
            let jitter = nanos.abs_diff(last);
            self.jitter_hist.lock().record(jitter).ok();
        }
    }

    /// Time spent handing an actuation envelope to the transport channel.
    pub fn record_publish(&self, duration: Duration) {
        self.publish_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    /// Delivery latency of an inbound envelope, send time to ingest.
    pub fn record_ingest(&self, duration: Duration) {
        self.ingest_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    pub fn report(&self) -> MetricsReport {
        let tick = self.tick_hist.lock();
        let publish = self.publish_hist.lock();
        let ingest = self.ingest_hist.lock();
        let jitter = self.jitter_hist.lock();

        MetricsReport {
            tick_p50: Duration::from_nanos(tick.value_at_quantile(0.5)),
            tick_p99: Duration::from_nanos(tick.value_at_quantile(0.99)),
            publish_p50: Duration::from_nanos(publish.value_at_quantile(0.5)),
            publish_p99: Duration::from_nanos(publish.value_at_quantile(0.99)),
            ingest_p50: Duration::from_nanos(ingest.value_at_quantile(0.5)),
            ingest_p99: Duration::from_nanos(ingest.value_at_quantile(0.99)),
            jitter_p50: Duration::from_nanos(jitter.value_at_quantile(0.5)),
            jitter_p99: Duration::from_nanos(jitter.value_at_quantile(0.99)),
        }
    }
}

impl Default for TimingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// METRICS REPORT - Summary statistics
// ============================================================================

#[derive(Debug)]
pub struct MetricsReport {
    pub tick_p50: Duration,
    pub tick_p99: Duration,
    pub publish_p50: Duration,
    pub publish_p99: Duration,
    pub ingest_p50: Duration,
    pub ingest_p99: Duration,
    pub jitter_p50: Duration,
    pub jitter_p99: Duration,
}
