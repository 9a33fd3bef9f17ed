pub mod async_impl;
pub mod bus;
pub mod config;
pub mod controller;
pub mod ipc;
pub mod metrics;
pub mod sim;
pub mod threaded_impl;

pub use bus::{ActuationRequest, Envelope, GroundSpeedReading, GroundSpeedRequest};
pub use config::{load_config, ConfigError, RuntimeConfig};
pub use controller::driver::{ControlLoop, LoopStats, UpdateRouter};
pub use controller::pid::{PidConfig, PidController};
pub use ipc::channels::BusChannels;
pub use ipc::shared_state::{DiagnosticLog, SharedState, Snapshot};
pub use metrics::{MetricsReport, TimingMetrics};
