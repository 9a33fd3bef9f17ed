//! Async implementation - Tokio tasks mirroring the threaded flows

pub mod control_task;
pub mod update_task;
