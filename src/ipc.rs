//! IPC module - Channels between the bus flows and the shared controller state

pub mod channels;
pub mod shared_state;
