//! bundlebridge-worker - Serialized access to the container runtime
//!
//! This crate provides:
//! - [`BridgeWorker`] single-threaded FIFO execution context
//! - [`ShutdownHandle`] / [`ShutdownSignal`] shutdown signalling

mod shutdown;
mod worker;

pub use shutdown::{ShutdownHandle, ShutdownSignal};
pub use worker::{BridgeWorker, Job, WorkerConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{BridgeWorker, ShutdownHandle, ShutdownSignal, WorkerConfig};
}
