//! Serialized bridge worker
//!
//! A long-lived single-threaded execution context draining an explicit FIFO
//! queue. All bridge operations against the container runtime are submitted
//! here, which makes the runtime single-writer by construction: at most one
//! operation is in flight at any instant, and two operations submitted in
//! order A-then-B observe runtime state in that order.

use crate::shutdown::{ShutdownHandle, ShutdownSignal};
use bundlebridge_core::{BridgeError, BridgeResult};
use parking_lot::Mutex;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;

/// A queued bridge operation
pub type Job = Box<dyn FnOnce() + Send>;

/// Configuration for the bridge worker
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Name for the worker thread
    pub thread_name: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            thread_name: "bundlebridge-worker".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Create a new worker configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker thread name
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// Single-threaded FIFO worker owning exclusive runtime access
///
/// Shutdown semantics: queued-but-not-started jobs are dropped, the
/// in-flight job runs to completion uninterrupted.
pub struct BridgeWorker {
    tx: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    shutdown: ShutdownHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl BridgeWorker {
    /// Spawn the worker thread with the given configuration
    pub fn new(config: WorkerConfig) -> BridgeResult<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let shutdown = ShutdownHandle::new();
        let stop = shutdown.clone();
        let name = config.thread_name.clone();

        let handle = thread::Builder::new()
            .name(config.thread_name)
            .spawn(move || {
                while let Some(job) = rx.blocking_recv() {
                    if stop.is_triggered() {
                        // queued before shutdown, never started: dropped
                        continue;
                    }
                    job();
                }
                tracing::debug!("bridge worker {name} stopped");
            })
            .map_err(|e| BridgeError::runtime(format!("failed to spawn bridge worker: {e}")))?;

        Ok(Self {
            tx: Mutex::new(Some(tx)),
            shutdown,
            join: Mutex::new(Some(handle)),
        })
    }

    /// Spawn a worker with default configuration
    pub fn with_defaults() -> BridgeResult<Self> {
        Self::new(WorkerConfig::default())
    }

    /// Enqueue an operation; FIFO relative to every other submission
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) -> BridgeResult<()> {
        if self.shutdown.is_triggered() {
            return Err(BridgeError::runtime("bridge worker is shut down"));
        }
        let guard = self.tx.lock();
        match guard.as_ref() {
            Some(tx) => tx
                .send(Box::new(job))
                .map_err(|_| BridgeError::runtime("bridge worker queue closed")),
            None => Err(BridgeError::runtime("bridge worker is shut down")),
        }
    }

    /// Check if shutdown has been triggered
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// Get a signal that observes this worker's shutdown
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Stop accepting work and wait for the in-flight operation
    ///
    /// Closing the queue wakes the worker loop; jobs still queued are
    /// received and dropped unrun.
    pub fn stop(&self) {
        self.shutdown.trigger();
        self.tx.lock().take();
        if let Some(handle) = self.join.lock().take()
            && handle.thread().id() != thread::current().id()
        {
            let _ = handle.join();
        }
    }
}

impl Drop for BridgeWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "worker/worker_tests.rs"]
mod worker_tests;
