//! Shutdown signalling for the bridge worker

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

/// Handle for triggering worker shutdown
#[derive(Clone)]
pub struct ShutdownHandle {
    triggered: Arc<AtomicBool>,
    sender: broadcast::Sender<()>,
}

impl ShutdownHandle {
    /// Create a new shutdown handle
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            triggered: Arc::new(AtomicBool::new(false)),
            sender,
        }
    }

    /// Trigger shutdown; only the first trigger notifies
    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            let _ = self.sender.send(());
        }
    }

    /// Check if shutdown has been triggered
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Get a signal that can be used to detect shutdown
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            triggered: self.triggered.clone(),
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Signal for detecting shutdown from worker-adjacent threads
pub struct ShutdownSignal {
    triggered: Arc<AtomicBool>,
    receiver: broadcast::Receiver<()>,
}

impl ShutdownSignal {
    /// Check if shutdown has been triggered (non-blocking)
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Block the current thread until shutdown is triggered
    ///
    /// Returns immediately if already triggered.
    pub fn wait(&mut self) {
        if self.is_triggered() {
            return;
        }
        let _ = self.receiver.blocking_recv();
    }
}

impl Clone for ShutdownSignal {
    fn clone(&self) -> Self {
        Self {
            triggered: self.triggered.clone(),
            receiver: self.receiver.resubscribe(),
        }
    }
}
