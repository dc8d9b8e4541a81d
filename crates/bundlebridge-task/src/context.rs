//! Listener dispatch contexts
//!
//! A listener is bound to a [`Dispatch`] context at registration time and is
//! invoked on that context when the task completes. Two contexts exist:
//! [`Inline`] (run on whatever thread triggers the dispatch) and
//! [`EventLoop`] (an owned single-threaded loop with UI-affinity semantics).

use parking_lot::Mutex;
use std::thread::{self, JoinHandle, ThreadId};
use tokio::sync::mpsc;

/// A unit of work handed to a dispatch context
pub type Job = Box<dyn FnOnce() + Send>;

/// Execution context for listener dispatch
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, job: Job);
}

/// Runs jobs directly on the invoking thread
#[derive(Debug, Default, Clone, Copy)]
pub struct Inline;

impl Dispatch for Inline {
    fn dispatch(&self, job: Job) {
        job();
    }
}

/// An owned single-threaded event loop
///
/// Jobs posted from other threads run on the loop thread in submission
/// order; a job dispatched from the loop thread itself runs inline, so
/// re-entrant dispatch cannot deadlock. Dropping the loop closes the queue
/// and lets the thread drain and exit.
pub struct EventLoop {
    tx: Option<mpsc::UnboundedSender<Job>>,
    loop_thread: ThreadId,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl EventLoop {
    /// Spawn a new event loop with the given thread name
    pub fn new(name: impl Into<String>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let name = name.into();
        let builder = thread::Builder::new().name(name.clone());
        #[allow(clippy::expect_used)] // Safe: thread spawn only fails on OS resource exhaustion
        let handle = builder
            .spawn(move || {
                while let Some(job) = rx.blocking_recv() {
                    job();
                }
                tracing::debug!("event loop {name} drained");
            })
            .expect("failed to spawn event loop thread");

        Self {
            loop_thread: handle.thread().id(),
            tx: Some(tx),
            join: Mutex::new(Some(handle)),
        }
    }

    /// True when called from the loop's own thread
    pub fn on_loop_thread(&self) -> bool {
        thread::current().id() == self.loop_thread
    }
}

impl Dispatch for EventLoop {
    fn dispatch(&self, job: Job) {
        if self.on_loop_thread() {
            job();
            return;
        }
        if let Some(tx) = &self.tx
            && tx.send(job).is_err()
        {
            tracing::warn!("event loop closed, dropping dispatched job");
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        // closing the queue ends the loop; join unless we are the loop itself
        self.tx.take();
        if let Some(handle) = self.join.lock().take()
            && !self.on_loop_thread()
        {
            let _ = handle.join();
        }
    }
}
