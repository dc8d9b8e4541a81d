//! Producer side of the task primitive

use crate::context::{Dispatch, Inline};
use crate::task::BridgeTask;
use bundlebridge_core::BridgeError;
use std::sync::Arc;

/// Single-assignment producer handle for a [`BridgeTask`]
///
/// The first `set_result`/`set_error` wins; later calls are silent no-ops.
/// Dropping the source without resolving leaves the task pending forever,
/// which is the declared fate of operations discarded at shutdown.
pub struct TaskSource<T> {
    task: BridgeTask<T>,
}

impl<T: Send + Sync + 'static> TaskSource<T> {
    /// Create a source whose task dispatches default listeners inline
    pub fn new() -> Self {
        Self::with_context(Arc::new(Inline))
    }

    /// Create a source whose task dispatches default listeners on `ctx`
    pub fn with_context(ctx: Arc<dyn Dispatch>) -> Self {
        Self {
            task: BridgeTask::new(ctx),
        }
    }

    /// The consumer handle
    pub fn task(&self) -> BridgeTask<T> {
        self.task.clone()
    }

    /// Fulfill the task
    pub fn set_result(&self, value: T) {
        self.task.resolve(value);
    }

    /// Fulfill the task with an already-shared value
    pub fn set_shared_result(&self, value: Arc<T>) {
        self.task.resolve_shared(value);
    }

    /// Reject the task
    pub fn set_error(&self, err: BridgeError) {
        self.task.reject(err);
    }
}

impl<T: Send + Sync + 'static> Default for TaskSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TaskSource<T> {
    fn clone(&self) -> Self {
        Self {
            task: self.task.clone(),
        }
    }
}
