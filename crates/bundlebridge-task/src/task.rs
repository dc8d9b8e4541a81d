//! Single-assignment task with context-bound listeners
//!
//! State machine: `Pending -> Fulfilled(value)` or `Pending -> Rejected(error)`.
//! Terminal states are final; the first writer wins and later resolutions are
//! no-ops. Listener lists are snapshotted and cleared under the state lock at
//! the moment of transition and invoked after the lock is released, so a
//! listener registered concurrently with resolution fires exactly once and a
//! listener may safely re-enter the task.

use crate::context::{Dispatch, Inline};
use bundlebridge_core::{BridgeError, BridgeResult};
use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;

type SuccessListener<T> = Box<dyn FnOnce(Arc<T>) + Send>;
type FailureListener = Box<dyn FnOnce(BridgeError) + Send>;
type CompleteListener<T> = Box<dyn FnOnce(BridgeTask<T>) + Send>;

enum State<T> {
    Pending {
        success: Vec<(Arc<dyn Dispatch>, SuccessListener<T>)>,
        failure: Vec<(Arc<dyn Dispatch>, FailureListener)>,
        complete: Vec<(Arc<dyn Dispatch>, CompleteListener<T>)>,
    },
    Fulfilled(Arc<T>),
    Rejected(BridgeError),
}

struct Inner<T> {
    state: Mutex<State<T>>,
    /// Context used by the listener registrations that do not name one
    default_ctx: Arc<dyn Dispatch>,
}

/// Handle to a single-assignment asynchronous result
///
/// Cheap to clone; all clones observe the same state. Produced by
/// [`TaskSource`](crate::TaskSource).
pub struct BridgeTask<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for BridgeTask<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> BridgeTask<T> {
    pub(crate) fn new(default_ctx: Arc<dyn Dispatch>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::Pending {
                    success: Vec::new(),
                    failure: Vec::new(),
                    complete: Vec::new(),
                }),
                default_ctx,
            }),
        }
    }

    /// True once the task reached a terminal state
    pub fn is_complete(&self) -> bool {
        !matches!(&*self.inner.state.lock(), State::Pending { .. })
    }

    /// True once the task is terminal and fulfilled
    pub fn is_successful(&self) -> bool {
        matches!(&*self.inner.state.lock(), State::Fulfilled(_))
    }

    /// The fulfilled value, if any
    pub fn result(&self) -> Option<Arc<T>> {
        match &*self.inner.state.lock() {
            State::Fulfilled(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// The rejection error, if any
    pub fn error(&self) -> Option<BridgeError> {
        match &*self.inner.state.lock() {
            State::Rejected(e) => Some(e.clone()),
            _ => None,
        }
    }

    /// Register a success listener on the task's default context
    pub fn add_on_success_listener(
        &self,
        listener: impl FnOnce(Arc<T>) + Send + 'static,
    ) -> &Self {
        self.add_on_success_listener_on(self.inner.default_ctx.clone(), listener)
    }

    /// Register a success listener on an explicit context
    pub fn add_on_success_listener_on(
        &self,
        ctx: Arc<dyn Dispatch>,
        listener: impl FnOnce(Arc<T>) + Send + 'static,
    ) -> &Self {
        let boxed: SuccessListener<T> = Box::new(listener);
        let fire = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                State::Pending { success, .. } => {
                    success.push((ctx.clone(), boxed));
                    None
                }
                State::Fulfilled(v) => Some((v.clone(), boxed)),
                State::Rejected(_) => None,
            }
        };
        if let Some((value, listener)) = fire {
            ctx.dispatch(Box::new(move || listener(value)));
        }
        self
    }

    /// Register a failure listener on the task's default context
    pub fn add_on_failure_listener(
        &self,
        listener: impl FnOnce(BridgeError) + Send + 'static,
    ) -> &Self {
        self.add_on_failure_listener_on(self.inner.default_ctx.clone(), listener)
    }

    /// Register a failure listener on an explicit context
    pub fn add_on_failure_listener_on(
        &self,
        ctx: Arc<dyn Dispatch>,
        listener: impl FnOnce(BridgeError) + Send + 'static,
    ) -> &Self {
        let boxed: FailureListener = Box::new(listener);
        let fire = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                State::Pending { failure, .. } => {
                    failure.push((ctx.clone(), boxed));
                    None
                }
                State::Rejected(e) => Some((e.clone(), boxed)),
                State::Fulfilled(_) => None,
            }
        };
        if let Some((err, listener)) = fire {
            ctx.dispatch(Box::new(move || listener(err)));
        }
        self
    }

    /// Register a completion listener on the task's default context
    pub fn add_on_complete_listener(
        &self,
        listener: impl FnOnce(BridgeTask<T>) + Send + 'static,
    ) -> &Self {
        self.add_on_complete_listener_on(self.inner.default_ctx.clone(), listener)
    }

    /// Register a completion listener on an explicit context
    pub fn add_on_complete_listener_on(
        &self,
        ctx: Arc<dyn Dispatch>,
        listener: impl FnOnce(BridgeTask<T>) + Send + 'static,
    ) -> &Self {
        let boxed: CompleteListener<T> = Box::new(listener);
        let fire = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                State::Pending { complete, .. } => {
                    complete.push((ctx.clone(), boxed));
                    None
                }
                _ => Some(boxed),
            }
        };
        if let Some(listener) = fire {
            let task = self.clone();
            ctx.dispatch(Box::new(move || listener(task)));
        }
        self
    }

    /// Derive a new task by transforming this task once it completes
    ///
    /// The transform sees the finished parent (success or failure); an `Err`
    /// from the transform becomes the child's rejection.
    pub fn continue_with<R: Send + Sync + 'static>(
        &self,
        transform: impl FnOnce(&BridgeTask<T>) -> BridgeResult<R> + Send + 'static,
    ) -> BridgeTask<R> {
        let source = crate::TaskSource::with_context(self.inner.default_ctx.clone());
        let child = source.task();
        self.add_on_complete_listener_on(Arc::new(Inline), move |parent| {
            match transform(&parent) {
                Ok(value) => source.set_result(value),
                Err(err) => source.set_error(err),
            }
        });
        child
    }

    /// Like [`continue_with`](Self::continue_with), but the transform returns
    /// a task whose resolution is flattened into the child
    pub fn continue_with_task<R: Send + Sync + 'static>(
        &self,
        transform: impl FnOnce(&BridgeTask<T>) -> BridgeResult<BridgeTask<R>> + Send + 'static,
    ) -> BridgeTask<R> {
        let source = crate::TaskSource::with_context(self.inner.default_ctx.clone());
        let child = source.task();
        self.add_on_complete_listener_on(Arc::new(Inline), move |parent| {
            match transform(&parent) {
                Ok(next) => bind(&next, source),
                Err(err) => source.set_error(err),
            }
        });
        child
    }

    /// Flattening continuation invoked only on success
    ///
    /// A failed parent short-circuits to the child's rejection without
    /// invoking the transform.
    pub fn on_success_task<R: Send + Sync + 'static>(
        &self,
        transform: impl FnOnce(Arc<T>) -> BridgeResult<BridgeTask<R>> + Send + 'static,
    ) -> BridgeTask<R> {
        let source = crate::TaskSource::with_context(self.inner.default_ctx.clone());
        let child = source.task();
        self.add_on_complete_listener_on(Arc::new(Inline), move |parent| {
            let value = match parent.result() {
                Some(v) => v,
                None => {
                    let err = parent
                        .error()
                        .unwrap_or_else(|| BridgeError::runtime("task failed"));
                    source.set_error(err);
                    return;
                }
            };
            match transform(value) {
                Ok(next) => bind(&next, source),
                Err(err) => source.set_error(err),
            }
        });
        child
    }

    /// Transition to `Fulfilled`; no-op if already terminal
    pub(crate) fn resolve(&self, value: T) {
        self.resolve_shared(Arc::new(value));
    }

    /// Transition to `Fulfilled` with an already-shared value
    pub(crate) fn resolve_shared(&self, value: Arc<T>) {
        let (value, success, complete) = {
            let mut state = self.inner.state.lock();
            if !matches!(&*state, State::Pending { .. }) {
                return;
            }
            let old = mem::replace(&mut *state, State::Fulfilled(value.clone()));
            match old {
                State::Pending {
                    success, complete, ..
                } => (value, success, complete),
                // unreachable: checked Pending above while holding the lock
                _ => return,
            }
        };
        for (ctx, listener) in success {
            let value = value.clone();
            ctx.dispatch(Box::new(move || listener(value)));
        }
        for (ctx, listener) in complete {
            let task = self.clone();
            ctx.dispatch(Box::new(move || listener(task)));
        }
    }

    /// Transition to `Rejected`; no-op if already terminal
    pub(crate) fn reject(&self, err: BridgeError) {
        let (err, failure, complete) = {
            let mut state = self.inner.state.lock();
            if !matches!(&*state, State::Pending { .. }) {
                return;
            }
            let old = mem::replace(&mut *state, State::Rejected(err.clone()));
            match old {
                State::Pending {
                    failure, complete, ..
                } => (err, failure, complete),
                _ => return,
            }
        };
        for (ctx, listener) in failure {
            let err = err.clone();
            ctx.dispatch(Box::new(move || listener(err)));
        }
        for (ctx, listener) in complete {
            let task = self.clone();
            ctx.dispatch(Box::new(move || listener(task)));
        }
    }
}

/// Forward an inner task's resolution into `source` (flattening)
fn bind<R: Send + Sync + 'static>(inner: &BridgeTask<R>, source: crate::TaskSource<R>) {
    let on_failure = source.clone();
    inner
        .add_on_success_listener_on(Arc::new(Inline), move |value| {
            source.set_shared_result(value);
        })
        .add_on_failure_listener_on(Arc::new(Inline), move |err| {
            on_failure.set_error(err);
        });
}
