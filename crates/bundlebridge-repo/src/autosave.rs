//! Debounced autosave
//!
//! Repeated mutation signals are coalesced on the trailing edge into one
//! save submission. While a save is in flight, further fires re-arm the
//! debounce timer instead of submitting re-entrantly.

use bundlebridge_task::BridgeTask;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default debounce delay between the last mutation and the save
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(700);

struct TimerState {
    deadline: Option<Instant>,
    stopped: bool,
}

struct AutosaveInner {
    state: Mutex<TimerState>,
    cond: Condvar,
    saving: AtomicBool,
    delay: Duration,
    save: Box<dyn Fn() -> BridgeTask<bool> + Send + Sync>,
}

impl AutosaveInner {
    fn arm(&self) {
        let mut state = self.state.lock();
        state.deadline = Some(Instant::now() + self.delay);
        self.cond.notify_one();
    }

    fn fire(this: &Arc<Self>) {
        if this.saving.load(Ordering::SeqCst) {
            // a save is in flight: defer instead of re-entering
            this.arm();
            return;
        }
        this.saving.store(true, Ordering::SeqCst);

        let inner = this.clone();
        let task = (this.save)();
        task.add_on_complete_listener(move |t| {
            inner.saving.store(false, Ordering::SeqCst);
            if let Some(err) = t.error() {
                tracing::warn!("autosave failed: {err}");
            }
        });
    }
}

/// Trailing-edge debounce controller for background saves
///
/// `signal()` after every mutation; the save action runs once per burst,
/// `delay` after the last signal.
pub struct AutosaveController {
    inner: Arc<AutosaveInner>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AutosaveController {
    pub fn new(
        delay: Duration,
        save: impl Fn() -> BridgeTask<bool> + Send + Sync + 'static,
    ) -> Self {
        let inner = Arc::new(AutosaveInner {
            state: Mutex::new(TimerState {
                deadline: None,
                stopped: false,
            }),
            cond: Condvar::new(),
            saving: AtomicBool::new(false),
            delay,
            save: Box::new(save),
        });

        let timer = inner.clone();
        #[allow(clippy::expect_used)] // Safe: thread spawn only fails on OS resource exhaustion
        let handle = thread::Builder::new()
            .name("bundlebridge-autosave".to_string())
            .spawn(move || {
                loop {
                    let mut state = timer.state.lock();
                    if state.stopped {
                        break;
                    }
                    match state.deadline {
                        None => {
                            timer.cond.wait(&mut state);
                        }
                        Some(deadline) => {
                            if Instant::now() >= deadline {
                                state.deadline = None;
                                drop(state);
                                AutosaveInner::fire(&timer);
                            } else {
                                let _ = timer.cond.wait_until(&mut state, deadline);
                            }
                        }
                    }
                }
            })
            .expect("failed to spawn autosave timer thread");

        Self {
            inner,
            join: Mutex::new(Some(handle)),
        }
    }

    /// Record a mutation; (re)arms the trailing-edge timer
    pub fn signal(&self) {
        self.inner.arm();
    }

    /// True while a save submission is outstanding
    pub fn is_saving(&self) -> bool {
        self.inner.saving.load(Ordering::SeqCst)
    }

    /// Stop the timer thread; a save already in flight is unaffected
    pub fn stop(&self) {
        {
            let mut state = self.inner.state.lock();
            state.stopped = true;
            self.inner.cond.notify_one();
        }
        if let Some(handle) = self.join.lock().take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AutosaveController {
    fn drop(&mut self) {
        self.stop();
    }
}
