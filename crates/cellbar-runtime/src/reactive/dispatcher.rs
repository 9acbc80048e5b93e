#![forbid(unsafe_code)]

//! Per-graph update serializer.
//!
//! # Design
//!
//! Raw inputs may be written from any thread, but a graph must see one
//! update at a time. A [`Dispatcher`] owns a FIFO of propagation jobs and an
//! `owner` slot naming the thread currently draining it:
//!
//! - [`Dispatcher::dispatch`] enqueues a job. If nobody owns the queue the
//!   caller becomes the owner and drains it before returning; otherwise the
//!   current owner runs the job after the one in progress.
//! - [`Dispatcher::exclusive`] runs a closure with ownership held. It is
//!   re-entrant on the owning thread and waits for ownership elsewhere. It is
//!   used for subscribe and unsubscribe so activation state changes never
//!   interleave with a propagation.
//!
//! # Invariants
//!
//! 1. At most one thread runs jobs or exclusive sections at any time.
//! 2. Jobs run in enqueue order, each to completion.
//! 3. A job enqueued from inside a running job runs after it, never nested.
//! 4. Ownership is released when the queue is observed empty, under the
//!    same lock that observed it, so no job is ever stranded.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Panicking job | Observer panics | Owner released on unwind; queue drains on next dispatch |
//! | Cross-thread write | Another thread owns the queue | `dispatch` returns before the job runs |

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

type Job = Box<dyn FnOnce() + Send>;

struct DispatchState {
    queue: VecDeque<Job>,
    owner: Option<ThreadId>,
}

struct DispatcherInner {
    state: Mutex<DispatchState>,
    idle: Condvar,
}

/// Serializes delivery of updates into one derivation graph.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Dispatcher")
            .field("queued", &state.queue.len())
            .field("owned", &state.owner.is_some())
            .finish()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                state: Mutex::new(DispatchState {
                    queue: VecDeque::new(),
                    owner: None,
                }),
                idle: Condvar::new(),
            }),
        }
    }

    /// True if both handles refer to the same queue.
    #[must_use]
    pub fn same_as(&self, other: &Dispatcher) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Enqueue a propagation job.
    pub fn dispatch(&self, job: impl FnOnce() + Send + 'static) {
        {
            let mut state = self.lock();
            state.queue.push_back(Box::new(job));
            if state.owner.is_some() {
                return;
            }
            state.owner = Some(thread::current().id());
        }
        let _release = ReleaseOnUnwind(self);
        self.drain_and_release();
    }

    /// Run `f` while holding ownership of the queue.
    pub fn exclusive<R>(&self, f: impl FnOnce() -> R) -> R {
        let me = thread::current().id();
        {
            let mut state = self.lock();
            if state.owner == Some(me) {
                drop(state);
                return f();
            }
            while state.owner.is_some() {
                state = self
                    .inner
                    .idle
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            state.owner = Some(me);
        }
        let _release = ReleaseOnUnwind(self);
        let result = f();
        self.drain_and_release();
        result
    }

    /// Number of jobs waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    fn drain_and_release(&self) {
        loop {
            let job = {
                let mut state = self.lock();
                match state.queue.pop_front() {
                    Some(job) => job,
                    None => {
                        state.owner = None;
                        drop(state);
                        self.inner.idle.notify_all();
                        return;
                    }
                }
            };
            job();
        }
    }

    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

struct ReleaseOnUnwind<'a>(&'a Dispatcher);

impl Drop for ReleaseOnUnwind<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.lock().owner = None;
            self.0.inner.idle.notify_all();
        }
    }
}
