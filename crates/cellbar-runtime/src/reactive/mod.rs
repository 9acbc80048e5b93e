#![forbid(unsafe_code)]

//! Reactive signal engine for cellbar.
//!
//! This module provides the primitives the derivation graph is built from:
//!
//! - [`MutableSignal`]: a writable root holding a version-tracked value.
//! - [`Signal`]: a read-only handle onto any graph node, with the operators
//!   `map`, `distinct_until_changed`, `switch_latest`, `share` and
//!   `log_diffs`, plus the free functions [`combine`] .. [`combine5`].
//! - [`Subscription`]: RAII guard that tears its chain down on drop.
//! - [`Dispatcher`]: serializes propagation into one graph.
//!
//! # Architecture
//!
//! Nodes are `Arc`-shared and thread-safe. Writes enter the graph through the
//! dispatcher and propagate synchronously, depth first, to completion before
//! the next write is processed. Cold operators build per-subscription state;
//! `share` turns a cold chain into a hot node that is subscribed upstream only
//! while it has subscribers of its own.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per write that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op.
//! 4. Dropping a [`Subscription`] removes the observer immediately; it is
//!    never called again.
//! 5. `combine` emits nothing until every input has produced a value.

mod combine;
mod dispatcher;
mod operators;
mod share;
mod signal;
mod subscription;
mod switch;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use combine::{combine, combine3, combine4, combine5};
pub use dispatcher::Dispatcher;
pub use signal::{MutableSignal, Signal, SignalValue};
pub use subscription::Subscription;

/// Lock a node mutex, recovering the data if an observer panicked while it
/// was held. Node state is always left consistent between statements.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
