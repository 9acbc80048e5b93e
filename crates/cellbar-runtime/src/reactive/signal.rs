#![forbid(unsafe_code)]

//! Signal handles and writable roots.
//!
//! # Design
//!
//! A [`Signal<T>`] is a cheap, cloneable, read-only handle onto a node of the
//! derivation graph. Nodes come in two flavors:
//!
//! - **Hot** nodes ([`MutableSignal`], shared nodes) hold a current value and
//!   a subscriber list. Every subscriber sees the same emissions.
//! - **Cold** nodes (map, combine, distinct, switch) hold no state of their
//!   own. Each subscription builds a private chain of upstream
//!   subscriptions, torn down when the [`Subscription`] guard drops.
//!
//! Subscribing replays the node's current value synchronously (if it has
//! one), then delivers every subsequent change.
//!
//! # Invariants
//!
//! 1. `MutableSignal::set(v)` where `v == current` is a no-op: no version
//!    bump, no notification.
//! 2. Subscribers of a hot node are notified in registration order.
//! 3. `version` increments by exactly 1 per value-changing write.
//! 4. Public `subscribe` and its teardown run under the graph dispatcher's
//!    exclusivity, so they never interleave with a propagation.

use std::sync::{Arc, Mutex};

use super::dispatcher::Dispatcher;
use super::lock;
use super::subscription::{Observer, SubscriberList, Subscription};

/// Bound satisfied by every value that can flow through a signal.
pub trait SignalValue: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> SignalValue for T {}

/// A node of the derivation graph.
pub(crate) trait Source<T>: Send + Sync {
    /// Attach `observer`, replaying the current value if there is one.
    fn subscribe(self: Arc<Self>, observer: Observer<T>) -> Subscription;

    /// Current value without subscribing. Cold nodes derive it from their
    /// upstream's current values.
    fn current(&self) -> Option<T>;

    /// Observer count, for nodes that keep one.
    fn subscriber_count(&self) -> Option<usize> {
        None
    }

    /// Whether the node currently holds an upstream subscription.
    fn is_active(&self) -> Option<bool> {
        None
    }
}

/// Read-only handle onto a graph node.
pub struct Signal<T> {
    source: Arc<dyn Source<T>>,
    dispatcher: Dispatcher,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<T: SignalValue + std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl<T: SignalValue> Signal<T> {
    pub(crate) fn from_source(source: Arc<dyn Source<T>>, dispatcher: Dispatcher) -> Self {
        Self { source, dispatcher }
    }

    /// A signal that always holds `value`.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self::constant_in(&Dispatcher::new(), value)
    }

    /// A constant signal attached to an existing graph dispatcher.
    #[must_use]
    pub fn constant_in(dispatcher: &Dispatcher, value: T) -> Self {
        Self::from_source(Arc::new(ConstantNode { value }), dispatcher.clone())
    }

    /// Current value, if the node has one. Does not subscribe.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.source.current()
    }

    /// Attach a callback. It receives the current value immediately (if
    /// any), then every change, until the returned guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let observer: Observer<T> = Arc::new(callback);
        let source = Arc::clone(&self.source);
        let inner = self.dispatcher.exclusive(move || source.subscribe(observer));
        let dispatcher = self.dispatcher.clone();
        Subscription::new(move || dispatcher.exclusive(move || drop(inner)))
    }

    /// Observer count for hot nodes; `None` for cold nodes.
    #[must_use]
    pub fn subscriber_count(&self) -> Option<usize> {
        self.source.subscriber_count()
    }

    /// For shared nodes: whether the upstream is currently subscribed.
    #[must_use]
    pub fn is_active(&self) -> Option<bool> {
        self.source.is_active()
    }

    /// The dispatcher serializing this signal's graph.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Subscribe from inside the graph, where exclusivity is already held.
    pub(crate) fn subscribe_raw(&self, observer: Observer<T>) -> Subscription {
        Arc::clone(&self.source).subscribe(observer)
    }
}

struct ConstantNode<T> {
    value: T,
}

impl<T: SignalValue> Source<T> for ConstantNode<T> {
    fn subscribe(self: Arc<Self>, observer: Observer<T>) -> Subscription {
        observer(&self.value);
        Subscription::empty()
    }

    fn current(&self) -> Option<T> {
        Some(self.value.clone())
    }
}

struct MutableState<T> {
    value: T,
    version: u64,
    subscribers: SubscriberList<T>,
}

struct MutableNode<T> {
    state: Mutex<MutableState<T>>,
}

impl<T: SignalValue> MutableNode<T> {
    /// Apply `change`; notify if it reports a change.
    fn apply(&self, change: impl FnOnce(&mut T) -> bool) {
        let (value, subscribers) = {
            let mut state = lock(&self.state);
            if !change(&mut state.value) {
                return;
            }
            state.version += 1;
            (state.value.clone(), state.subscribers.snapshot())
        };
        for subscriber in &subscribers {
            subscriber.notify(&value);
        }
    }

    fn remove(&self, id: u64) {
        lock(&self.state).subscribers.remove(id);
    }
}

impl<T: SignalValue> Source<T> for MutableNode<T> {
    fn subscribe(self: Arc<Self>, observer: Observer<T>) -> Subscription {
        let (id, subscriber, value) = {
            let mut state = lock(&self.state);
            let (id, subscriber) = state.subscribers.add(observer);
            (id, subscriber, state.value.clone())
        };
        subscriber.notify(&value);
        Subscription::new(move || self.remove(id))
    }

    fn current(&self) -> Option<T> {
        Some(lock(&self.state).value.clone())
    }

    fn subscriber_count(&self) -> Option<usize> {
        Some(lock(&self.state).subscribers.len())
    }
}

/// A writable root of the graph.
///
/// Cloning creates a new handle to the **same** node. Writes are delivered
/// through the graph dispatcher: when no other thread is propagating, `set`
/// returns after every downstream observer has run.
pub struct MutableSignal<T> {
    node: Arc<MutableNode<T>>,
    dispatcher: Dispatcher,
}

impl<T> Clone for MutableSignal<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<T: SignalValue + std::fmt::Debug> std::fmt::Debug for MutableSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.node.state);
        f.debug_struct("MutableSignal")
            .field("value", &state.value)
            .field("version", &state.version)
            .field("subscriber_count", &state.subscribers.len())
            .finish()
    }
}

impl<T: SignalValue> MutableSignal<T> {
    /// Create a root on its own dispatcher.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::new_in(&Dispatcher::new(), value)
    }

    /// Create a root on a shared graph dispatcher.
    #[must_use]
    pub fn new_in(dispatcher: &Dispatcher, value: T) -> Self {
        Self {
            node: Arc::new(MutableNode {
                state: Mutex::new(MutableState {
                    value,
                    version: 0,
                    subscribers: SubscriberList::default(),
                }),
            }),
            dispatcher: dispatcher.clone(),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        lock(&self.node.state).value.clone()
    }

    /// Replace the value. Equal values are ignored.
    pub fn set(&self, value: T) {
        let node = Arc::clone(&self.node);
        self.dispatcher.dispatch(move || {
            node.apply(|current| {
                if *current == value {
                    false
                } else {
                    *current = value;
                    true
                }
            });
        });
    }

    /// Modify the value in place. Notifies only if the result differs.
    pub fn update(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        let node = Arc::clone(&self.node);
        self.dispatcher.dispatch(move || {
            node.apply(|current| {
                let before = current.clone();
                f(current);
                *current != before
            });
        });
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        lock(&self.node.state).version
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.node.state).subscribers.len()
    }

    /// Read-only handle for consumers.
    #[must_use]
    pub fn signal(&self) -> Signal<T> {
        Signal::from_source(self.node.clone(), self.dispatcher.clone())
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
