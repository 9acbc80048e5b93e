#![forbid(unsafe_code)]

//! While-subscribed sharing.
//!
//! # Design
//!
//! A shared node is a reference-counted activation gate in front of a cold
//! chain. It caches the last value it saw and keeps its own subscriber list:
//!
//! ```text
//!   0 subscribers ──subscribe──▶ 1 subscriber: subscribe upstream
//!   n subscribers ──subscribe──▶ n+1: replay cached value only
//!   1 subscriber  ──release───▶ 0: drop upstream subscription now
//! ```
//!
//! Upstream emissions equal to the cached value are conflated, so a shared
//! node behaves like a state holder: consecutive duplicates never reach its
//! subscribers.
//!
//! # Invariants
//!
//! 1. The upstream subscription exists only while `subscribers > 0`.
//! 2. A new subscriber receives the cached value (or `initial`) first.
//! 3. The upstream observer holds the node weakly, so an idle node owns no
//!    cycle and is freed with its last handle.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Late release | Last subscriber leaves mid-activation | Epoch mismatch; new upstream dropped |

use std::sync::{Arc, Mutex, Weak};

use super::lock;
use super::signal::{Signal, SignalValue, Source};
use super::subscription::{Observer, SubscriberList, Subscription};

struct ShareState<T> {
    value: T,
    subscribers: SubscriberList<T>,
    upstream: Option<Subscription>,
    epoch: u64,
}

struct SharedNode<T> {
    upstream: Signal<T>,
    state: Mutex<ShareState<T>>,
}

impl<T: SignalValue> SharedNode<T> {
    fn activate(self: &Arc<Self>, epoch: u64) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let subscription = self.upstream.subscribe_raw(Arc::new(move |value: &T| {
            if let Some(node) = weak.upgrade() {
                node.publish(value);
            }
        }));

        let mut state = lock(&self.state);
        if state.epoch == epoch && !state.subscribers.is_empty() {
            state.upstream = Some(subscription);
            tracing::trace!(
                target: "cellbar::share",
                subscribers = state.subscribers.len(),
                "shared signal activated"
            );
        } else {
            drop(state);
            drop(subscription);
        }
    }

    fn publish(&self, value: &T) {
        let subscribers = {
            let mut state = lock(&self.state);
            if state.value == *value {
                return;
            }
            state.value = value.clone();
            state.subscribers.snapshot()
        };
        for subscriber in &subscribers {
            subscriber.notify(value);
        }
    }

    fn release(&self, id: u64) {
        let upstream = {
            let mut state = lock(&self.state);
            if !state.subscribers.remove(id) || !state.subscribers.is_empty() {
                return;
            }
            state.epoch += 1;
            state.upstream.take()
        };
        if upstream.is_some() {
            tracing::trace!(target: "cellbar::share", "shared signal deactivated");
        }
        drop(upstream);
    }
}

impl<T: SignalValue> Source<T> for SharedNode<T> {
    fn subscribe(self: Arc<Self>, observer: Observer<T>) -> Subscription {
        let (id, subscriber, cached, activation) = {
            let mut state = lock(&self.state);
            let (id, subscriber) = state.subscribers.add(observer);
            let activation = if state.subscribers.len() == 1 && state.upstream.is_none() {
                state.epoch += 1;
                Some(state.epoch)
            } else {
                None
            };
            (id, subscriber, state.value.clone(), activation)
        };

        subscriber.notify(&cached);
        if let Some(epoch) = activation {
            self.activate(epoch);
        }
        Subscription::new(move || self.release(id))
    }

    fn current(&self) -> Option<T> {
        Some(lock(&self.state).value.clone())
    }

    fn subscriber_count(&self) -> Option<usize> {
        Some(lock(&self.state).subscribers.len())
    }

    fn is_active(&self) -> Option<bool> {
        Some(lock(&self.state).upstream.is_some())
    }
}

impl<T: SignalValue> Signal<T> {
    /// Multicast this signal while at least one subscriber is attached.
    ///
    /// `initial` is replayed to subscribers until upstream produces a value.
    /// The returned handle reports [`Signal::subscriber_count`] and
    /// [`Signal::is_active`].
    #[must_use]
    pub fn share(&self, initial: T) -> Signal<T> {
        let node = SharedNode {
            upstream: self.clone(),
            state: Mutex::new(ShareState {
                value: initial,
                subscribers: SubscriberList::default(),
                upstream: None,
                epoch: 0,
            }),
        };
        Signal::from_source(Arc::new(node), self.dispatcher().clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::reactive::MutableSignal;
    use std::sync::{Arc, Mutex};

    #[test]
    fn activation_follows_subscriber_count() {
        let root = MutableSignal::new(1);
        let shared = root.signal().map(|v| v * 10).share(0);
        assert_eq!(shared.is_active(), Some(false));
        assert_eq!(root.subscriber_count(), 0);

        let first = shared.subscribe(|_| {});
        let second = shared.subscribe(|_| {});
        assert_eq!(shared.is_active(), Some(true));
        assert_eq!(shared.subscriber_count(), Some(2));
        assert_eq!(root.subscriber_count(), 1);

        drop(first);
        assert_eq!(shared.is_active(), Some(true));
        drop(second);
        assert_eq!(shared.is_active(), Some(false));
        assert_eq!(root.subscriber_count(), 0);
    }

    #[test]
    fn first_subscriber_sees_initial_then_upstream() {
        let root = MutableSignal::new(5);
        let shared = root.signal().share(0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = shared.subscribe(move |v: &i32| sink.lock().unwrap().push(*v));
        root.set(6);
        assert_eq!(*seen.lock().unwrap(), vec![0, 5, 6]);
    }

    #[test]
    fn late_subscriber_gets_cached_value() {
        let root = MutableSignal::new(1);
        let shared = root.signal().share(0);
        let _driver = shared.subscribe(|_| {});
        root.set(7);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _late = shared.subscribe(move |v: &i32| sink.lock().unwrap().push(*v));
        assert_eq!(*seen.lock().unwrap(), vec![7]);
    }

    #[test]
    fn equal_upstream_values_are_conflated() {
        let root = MutableSignal::new(1);
        let shared = root.signal().map(|v| v % 2).share(-1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = shared.subscribe(move |v: &i32| sink.lock().unwrap().push(*v));
        root.set(3);
        root.set(5);
        root.set(6);
        assert_eq!(*seen.lock().unwrap(), vec![-1, 1, 0]);
    }

    #[test]
    fn reactivation_replays_cache_then_resumes() {
        let root = MutableSignal::new(1);
        let shared = root.signal().share(0);
        drop(shared.subscribe(|_| {}));
        root.set(2);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = shared.subscribe(move |v: &i32| sink.lock().unwrap().push(*v));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }
}
