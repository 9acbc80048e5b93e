#![forbid(unsafe_code)]

//! Subscription guards and subscriber bookkeeping for hot nodes.
//!
//! # Design
//!
//! A [`Subscription`] owns a teardown closure. Dropping the guard runs the
//! teardown synchronously, which removes the observer from its node and
//! drops whatever upstream subscriptions that observer held. Teardown
//! therefore propagates up the graph promptly, without a cleanup pass.
//!
//! Hot nodes keep their observers in a [`SubscriberList`]. Each entry carries
//! an `active` flag that is cleared on removal, so an observer removed while
//! a notification loop is in flight is skipped for the rest of that loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Callback receiving each value a node emits.
pub(crate) type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// RAII guard for an attached observer.
///
/// Dropping the `Subscription` detaches the observer and releases every
/// upstream resource acquired on its behalf.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub(crate) fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    /// Combine several subscriptions; they are released in order.
    pub(crate) fn merge(subscriptions: Vec<Subscription>) -> Self {
        Self::new(move || drop(subscriptions))
    }

    /// Detach now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("armed", &self.teardown.is_some())
            .finish()
    }
}

/// One attached observer.
pub(crate) struct Subscriber<T> {
    observer: Observer<T>,
    active: AtomicBool,
}

impl<T> Subscriber<T> {
    pub(crate) fn notify(&self, value: &T) {
        if self.active.load(Ordering::Acquire) {
            (self.observer)(value);
        }
    }
}

/// Observers of a hot node, in registration order.
pub(crate) struct SubscriberList<T> {
    next_id: u64,
    entries: Vec<(u64, Arc<Subscriber<T>>)>,
}

impl<T> Default for SubscriberList<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> SubscriberList<T> {
    pub(crate) fn add(&mut self, observer: Observer<T>) -> (u64, Arc<Subscriber<T>>) {
        let id = self.next_id;
        self.next_id += 1;
        let subscriber = Arc::new(Subscriber {
            observer,
            active: AtomicBool::new(true),
        });
        self.entries.push((id, Arc::clone(&subscriber)));
        (id, subscriber)
    }

    /// Remove and deactivate; returns false if `id` was already gone.
    pub(crate) fn remove(&mut self, id: u64) -> bool {
        match self.entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                let (_, subscriber) = self.entries.remove(index);
                subscriber.active.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<Subscriber<T>>> {
        self.entries
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn drop_runs_teardown_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let sub = Subscription::new(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 0);
        sub.unsubscribe();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn merge_releases_in_order() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let subs = (0..3)
            .map(|i| {
                let log = Arc::clone(&log);
                Subscription::new(move || log.lock().unwrap().push(i))
            })
            .collect();
        drop(Subscription::merge(subs));
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn removed_subscriber_is_skipped_by_live_snapshot() {
        let mut list: SubscriberList<i32> = SubscriberList::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        let (id, _) = list.add(Arc::new(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        }));
        let snapshot = list.snapshot();
        assert!(list.remove(id));
        assert!(!list.remove(id));
        for subscriber in &snapshot {
            subscriber.notify(&1);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn empty_subscription_debug() {
        let dbg = format!("{:?}", Subscription::empty());
        assert!(dbg.contains("armed: false"));
    }
}
