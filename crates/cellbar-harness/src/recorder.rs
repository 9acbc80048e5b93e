#![forbid(unsafe_code)]

//! Value recorders for signal outputs.

use std::sync::{Arc, Mutex, PoisonError};

use cellbar_runtime::{Signal, SignalValue, Subscription};

/// Subscribes to a signal and keeps every value it receives.
///
/// The subscription lives as long as the recorder; dropping the recorder
/// releases the upstream graph.
pub struct SignalRecorder<T> {
    values: Arc<Mutex<Vec<T>>>,
    _subscription: Subscription,
}

impl<T: SignalValue> SignalRecorder<T> {
    #[must_use]
    pub fn attach(signal: &Signal<T>) -> Self {
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        let subscription = signal.subscribe(move |value: &T| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(value.clone());
        });
        Self {
            values,
            _subscription: subscription,
        }
    }

    /// All values received so far, oldest first.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent value.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget recorded values, keeping the subscription.
    pub fn clear(&self) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SignalRecorder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("SignalRecorder")
            .field("values", &*values)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellbar_runtime::MutableSignal;

    #[test]
    fn records_replay_then_changes() {
        let root = MutableSignal::new(1);
        let recorder = SignalRecorder::attach(&root.signal());
        root.set(2);
        root.set(2);
        root.set(3);
        assert_eq!(recorder.values(), vec![1, 2, 3]);
        assert_eq!(recorder.last(), Some(3));
        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn drop_detaches() {
        let root = MutableSignal::new(0);
        let recorder = SignalRecorder::attach(&root.signal());
        assert_eq!(root.subscriber_count(), 1);
        drop(recorder);
        assert_eq!(root.subscriber_count(), 0);
    }
}
