#![forbid(unsafe_code)]

//! Stateless and per-subscription operators: `map`, `distinct_until_changed`
//! and `log_diffs`.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use super::lock;
use super::signal::{Signal, SignalValue, Source};
use super::subscription::{Observer, Subscription};
use crate::table_log::TableLogBuffer;

struct MapNode<S, T> {
    upstream: Signal<S>,
    f: Arc<dyn Fn(&S) -> T + Send + Sync>,
}

impl<S: SignalValue, T: SignalValue> Source<T> for MapNode<S, T> {
    fn subscribe(self: Arc<Self>, observer: Observer<T>) -> Subscription {
        let f = Arc::clone(&self.f);
        self.upstream
            .subscribe_raw(Arc::new(move |value: &S| observer(&f(value))))
    }

    fn current(&self) -> Option<T> {
        self.upstream.value().map(|value| (self.f)(&value))
    }
}

struct DistinctNode<T> {
    upstream: Signal<T>,
}

impl<T: SignalValue> Source<T> for DistinctNode<T> {
    fn subscribe(self: Arc<Self>, observer: Observer<T>) -> Subscription {
        let last: Mutex<Option<T>> = Mutex::new(None);
        self.upstream.subscribe_raw(Arc::new(move |value: &T| {
            {
                let mut last = lock(&last);
                if last.as_ref() == Some(value) {
                    return;
                }
                *last = Some(value.clone());
            }
            observer(value);
        }))
    }

    fn current(&self) -> Option<T> {
        self.upstream.value()
    }
}

struct LogDiffsNode<T> {
    upstream: Signal<T>,
    buffer: TableLogBuffer,
    column: Arc<str>,
    initial: T,
}

impl<T: SignalValue + Debug> Source<T> for LogDiffsNode<T> {
    fn subscribe(self: Arc<Self>, observer: Observer<T>) -> Subscription {
        let previous = Mutex::new(self.initial.clone());
        let buffer = self.buffer.clone();
        let column = Arc::clone(&self.column);
        self.upstream.subscribe_raw(Arc::new(move |value: &T| {
            {
                let mut previous = lock(&previous);
                if *previous != *value {
                    buffer.record(&column, &*previous, value);
                    *previous = value.clone();
                }
            }
            observer(value);
        }))
    }

    fn current(&self) -> Option<T> {
        self.upstream.value()
    }
}

impl<T: SignalValue> Signal<T> {
    /// Transform every value with `f`.
    #[must_use]
    pub fn map<R: SignalValue>(&self, f: impl Fn(&T) -> R + Send + Sync + 'static) -> Signal<R> {
        let node = MapNode {
            upstream: self.clone(),
            f: Arc::new(f),
        };
        Signal::from_source(Arc::new(node), self.dispatcher().clone())
    }

    /// Suppress values equal to the previous one. The first value always
    /// passes.
    #[must_use]
    pub fn distinct_until_changed(&self) -> Signal<T> {
        let node = DistinctNode {
            upstream: self.clone(),
        };
        Signal::from_source(Arc::new(node), self.dispatcher().clone())
    }

    /// Record each transition into `buffer` under `column`, starting from
    /// `initial`. Values are forwarded unchanged.
    #[must_use]
    pub fn log_diffs(&self, buffer: &TableLogBuffer, column: &str, initial: T) -> Signal<T>
    where
        T: Debug,
    {
        let node = LogDiffsNode {
            upstream: self.clone(),
            buffer: buffer.clone(),
            column: Arc::from(column),
            initial,
        };
        Signal::from_source(Arc::new(node), self.dispatcher().clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::reactive::MutableSignal;
    use crate::table_log::{TableLogBuffer, TableLogConfig};
    use std::sync::{Arc, Mutex};

    fn collect<T: crate::reactive::SignalValue>(
        signal: &crate::reactive::Signal<T>,
    ) -> (Arc<Mutex<Vec<T>>>, crate::reactive::Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = signal.subscribe(move |v: &T| sink.lock().unwrap().push(v.clone()));
        (seen, sub)
    }

    #[test]
    fn map_recomputes_on_change() {
        let root = MutableSignal::new(2);
        let doubled = root.signal().map(|v| v * 2);
        assert_eq!(doubled.value(), Some(4));
        let (seen, _sub) = collect(&doubled);
        root.set(5);
        assert_eq!(*seen.lock().unwrap(), vec![4, 10]);
    }

    #[test]
    fn distinct_suppresses_repeats() {
        let root = MutableSignal::new(1);
        let (seen, _sub) = collect(&root.signal().map(|v| v / 10).distinct_until_changed());
        for v in [2, 3, 11, 12, 25, 9] {
            root.set(v);
        }
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 0]);
    }

    #[test]
    fn log_diffs_records_changes_only() {
        let log = TableLogBuffer::new("test", &TableLogConfig::default());
        let root = MutableSignal::new(false);
        let logged = root.signal().log_diffs(&log, "flag", false);
        let (seen, _sub) = collect(&logged);
        root.set(true);
        root.set(false);

        assert_eq!(*seen.lock().unwrap(), vec![false, true, false]);
        let rows = log.column("flag");
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].previous.as_str(), rows[0].current.as_str()), ("false", "true"));
        assert_eq!((rows[1].previous.as_str(), rows[1].current.as_str()), ("true", "false"));
    }

    #[test]
    fn log_diffs_records_first_value_when_it_differs_from_initial() {
        let log = TableLogBuffer::new("test", &TableLogConfig::default());
        let root = MutableSignal::new(3);
        let (_seen, _sub) = collect(&root.signal().log_diffs(&log, "level", 0));
        let rows = log.entries();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].previous, "0");
        assert_eq!(rows[0].current, "3");
    }
}
