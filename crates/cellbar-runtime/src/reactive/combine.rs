#![forbid(unsafe_code)]

//! Combine-latest over two to five signals.
//!
//! Each subscription keeps the latest value seen from every input. Nothing
//! is emitted until all inputs have produced a value; after that, every
//! upstream emission recomputes the output exactly once from the most recent
//! value of each input. Wider arities nest the binary form over tuples.

use std::sync::{Arc, Mutex};

use super::lock;
use super::signal::{Signal, SignalValue, Source};
use super::subscription::{Observer, Subscription};

type Combiner<A, B, R> = Arc<dyn Fn(&A, &B) -> R + Send + Sync>;
type Latest<A, B> = Arc<Mutex<(Option<A>, Option<B>)>>;

struct CombineNode<A, B, R> {
    a: Signal<A>,
    b: Signal<B>,
    f: Combiner<A, B, R>,
}

fn emit_if_ready<A: SignalValue, B: SignalValue, R>(
    latest: &Latest<A, B>,
    f: &Combiner<A, B, R>,
    observer: &Observer<R>,
) {
    let pair = {
        let latest = lock(latest);
        match (&latest.0, &latest.1) {
            (Some(a), Some(b)) => Some((a.clone(), b.clone())),
            _ => None,
        }
    };
    if let Some((a, b)) = pair {
        observer(&f(&a, &b));
    }
}

impl<A: SignalValue, B: SignalValue, R: SignalValue> Source<R> for CombineNode<A, B, R> {
    fn subscribe(self: Arc<Self>, observer: Observer<R>) -> Subscription {
        let latest: Latest<A, B> = Arc::new(Mutex::new((None, None)));

        let first = {
            let (latest, f, observer) =
                (Arc::clone(&latest), Arc::clone(&self.f), Arc::clone(&observer));
            self.a.subscribe_raw(Arc::new(move |value: &A| {
                lock(&latest).0 = Some(value.clone());
                emit_if_ready(&latest, &f, &observer);
            }))
        };
        let second = {
            let f = Arc::clone(&self.f);
            self.b.subscribe_raw(Arc::new(move |value: &B| {
                lock(&latest).1 = Some(value.clone());
                emit_if_ready(&latest, &f, &observer);
            }))
        };

        Subscription::merge(vec![first, second])
    }

    fn current(&self) -> Option<R> {
        let a = self.a.value()?;
        let b = self.b.value()?;
        Some((self.f)(&a, &b))
    }
}

/// Combine the latest values of two signals.
///
/// Both inputs must belong to the same graph [`Dispatcher`](super::Dispatcher);
/// debug builds assert it.
#[must_use]
pub fn combine<A, B, R>(
    a: &Signal<A>,
    b: &Signal<B>,
    f: impl Fn(&A, &B) -> R + Send + Sync + 'static,
) -> Signal<R>
where
    A: SignalValue,
    B: SignalValue,
    R: SignalValue,
{
    debug_assert!(
        a.dispatcher().same_as(b.dispatcher()),
        "combined signals must share one dispatcher"
    );
    let node = CombineNode {
        a: a.clone(),
        b: b.clone(),
        f: Arc::new(f),
    };
    Signal::from_source(Arc::new(node), a.dispatcher().clone())
}

/// Combine the latest values of three signals.
#[must_use]
pub fn combine3<A, B, C, R>(
    a: &Signal<A>,
    b: &Signal<B>,
    c: &Signal<C>,
    f: impl Fn(&A, &B, &C) -> R + Send + Sync + 'static,
) -> Signal<R>
where
    A: SignalValue,
    B: SignalValue,
    C: SignalValue,
    R: SignalValue,
{
    let ab = combine(a, b, |a, b| (a.clone(), b.clone()));
    combine(&ab, c, move |(a, b), c| f(a, b, c))
}

/// Combine the latest values of four signals.
#[must_use]
pub fn combine4<A, B, C, D, R>(
    a: &Signal<A>,
    b: &Signal<B>,
    c: &Signal<C>,
    d: &Signal<D>,
    f: impl Fn(&A, &B, &C, &D) -> R + Send + Sync + 'static,
) -> Signal<R>
where
    A: SignalValue,
    B: SignalValue,
    C: SignalValue,
    D: SignalValue,
    R: SignalValue,
{
    let abc = combine3(a, b, c, |a, b, c| (a.clone(), b.clone(), c.clone()));
    combine(&abc, d, move |(a, b, c), d| f(a, b, c, d))
}

/// Combine the latest values of five signals.
#[must_use]
pub fn combine5<A, B, C, D, E, R>(
    a: &Signal<A>,
    b: &Signal<B>,
    c: &Signal<C>,
    d: &Signal<D>,
    e: &Signal<E>,
    f: impl Fn(&A, &B, &C, &D, &E) -> R + Send + Sync + 'static,
) -> Signal<R>
where
    A: SignalValue,
    B: SignalValue,
    C: SignalValue,
    D: SignalValue,
    E: SignalValue,
    R: SignalValue,
{
    let abcd = combine4(a, b, c, d, |a, b, c, d| {
        (a.clone(), b.clone(), c.clone(), d.clone())
    });
    combine(&abcd, e, move |(a, b, c, d), e| f(a, b, c, d, e))
}
