#![forbid(unsafe_code)]

//! Dynamic re-subscription.
//!
//! `switch_latest` follows a signal of modes and, for each mode, subscribes
//! to the inner signal the selector picks. Each subscription owns one slot:
//!
//! ```text
//! slot { generation, inner: Option<Subscription> }
//! ```
//!
//! On a new mode the generation is bumped, the previous inner subscription is
//! taken out and dropped, and only then is the new inner subscribed. Inner
//! observers carry the generation they were created under and discard values
//! once it is stale, so nothing from a replaced pipeline is observed after
//! the switch.

use std::sync::{Arc, Mutex, Weak};

use super::lock;
use super::signal::{Signal, SignalValue, Source};
use super::subscription::{Observer, Subscription};

type Selector<M, T> = Arc<dyn Fn(&M) -> Signal<T> + Send + Sync>;

#[derive(Default)]
struct SwitchSlot {
    generation: u64,
    inner: Option<Subscription>,
}

struct SwitchNode<M, T> {
    modes: Signal<M>,
    selector: Selector<M, T>,
}

fn switch_to<T: SignalValue>(
    slot: &Arc<Mutex<SwitchSlot>>,
    inner_signal: &Signal<T>,
    observer: &Observer<T>,
) {
    let (generation, previous) = {
        let mut slot = lock(slot);
        slot.generation += 1;
        (slot.generation, slot.inner.take())
    };
    drop(previous);
    tracing::trace!(target: "cellbar::switch", generation, "switched inner signal");

    let gate: Weak<Mutex<SwitchSlot>> = Arc::downgrade(slot);
    let observer = Arc::clone(observer);
    let inner = inner_signal.subscribe_raw(Arc::new(move |value: &T| {
        let current = gate
            .upgrade()
            .is_some_and(|slot| lock(&slot).generation == generation);
        if current {
            observer(value);
        }
    }));

    let mut slot = lock(slot);
    if slot.generation == generation {
        slot.inner = Some(inner);
    } else {
        drop(slot);
        drop(inner);
    }
}

impl<M: SignalValue, T: SignalValue> Source<T> for SwitchNode<M, T> {
    fn subscribe(self: Arc<Self>, observer: Observer<T>) -> Subscription {
        let slot = Arc::new(Mutex::new(SwitchSlot::default()));

        let selector = Arc::clone(&self.selector);
        let mode_slot = Arc::clone(&slot);
        let modes = self.modes.subscribe_raw(Arc::new(move |mode: &M| {
            switch_to(&mode_slot, &selector(mode), &observer);
        }));

        Subscription::new(move || {
            drop(modes);
            let inner = {
                let mut slot = lock(&slot);
                slot.generation += 1;
                slot.inner.take()
            };
            drop(inner);
        })
    }

    fn current(&self) -> Option<T> {
        self.modes
            .value()
            .and_then(|mode| (self.selector)(&mode).value())
    }
}

impl<M: SignalValue> Signal<M> {
    /// Follow the inner signal chosen by `selector` for the latest mode,
    /// releasing the previous inner subscription before each switch.
    #[must_use]
    pub fn switch_latest<T: SignalValue>(
        &self,
        selector: impl Fn(&M) -> Signal<T> + Send + Sync + 'static,
    ) -> Signal<T> {
        let node = SwitchNode {
            modes: self.clone(),
            selector: Arc::new(selector),
        };
        Signal::from_source(Arc::new(node), self.dispatcher().clone())
    }
}
