#![forbid(unsafe_code)]

//! Runtime: the reactive signal engine and diff log behind cellbar.
//!
//! # Role in cellbar
//! `cellbar-runtime` knows nothing about telephony. It provides thread-safe,
//! synchronously propagating signals and the operators the mobile derivation
//! graph is assembled from, plus the bounded diff log used for diagnostics.
//!
//! # Primary responsibilities
//! - **reactive**: [`MutableSignal`], [`Signal`], the combinators, and the
//!   [`Dispatcher`] that gives each graph a total update order.
//! - **table_log**: [`TableLogBuffer`], a best-effort record of output
//!   transitions.
//!
//! # Example
//!
//! ```
//! use cellbar_runtime::{MutableSignal, combine};
//!
//! let level = MutableSignal::new(2);
//! let in_service = MutableSignal::new_in(level.dispatcher(), true);
//! let shown = combine(&level.signal(), &in_service.signal(), |level, up| {
//!     if *up { *level } else { 0 }
//! })
//! .distinct_until_changed()
//! .share(0);
//!
//! let _ui = shown.subscribe(|level| println!("bars: {level}"));
//! in_service.set(false);
//! assert_eq!(shown.value(), Some(0));
//! ```

pub mod reactive;
pub mod table_log;

pub use reactive::{
    Dispatcher, MutableSignal, Signal, SignalValue, Subscription, combine, combine3, combine4,
    combine5,
};
pub use table_log::{TableChange, TableLogBuffer, TableLogConfig};
