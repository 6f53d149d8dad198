//! Reactive primitives - signals and derivations.
//!
//! A [`Signal`] holds one value and a list of subscribers. Writing a new
//! value notifies every subscriber synchronously, on the calling thread,
//! before the write returns. [`compute`] and [`compute_async`] build
//! read-only-by-convention signals whose values are functions of other
//! signals.
//!
//! Everything here is single-threaded: signals are `Rc`-backed handles and
//! cloning a signal shares its state.

pub mod compute;
pub mod signal;

pub use compute::{compute, compute_async, set_async_spawner, Source};
pub use signal::{signal, Signal, Subscriber, Toggle, Truthy};
