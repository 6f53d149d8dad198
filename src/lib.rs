//! # weft
//!
//! Reactive signals and fluent DOM templating for Rust.
//!
//! weft is a minimal reactive UI toolkit with two layers:
//!
//! - [`reactive`] - `Signal<T>` value containers that notify subscribers
//!   synchronously on write, plus `compute`/`compute_async` for derived
//!   signals.
//! - [`templating`] - a fluent [`DomNode`] builder that wraps a single
//!   element. Every property setter accepts either a literal value or a
//!   signal; signal-backed properties stay in sync automatically through
//!   subscriptions registered at tree-construction time.
//!
//! The element model lives in [`dom`]: a retained in-memory tree exposing
//! the standard mutation primitives (attributes, class list, styles,
//! children, event handlers). A host renderer can walk it however it likes;
//! weft itself performs no I/O.
//!
//! ## Control flow
//!
//! ```text
//! signals → compute() derivations → DomNode bindings → element tree
//! ```
//!
//! Application code creates signals, composes derivations from them, and
//! passes both into builder methods. After construction there is no
//! re-render call: all updates flow through the subscription graph, fully
//! synchronously, on the calling thread.
//!
//! ## Example
//!
//! ```
//! use weft::{signal, compute, create};
//!
//! let count = signal(1);
//! let reader = count.clone();
//! let label = compute(move || format!("count: {}", reader.get()), &[&count]);
//!
//! let view = create("p").classes(vec!["counter".into()]).text(label);
//! let el = view.build();
//!
//! assert_eq!(el.text(), "count: 1");
//! count.set(5);
//! assert_eq!(el.text(), "count: 5");
//! ```

pub mod dom;
pub mod reactive;
pub mod templating;

// Re-export commonly used items as a flat surface
pub use reactive::{
    compute, compute_async, set_async_spawner, signal, Signal, Source, Subscriber, Toggle, Truthy,
};

pub use dom::{null_element, DomError, Element, Event, EventCallback, Namespace};

pub use templating::{
    as_signal, create, is_signal, signal_map, when, Arg, Child, DomNode, InputType, PropValue,
    WhenContent, WhenResult,
};
