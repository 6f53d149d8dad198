//! Derived signals - compute and compute_async.
//!
//! A derivation is a plain [`Signal`] seeded from a function of its source
//! signals and rewritten whenever a source reports `changed = true`. There
//! is no dirty-flagging and no coalescing: if two sources change inside one
//! synchronous cascade, the function runs twice, once per contributing
//! change event.
//!
//! Nothing marks a derived signal as derived. Code that writes to one
//! directly will silently break the derivation until the next source
//! change overwrites it again.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::signal::Signal;

// =============================================================================
// Source - type-erased signal for dependency lists
// =============================================================================

/// A type-erased signal that can be watched for write events.
///
/// This is the seam that lets [`compute`] take heterogeneous source lists:
/// `&[&count, &name]` works even though the signals carry different value
/// types, because the watcher only needs the `changed` flag.
pub trait Source {
    /// Register `f` as an unkeyed subscriber invoked with the changed flag
    /// on every write.
    fn watch(&self, f: Box<dyn Fn(bool)>);
}

impl<T: Clone + PartialEq + 'static> Source for Signal<T> {
    fn watch(&self, f: Box<dyn Fn(bool)>) {
        self.subscribe(move |_value, changed| f(changed));
    }
}

// =============================================================================
// compute
// =============================================================================

/// Build a derived signal from a pure function of one or more sources.
///
/// `f` is evaluated once immediately to seed the output signal. For each
/// source, an unkeyed subscription re-evaluates `f` over the *current*
/// values of all sources whenever that source reports `changed = true`,
/// and writes the result into the output (which cascades to its own
/// subscribers as usual). Writes with `changed = false` are ignored.
///
/// `f` reads its sources through the signal handles it captures; the
/// `sources` slice tells the derivation which write events to react to.
/// Listing a signal that `f` does not read is harmless; reading a signal
/// that is not listed means its changes will not trigger a recompute.
///
/// # Example
///
/// ```
/// use weft::{signal, compute};
///
/// let count = signal(1);
/// let reader = count.clone();
/// let doubled = compute(move || reader.get() * 2, &[&count]);
///
/// assert_eq!(doubled.get(), 2);
/// count.set(5);
/// assert_eq!(doubled.get(), 10);
/// ```
pub fn compute<R, F>(f: F, sources: &[&dyn Source]) -> Signal<R>
where
    R: Clone + PartialEq + 'static,
    F: Fn() -> R + 'static,
{
    let output = Signal::new(f());
    let f = Rc::new(f);

    for source in sources {
        let output = output.clone();
        let f = Rc::clone(&f);
        source.watch(Box::new(move |changed| {
            if changed {
                output.set(f());
            }
        }));
    }

    output
}

// =============================================================================
// compute_async
// =============================================================================

thread_local! {
    static SPAWNER: RefCell<Option<Rc<dyn Fn(LocalBoxFuture<'static, ()>)>>> =
        const { RefCell::new(None) };
}

/// Install the spawner used for [`compute_async`] recomputes.
///
/// A host with an event loop should hand recompute futures to it here.
/// Without a spawner, recomputes are driven to completion inline on the
/// writing thread, which serializes them; with a real spawner, overlapping
/// recomputes may resolve out of order and the last one to *complete*
/// wins - no sequencing is guaranteed.
pub fn set_async_spawner(spawner: impl Fn(LocalBoxFuture<'static, ()>) + 'static) {
    SPAWNER.with(|slot| *slot.borrow_mut() = Some(Rc::new(spawner)));
}

fn spawn_recompute(future: LocalBoxFuture<'static, ()>) {
    let spawner = SPAWNER.with(|slot| slot.borrow().clone());
    match spawner {
        Some(spawn) => spawn(future),
        None => futures::executor::block_on(future),
    }
}

/// Build a derived signal from an async function of one or more sources.
///
/// The initial value is awaited before the signal is constructed, so the
/// returned future resolves only after the first computation completes.
/// Subsequent `changed = true` source events start a fire-and-forget
/// recompute via the installed spawner (see [`set_async_spawner`]); the
/// recompute's completion writes the new value.
///
/// # Example
///
/// ```
/// use weft::{signal, compute_async};
///
/// let count = signal(2);
/// let reader = count.clone();
/// let watched = count.clone();
/// let squared = futures::executor::block_on(async move {
///     compute_async(
///         move || {
///             let reader = reader.clone();
///             async move { reader.get() * reader.get() }
///         },
///         &[&watched],
///     )
///     .await
/// });
///
/// assert_eq!(squared.get(), 4);
/// count.set(3);
/// assert_eq!(squared.get(), 9); // default spawner drives the recompute inline
/// ```
pub async fn compute_async<R, F, Fut>(f: F, sources: &[&dyn Source]) -> Signal<R>
where
    R: Clone + PartialEq + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = R> + 'static,
{
    let output = Signal::new(f().await);
    let f = Rc::new(f);

    for source in sources {
        let output = output.clone();
        let f = Rc::clone(&f);
        source.watch(Box::new(move |changed| {
            if !changed {
                return;
            }
            let future = f();
            let output = output.clone();
            spawn_recompute(Box::pin(async move {
                output.set(future.await);
            }));
        }));
    }

    output
}

// =============================================================================
// Tests
// =============================================================================
