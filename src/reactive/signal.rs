//! Signal - the reactive value container.
//!
//! A signal owns exactly one current value, an ordered list of unkeyed
//! subscribers, and a map of keyed subscribers (one callback per key, last
//! write wins). Writing through [`Signal::set`] notifies every subscriber
//! with `(new_value, changed)` where `changed` compares the new value
//! against the previous one with `PartialEq`.
//!
//! # Notification model
//!
//! Notification is synchronous and depth-first: a write's full cascade,
//! including writes to derived signals made by subscribers, completes
//! before `set` returns. There is no batching, no scheduling and no
//! recursion guard - a subscriber that writes back to a signal earlier in
//! the same cascade will recurse.
//!
//! A subscriber that panics propagates to the writer; subscribers later in
//! the list are not notified for that write.
//!
//! # Sharing
//!
//! `Signal<T>` is a cheap handle (`Rc` internally). Cloning it shares
//! state: writes through one clone are visible to all, exactly like
//! holding two references to the same container.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

// =============================================================================
// Subscriber
// =============================================================================

/// Subscriber callback, invoked with `(&new_value, changed)` on every write.
///
/// Using `Rc<dyn Fn>` gives each subscriber a stable identity: the same
/// handle passed to [`Signal::subscribe_rc`] twice fires twice, and
/// [`Signal::unsubscribe`] removes by handle identity (`Rc::ptr_eq`), not
/// by comparing behavior.
pub type Subscriber<T> = Rc<dyn Fn(&T, bool)>;

// =============================================================================
// Signal
// =============================================================================

struct Inner<T> {
    value: T,
    /// Unkeyed subscribers in subscription order. Duplicates allowed.
    unkeyed: Vec<Subscriber<T>>,
    /// Keyed subscribers; re-registering a key silently replaces the slot.
    keyed: HashMap<String, Subscriber<T>>,
}

/// A reactive container holding a value of type `T`.
///
/// # Example
///
/// ```
/// use weft::signal;
///
/// let count = signal(0);
/// let seen = std::rc::Rc::new(std::cell::Cell::new(0));
///
/// let seen_sub = seen.clone();
/// count.subscribe(move |v, _changed| seen_sub.set(*v));
///
/// count.set(5);
/// assert_eq!(count.get(), 5);
/// assert_eq!(seen.get(), 5);
/// ```
pub struct Signal<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

/// Create a new signal with the given initial value.
///
/// Free-function spelling of [`Signal::new`], for the common
/// `let count = signal(0);` idiom.
pub fn signal<T: Clone + PartialEq + 'static>(initial: T) -> Signal<T> {
    Signal::new(initial)
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    /// Create a new signal with the given initial value. Always succeeds.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value: initial,
                unkeyed: Vec::new(),
                keyed: HashMap::new(),
            })),
        }
    }

    /// Get a clone of the current value. No side effects.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Set a new value and synchronously notify every subscriber.
    ///
    /// Subscribers receive `(&value, changed)` where
    /// `changed = value != previous`. All unkeyed subscribers fire first,
    /// in subscription order, then keyed subscribers in unspecified order.
    /// Every subscriber fires on every write, changed or not - the flag
    /// tells them whether the value actually moved.
    pub fn set(&self, value: T) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let changed = value != inner.value;
            inner.value = value;
            changed
        };

        // Snapshot outside the borrow so subscribers can re-enter
        // (subscribe, set, unsubscribe) without aliasing the RefCell.
        let (current, unkeyed, keyed) = {
            let inner = self.inner.borrow();
            (
                inner.value.clone(),
                inner.unkeyed.clone(),
                inner.keyed.values().cloned().collect::<Vec<_>>(),
            )
        };

        for callback in &unkeyed {
            callback(&current, changed);
        }
        for callback in &keyed {
            callback(&current, changed);
        }
    }

    /// Update the value through a function of the current value.
    ///
    /// `f` runs against a snapshot of the current value, outside the
    /// signal's borrow, so it may freely write to this signal (through a
    /// clone) or to others. Its return value is written last.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let current = self.get();
        self.set(f(&current));
    }

    /// Append an unkeyed subscriber.
    ///
    /// Returns the `Rc` handle wrapping `f`; keep it if you intend to
    /// [`unsubscribe`](Signal::unsubscribe) later. Registering the same
    /// handle again via [`subscribe_rc`](Signal::subscribe_rc) makes it
    /// fire once per registration.
    pub fn subscribe<F>(&self, f: F) -> Subscriber<T>
    where
        F: Fn(&T, bool) + 'static,
    {
        let callback: Subscriber<T> = Rc::new(f);
        self.subscribe_rc(Rc::clone(&callback));
        callback
    }

    /// Append an existing subscriber handle to the unkeyed list.
    /// Duplicates are allowed and fire once each.
    pub fn subscribe_rc(&self, callback: Subscriber<T>) {
        self.inner.borrow_mut().unkeyed.push(callback);
    }

    /// Store a subscriber under `key`, silently replacing any previous
    /// callback registered under that key.
    ///
    /// This is the re-subscription idiom: code that runs repeatedly (say,
    /// once per render pass) can subscribe under a stable key without
    /// piling up duplicate handlers.
    pub fn subscribe_key<F>(&self, key: impl Into<String>, f: F) -> Subscriber<T>
    where
        F: Fn(&T, bool) + 'static,
    {
        let callback: Subscriber<T> = Rc::new(f);
        self.inner
            .borrow_mut()
            .keyed
            .insert(key.into(), Rc::clone(&callback));
        callback
    }

    /// Remove a subscriber by handle identity.
    ///
    /// Removes the first matching entry from the unkeyed list, and
    /// additionally sweeps keyed entries holding the same handle. The
    /// reverse is intentionally not true: [`unsubscribe_key`] only touches
    /// its key and [`unsubscribe_all`] only clears the unkeyed list.
    ///
    /// [`unsubscribe_key`]: Signal::unsubscribe_key
    /// [`unsubscribe_all`]: Signal::unsubscribe_all
    pub fn unsubscribe(&self, callback: &Subscriber<T>) {
        let mut inner = self.inner.borrow_mut();
        if let Some(position) = inner
            .unkeyed
            .iter()
            .position(|cb| Rc::ptr_eq(cb, callback))
        {
            inner.unkeyed.remove(position);
        }
        inner.keyed.retain(|_, cb| !Rc::ptr_eq(cb, callback));
    }

    /// Remove the keyed subscriber under `key`. No-op if absent.
    pub fn unsubscribe_key(&self, key: &str) {
        self.inner.borrow_mut().keyed.remove(key);
    }

    /// Clear every unkeyed subscriber. Keyed entries are untouched.
    pub fn unsubscribe_all(&self) {
        self.inner.borrow_mut().unkeyed.clear();
    }

    /// Number of registered subscribers (unkeyed + keyed). Diagnostics.
    pub fn subscriber_count(&self) -> usize {
        let inner = self.inner.borrow();
        inner.unkeyed.len() + inner.keyed.len()
    }

    /// Derive boolean-switched child signals from this signal's truthiness.
    ///
    /// For each `(key, toggle)` assignment, creates a child signal
    /// initialized from the current truthiness of this signal, then
    /// registers one unkeyed subscription that re-derives every child on
    /// each subsequent write. Returns the children keyed by name.
    ///
    /// Calling this again with more assignments adds another subscription;
    /// nothing dedupes across calls.
    ///
    /// # Example
    ///
    /// ```
    /// use weft::{signal, Toggle};
    ///
    /// let logged_in = signal(false);
    /// let labels = logged_in.bool_values(vec![(
    ///     "banner",
    ///     Toggle { on_true: "welcome back", on_false: "please sign in" },
    /// )]);
    ///
    /// assert_eq!(labels["banner"].get(), "please sign in");
    /// logged_in.set(true);
    /// assert_eq!(labels["banner"].get(), "welcome back");
    /// ```
    pub fn bool_values<U>(
        &self,
        assignments: Vec<(impl Into<String>, Toggle<U>)>,
    ) -> HashMap<String, Signal<U>>
    where
        T: Truthy,
        U: Clone + PartialEq + 'static,
    {
        let truthy = self.get().truthy();

        let mut children = HashMap::new();
        let mut bindings: Vec<(Signal<U>, Toggle<U>)> = Vec::new();
        for (key, toggle) in assignments {
            let child = Signal::new(toggle.pick(truthy).clone());
            children.insert(key.into(), child.clone());
            bindings.push((child, toggle));
        }

        self.subscribe(move |value: &T, _changed| {
            let truthy = value.truthy();
            for (child, toggle) in &bindings {
                child.set(toggle.pick(truthy).clone());
            }
        });

        children
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + Debug + 'static> Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.inner.borrow().value)
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// =============================================================================
// Toggle
// =============================================================================

/// A pair of values switched by a boolean, used by [`Signal::bool_values`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toggle<U> {
    pub on_true: U,
    pub on_false: U,
}

impl<U> Toggle<U> {
    fn pick(&self, truthy: bool) -> &U {
        if truthy {
            &self.on_true
        } else {
            &self.on_false
        }
    }
}

// =============================================================================
// Truthy
// =============================================================================

/// Loose boolean interpretation of a value, for [`Signal::bool_values`].
///
/// Mirrors the usual conventions: zero, empty and `None` are falsy.
pub trait Truthy {
    fn truthy(&self) -> bool;
}

impl Truthy for bool {
    fn truthy(&self) -> bool {
        *self
    }
}

macro_rules! impl_truthy_int {
    ($($ty:ty),*) => {
        $(impl Truthy for $ty {
            fn truthy(&self) -> bool {
                *self != 0
            }
        })*
    };
}

impl_truthy_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Truthy for f32 {
    fn truthy(&self) -> bool {
        *self != 0.0
    }
}

impl Truthy for f64 {
    fn truthy(&self) -> bool {
        *self != 0.0
    }
}

impl Truthy for String {
    fn truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for &'static str {
    fn truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Option<T> {
    fn truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T> Truthy for Vec<T> {
    fn truthy(&self) -> bool {
        !self.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
