//! Control flow - conditional and list rendering.
//!
//! [`when`] flips one child slot between real content and a hidden
//! placeholder as a boolean condition changes. [`signal_map`] re-renders a
//! wrapper's whole child list from an array signal.
//!
//! Both are built from the same primitives application code uses: signals,
//! subscriptions, and the element mutation API. Neither diffs anything.

use std::cell::Cell;
use std::rc::Rc;

use crate::dom::{null_element, Element};
use crate::reactive::Signal;
use crate::templating::node::DomNode;
use crate::templating::types::{Child, PropValue, WhenContent};

// =============================================================================
// when
// =============================================================================

/// Result of [`when`]: reactive for signal conditions, plain for literal
/// ones. Either way it converts into a [`Child`].
pub enum WhenResult {
    /// Signal condition: the element signal flips between the resolved
    /// content and a hidden placeholder as the condition changes.
    Reactive(Signal<Element>),
    /// Literal condition: evaluated once, no reactivity.
    Static(Element),
}

impl WhenResult {
    /// The element currently occupying the slot.
    pub fn element(&self) -> Element {
        match self {
            WhenResult::Reactive(s) => s.get(),
            WhenResult::Static(el) => el.clone(),
        }
    }
}

impl From<WhenResult> for Child {
    fn from(result: WhenResult) -> Self {
        match result {
            WhenResult::Reactive(s) => Child::Signal(s),
            WhenResult::Static(el) => Child::Element(el),
        }
    }
}

/// Conditionally show content.
///
/// With a signal condition, returns a reactive slot whose element flips
/// between the resolved content and a fresh hidden placeholder whenever
/// the effective boolean (`condition XOR inverted`) changes. Factory
/// content is invoked lazily and re-invoked on every flip to shown, so
/// each appearance is a fresh element. Writes that do not flip the
/// effective boolean re-resolve nothing.
///
/// With a literal condition, the choice is evaluated once and a plain
/// element comes back - no subscription, no reactivity. The two shapes are
/// intentional: the caller's condition type decides whether the slot is
/// live.
///
/// # Example
///
/// ```
/// use weft::{create, signal, when, WhenContent};
///
/// let open = signal(false);
/// let panel = when(
///     open.clone(),
///     WhenContent::factory(|| create("aside").text("settings")),
///     false,
/// );
/// let el = create("div").children(vec![panel.into()]).build();
///
/// assert!(el.children()[0].hidden(), "closed: placeholder in the slot");
/// open.set(true);
/// assert_eq!(el.children()[0].text(), "settings");
/// ```
pub fn when(
    condition: impl Into<PropValue<bool>>,
    content: impl Into<WhenContent>,
    inverted: bool,
) -> WhenResult {
    let content = content.into();
    let resolve = Rc::new(move |shown: bool| -> Element {
        if shown {
            match &content {
                WhenContent::Element(el) => el.clone(),
                WhenContent::Factory(f) => f().build(),
            }
        } else {
            null_element()
        }
    });

    match condition.into() {
        // An absent condition is falsy; inversion still applies.
        PropValue::Unset => WhenResult::Static(resolve(inverted)),
        PropValue::Static(value) => WhenResult::Static(resolve(value ^ inverted)),
        PropValue::Signal(s) => {
            let shown = s.get() ^ inverted;
            let slot = Signal::new(resolve(shown));

            let previous = Cell::new(shown);
            let slot_writer = slot.clone();
            let resolve = Rc::clone(&resolve);
            s.subscribe(move |value, _changed| {
                let shown = *value ^ inverted;
                if shown == previous.get() {
                    return;
                }
                previous.set(shown);
                slot_writer.set(resolve(shown));
            });

            WhenResult::Reactive(slot)
        }
    }
}

// =============================================================================
// signal_map
// =============================================================================

/// Keep a wrapper's child list projected from an array signal.
///
/// On every write to `items` - including the initial value - each item is
/// projected to an element via `to_element` and the wrapper's entire child
/// list is replaced. With `sequential`, existing children are cleared
/// first and new ones appended one at a time; the end state is identical,
/// only the intermediate churn differs, which can matter to a host
/// observing mutations.
///
/// Returns the wrapper builder for further chaining.
///
/// # Example
///
/// ```
/// use weft::{create, signal, signal_map};
///
/// let items = signal(vec!["a".to_string(), "b".to_string()]);
/// let list = signal_map(
///     &items,
///     create("ul"),
///     |item| create("li").text(item.clone()),
///     false,
/// );
/// let el = list.build();
///
/// assert_eq!(el.child_count(), 2);
/// items.set(vec!["c".to_string()]);
/// assert_eq!(el.child_count(), 1);
/// assert_eq!(el.children()[0].text(), "c");
/// ```
pub fn signal_map<T>(
    items: &Signal<Vec<T>>,
    wrapper: DomNode,
    to_element: impl Fn(&T) -> DomNode + 'static,
    sequential: bool,
) -> DomNode
where
    T: Clone + PartialEq + 'static,
{
    let el = wrapper.build();
    let render = Rc::new(move |items: &Vec<T>| {
        if sequential {
            el.clear_children();
            for item in items {
                el.append_child(&to_element(item).build());
            }
        } else {
            let children: Vec<Element> =
                items.iter().map(|item| to_element(item).build()).collect();
            el.set_children(children);
        }
    });

    render(&items.get());

    let render_on_write = Rc::clone(&render);
    items.subscribe(move |items, _changed| render_on_write(items));

    wrapper
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::signal;
    use crate::templating::node::create;
    use std::cell::Cell;

    #[test]
    fn test_when_static_true_resolves_content() {
        let content = Element::new("p");
        let result = when(true, content.clone(), false);
        assert!(matches!(result, WhenResult::Static(_)));
        assert_eq!(result.element(), content);
    }

    #[test]
    fn test_when_static_false_resolves_placeholder() {
        let result = when(false, Element::new("p"), false);
        assert!(result.element().hidden());
    }

    #[test]
    fn test_when_inverted_flips_the_condition() {
        let content = Element::new("p");
        assert!(when(true, content.clone(), true).element().hidden());
        assert_eq!(when(false, content.clone(), true).element(), content);
    }

    #[test]
    fn test_when_signal_flips_between_placeholder_and_content() {
        let open = signal(false);
        let content = Element::new("p");
        let result = when(open.clone(), content.clone(), false);

        let slot = match result {
            WhenResult::Reactive(s) => s,
            WhenResult::Static(_) => panic!("signal condition must yield a reactive slot"),
        };

        assert!(slot.get().hidden());

        open.set(true);
        assert_eq!(slot.get(), content);

        open.set(false);
        assert!(slot.get().hidden());
    }

    #[test]
    fn test_when_factory_reinvoked_once_per_flip() {
        let open = signal(true);
        let builds = Rc::new(Cell::new(0));

        let builds_factory = builds.clone();
        let result = when(
            open.clone(),
            WhenContent::factory(move || {
                builds_factory.set(builds_factory.get() + 1);
                create("p")
            }),
            false,
        );

        assert_eq!(builds.get(), 1, "initial resolve invokes the factory");

        open.set(true); // no flip
        assert_eq!(builds.get(), 1, "non-flipping write must not re-invoke");

        open.set(false);
        open.set(true);
        assert_eq!(builds.get(), 2, "each flip to shown builds fresh content");

        let _ = result;
    }

    #[test]
    fn test_when_result_plugs_into_children() {
        let open = signal(true);
        let result = when(open.clone(), Element::new("p"), false);
        let el = create("div").children(vec![result.into()]).build();

        assert_eq!(el.children()[0].tag(), "p");

        open.set(false);
        assert_eq!(el.child_count(), 1, "placeholder holds the slot");
        assert!(el.children()[0].hidden());

        open.set(true);
        assert_eq!(el.children()[0].tag(), "p");
    }

    #[test]
    fn test_signal_map_initial_render() {
        let items = signal(vec![1, 2, 3]);
        let el = signal_map(&items, create("ul"), |n| create("li").text(n.to_string()), false)
            .build();

        let children = el.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].text(), "1");
        assert_eq!(children[2].text(), "3");
    }

    #[test]
    fn test_signal_map_rerenders_on_write() {
        let items = signal(vec!["a".to_string()]);
        let el = signal_map(&items, create("ul"), |s| create("li").text(s.clone()), false)
            .build();

        let original = el.children()[0].clone();

        items.set(vec!["a".to_string(), "b".to_string()]);
        let children = el.children();
        assert_eq!(children.len(), 2);
        assert_ne!(
            children[0], original,
            "full re-render: elements are rebuilt, not reused"
        );
    }

    #[test]
    fn test_signal_map_sequential_same_end_state() {
        let items = signal(vec![1, 2]);
        let fast = signal_map(&items, create("ul"), |n| create("li").text(n.to_string()), false)
            .build();
        let slow = signal_map(&items, create("ul"), |n| create("li").text(n.to_string()), true)
            .build();

        items.set(vec![3, 4, 5]);

        let texts = |el: &Element| {
            el.children()
                .iter()
                .map(|c| c.text())
                .collect::<Vec<_>>()
        };
        assert_eq!(texts(&fast), texts(&slow));
        assert_eq!(texts(&fast), vec!["3", "4", "5"]);
    }

    #[test]
    fn test_signal_map_empty_array_clears_the_list() {
        let items = signal(vec![1]);
        let el = signal_map(&items, create("ul"), |n| create("li").text(n.to_string()), false)
            .build();

        items.set(vec![]);
        assert_eq!(el.child_count(), 0);
    }
}
