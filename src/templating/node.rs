//! DomNode - the fluent element builder.
//!
//! A `DomNode` wraps exactly one [`Element`] and exposes chainable
//! setters. Every property setter takes `impl Into<PropValue<_>>`, so the
//! same call site accepts a literal or a signal; signal-backed properties
//! get an initial write plus a subscription that re-applies the value on
//! every future write to that signal.
//!
//! All reactive plumbing funnels through one private `bind` helper, so
//! every binding site shares a single literal-vs-reactive code path.
//!
//! # Example
//!
//! ```
//! use weft::{create, signal};
//!
//! let label = signal("hello".to_string());
//! let el = create("button")
//!     .id("greet")
//!     .text(label.clone())
//!     .build();
//!
//! assert_eq!(el.text(), "hello");
//! label.set("goodbye".to_string());
//! assert_eq!(el.text(), "goodbye");
//! ```

use std::cell::RefCell;

use tracing::warn;

use crate::dom::{Element, Event, EventCallback};
use crate::templating::types::{Arg, Child, InputType, PropValue};

/// Fluent builder wrapping a single element.
///
/// Cloning shares the underlying element, like cloning the element handle
/// itself. All methods chain except [`build`](DomNode::build), which
/// idempotently yields the owned element.
#[derive(Clone)]
pub struct DomNode {
    el: Element,
}

/// Create a builder for a new element with the given tag. The namespace
/// (SVG vs standard) is chosen purely from the tag name.
pub fn create(tag: &str) -> DomNode {
    DomNode {
        el: Element::new(tag),
    }
}

impl DomNode {
    /// Wrap an existing element in a builder.
    pub fn from_element(el: Element) -> Self {
        Self { el }
    }

    /// Yield the owned element. Idempotent: call it as many times as you
    /// like, it hands back the same shared handle without side effects.
    pub fn build(&self) -> Element {
        self.el.clone()
    }

    // -------------------------------------------------------------------------
    // The one binding primitive
    // -------------------------------------------------------------------------

    /// Apply a literal-or-reactive value through `apply`.
    ///
    /// - `Unset`: no-op, the property keeps its default.
    /// - `Static`: applied once.
    /// - `Signal`: applied immediately, then re-applied on every future
    ///   write to the signal, whether or not the value changed.
    fn bind<V>(self, value: PropValue<V>, apply: impl Fn(&Element, &V) + 'static) -> Self
    where
        V: Clone + PartialEq + 'static,
    {
        match value {
            PropValue::Unset => {}
            PropValue::Static(v) => apply(&self.el, &v),
            PropValue::Signal(s) => {
                let current = s.get();
                apply(&self.el, &current);
                let el = self.el.clone();
                s.subscribe(move |v, _changed| apply(&el, v));
            }
        }
        self
    }

    // -------------------------------------------------------------------------
    // Scalar property setters
    // -------------------------------------------------------------------------

    pub fn id(self, v: impl Into<PropValue<String>>) -> Self {
        self.bind(v.into(), |el, v| el.set_id(v))
    }

    pub fn text(self, v: impl Into<PropValue<String>>) -> Self {
        self.bind(v.into(), |el, v| el.set_text(v))
    }

    pub fn html(self, v: impl Into<PropValue<String>>) -> Self {
        self.bind(v.into(), |el, v| el.set_html(v))
    }

    pub fn title(self, v: impl Into<PropValue<String>>) -> Self {
        self.bind(v.into(), |el, v| el.set_title(v))
    }

    pub fn src(self, v: impl Into<PropValue<String>>) -> Self {
        self.bind(v.into(), |el, v| el.set_src(v))
    }

    pub fn href(self, v: impl Into<PropValue<String>>) -> Self {
        self.bind(v.into(), |el, v| el.set_href(v))
    }

    pub fn value(self, v: impl Into<PropValue<String>>) -> Self {
        self.bind(v.into(), |el, v| el.set_value(v))
    }

    pub fn placeholder(self, v: impl Into<PropValue<String>>) -> Self {
        self.bind(v.into(), |el, v| el.set_placeholder(v))
    }

    pub fn name(self, v: impl Into<PropValue<String>>) -> Self {
        self.bind(v.into(), |el, v| el.set_name(v))
    }

    pub fn alt(self, v: impl Into<PropValue<String>>) -> Self {
        self.bind(v.into(), |el, v| el.set_alt(v))
    }

    pub fn checked(self, v: impl Into<PropValue<bool>>) -> Self {
        self.bind(v.into(), |el, v| el.set_checked(*v))
    }

    pub fn disabled(self, v: impl Into<PropValue<bool>>) -> Self {
        self.bind(v.into(), |el, v| el.set_disabled(*v))
    }

    pub fn hidden(self, v: impl Into<PropValue<bool>>) -> Self {
        self.bind(v.into(), |el, v| el.set_hidden(*v))
    }

    pub fn input_type(self, v: impl Into<PropValue<InputType>>) -> Self {
        self.bind(v.into(), |el, v| el.set_input_type(v.as_str()))
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    /// Add class names, literal or reactive.
    ///
    /// A literal is added once. A signal adds its current name
    /// immediately; on each future value the previously-applied name is
    /// removed and the new one added, so stale classes never accumulate.
    pub fn classes(self, values: Vec<PropValue<String>>) -> Self {
        for value in values {
            match value {
                PropValue::Unset => {}
                PropValue::Static(name) => self.el.add_class(&name),
                PropValue::Signal(s) => {
                    let initial = s.get();
                    self.el.add_class(&initial);
                    let el = self.el.clone();
                    let previous = RefCell::new(initial);
                    s.subscribe(move |name, _changed| {
                        let mut previous = previous.borrow_mut();
                        el.remove_class(&previous);
                        el.add_class(name);
                        *previous = name.clone();
                    });
                }
            }
        }
        self
    }

    /// Single-class convenience for [`classes`](DomNode::classes).
    pub fn class(self, value: impl Into<PropValue<String>>) -> Self {
        self.classes(vec![value.into()])
    }

    // -------------------------------------------------------------------------
    // Attributes and styles
    // -------------------------------------------------------------------------

    /// Set attributes from a flat `key, value, key, value, …` list.
    ///
    /// Values follow the literal/reactive rule, bound through the
    /// attribute API.
    ///
    /// # Panics
    ///
    /// Panics on an odd argument count, or on a key that is not literal
    /// text. Both checks run before anything is applied, so a bad call
    /// never partially mutates the element.
    pub fn attributes(self, args: Vec<Arg>) -> Self {
        let pairs = Self::validate_pairs("attributes", &args);
        for (key, value) in pairs {
            match value {
                Arg::Reactive(s) => {
                    let current = s.get();
                    self.el.set_attribute(&key, &current);
                    let el = self.el.clone();
                    s.subscribe(move |v, _changed| el.set_attribute(&key, v));
                }
                literal => {
                    // validate_pairs only passes Text/Num through here
                    if let Some(text) = literal.literal() {
                        self.el.set_attribute(&key, &text);
                    }
                }
            }
        }
        self
    }

    /// Set styles from a flat `key, value, key, value, …` list.
    ///
    /// Same contract as [`attributes`](DomNode::attributes): keys must be
    /// literal text, values may be literal or reactive, bound through the
    /// style API.
    ///
    /// # Panics
    ///
    /// Panics on an odd argument count or a non-text key, before any
    /// style is applied.
    pub fn styles(self, args: Vec<Arg>) -> Self {
        let pairs = Self::validate_pairs("styles", &args);
        for (key, value) in pairs {
            match value {
                Arg::Reactive(s) => {
                    let current = s.get();
                    self.el.set_style(&key, &current);
                    let el = self.el.clone();
                    s.subscribe(move |v, _changed| el.set_style(&key, v));
                }
                literal => {
                    if let Some(text) = literal.literal() {
                        self.el.set_style(&key, &text);
                    }
                }
            }
        }
        self
    }

    /// Check arity and key types up front; nothing is applied until the
    /// whole list validates.
    fn validate_pairs(method: &str, args: &[Arg]) -> Vec<(String, Arg)> {
        if args.len() % 2 != 0 {
            panic!(
                "{method}() takes key/value pairs but received {} arguments",
                args.len()
            );
        }
        let mut pairs = Vec::with_capacity(args.len() / 2);
        for chunk in args.chunks_exact(2) {
            let key = match &chunk[0] {
                Arg::Text(key) => key.clone(),
                other => panic!(
                    "{method}() keys must be literal strings, got a {} argument",
                    other.describe()
                ),
            };
            pairs.push((key, chunk[1].clone()));
        }
        pairs
    }

    // -------------------------------------------------------------------------
    // Children
    // -------------------------------------------------------------------------

    /// Append children: realized elements, nested builders (auto-built),
    /// nested lists (recursively flattened), reactive children, or
    /// nothing.
    ///
    /// A [`Child::None`] is silently ignored apart from a warning - a
    /// missing child is usually a call-site conditional that resolved to
    /// nothing, not a fatal mistake.
    ///
    /// A signal child appends its current element and registers a
    /// subscription that replaces the previously-appended node on each
    /// future emission, so the replacement always targets the right slot.
    /// If the tracked node has since been removed from the tree, the
    /// update is logged and skipped, leaving the tree as it was.
    pub fn children(self, nodes: Vec<Child>) -> Self {
        for node in nodes {
            self.append(node);
        }
        self
    }

    /// Clear all existing children, then append as [`children`] does.
    /// Used to re-render list sections from scratch.
    ///
    /// [`children`]: DomNode::children
    pub fn overwrite_children(self, nodes: Vec<Child>) -> Self {
        self.el.clear_children();
        self.children(nodes)
    }

    fn append(&self, child: Child) {
        match child {
            Child::None => {
                warn!(parent = %self.el.tag(), "ignoring empty child");
            }
            Child::Element(el) => self.el.append_child(&el),
            Child::Node(node) => self.el.append_child(&node.build()),
            Child::List(list) => {
                for nested in list {
                    self.append(nested);
                }
            }
            Child::Signal(s) => {
                let current = s.get();
                self.el.append_child(&current);
                let parent = self.el.clone();
                let tracked = RefCell::new(current);
                s.subscribe(move |next, _changed| {
                    let mut tracked = tracked.borrow_mut();
                    match parent.replace_child(&tracked, next) {
                        Ok(()) => *tracked = next.clone(),
                        Err(error) => {
                            warn!(
                                parent = %parent.tag(),
                                %error,
                                "skipping reactive child replacement"
                            );
                        }
                    }
                });
            }
        }
    }

    // -------------------------------------------------------------------------
    // Event handlers
    // -------------------------------------------------------------------------

    /// Handlers are literal callbacks assigned to the element's handler
    /// slot; there is no signal binding for them.
    fn handler(self, kind: &str, f: impl Fn(&Event) + 'static) -> Self {
        let callback: EventCallback = std::rc::Rc::new(f);
        self.el.set_handler(kind, callback);
        self
    }

    pub fn on_click(self, f: impl Fn(&Event) + 'static) -> Self {
        self.handler("click", f)
    }

    pub fn on_input(self, f: impl Fn(&Event) + 'static) -> Self {
        self.handler("input", f)
    }

    pub fn on_change(self, f: impl Fn(&Event) + 'static) -> Self {
        self.handler("change", f)
    }

    pub fn on_keydown(self, f: impl Fn(&Event) + 'static) -> Self {
        self.handler("keydown", f)
    }

    pub fn on_keyup(self, f: impl Fn(&Event) + 'static) -> Self {
        self.handler("keyup", f)
    }

    pub fn on_submit(self, f: impl Fn(&Event) + 'static) -> Self {
        self.handler("submit", f)
    }

    pub fn on_focus(self, f: impl Fn(&Event) + 'static) -> Self {
        self.handler("focus", f)
    }

    pub fn on_blur(self, f: impl Fn(&Event) + 'static) -> Self {
        self.handler("blur", f)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Namespace;
    use crate::reactive::signal;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_create_selects_namespace_by_tag() {
        assert_eq!(create("div").build().namespace(), Namespace::Html);
        assert_eq!(create("circle").build().namespace(), Namespace::Svg);
    }

    #[test]
    fn test_build_is_idempotent() {
        let node = create("div").id("x");
        let first = node.build();
        let second = node.build();
        assert_eq!(first, second, "build returns the same shared handle");
        assert_eq!(second.id(), "x");
    }

    #[test]
    fn test_literal_property_applied_once() {
        let el = create("img").src("a.png").alt("a picture").build();
        assert_eq!(el.src(), "a.png");
        assert_eq!(el.alt(), "a picture");
    }

    #[test]
    fn test_unset_property_is_a_no_op() {
        let el = create("input").placeholder(None::<String>).build();
        assert_eq!(el.placeholder(), "", "property keeps its default");
    }

    #[test]
    fn test_signal_property_initial_write_and_updates() {
        let label = signal("one".to_string());
        let el = create("p").text(label.clone()).build();

        assert_eq!(el.text(), "one");
        label.set("two".to_string());
        assert_eq!(el.text(), "two");
    }

    #[test]
    fn test_signal_property_reapplies_on_unchanged_write() {
        let label = signal("same".to_string());
        let el = create("p").text(label.clone()).build();

        el.set_text("clobbered externally");
        label.set("same".to_string()); // changed = false, still re-applied
        assert_eq!(el.text(), "same");
    }

    #[test]
    fn test_bool_properties() {
        let on = signal(false);
        let el = create("input")
            .input_type(InputType::Checkbox)
            .checked(on.clone())
            .disabled(true)
            .build();

        assert_eq!(el.input_type(), "checkbox");
        assert!(!el.checked());
        assert!(el.disabled());

        on.set(true);
        assert!(el.checked());
    }

    #[test]
    fn test_literal_classes_added_once() {
        let el = create("div")
            .classes(vec!["a".into(), "b".into()])
            .build();
        assert_eq!(el.class_list(), vec!["a", "b"]);
    }

    #[test]
    fn test_signal_class_swaps_previous_for_next() {
        let state = signal("a".to_string());
        let el = create("div").classes(vec![state.clone().into()]).build();

        assert!(el.has_class("a"));

        state.set("b".to_string());
        assert!(!el.has_class("a"), "stale class must not accumulate");
        assert!(el.has_class("b"));

        state.set("c".to_string());
        assert_eq!(el.class_list(), vec!["c"]);
    }

    #[test]
    fn test_mixed_literal_and_signal_classes() {
        let state = signal("on".to_string());
        let el = create("div")
            .classes(vec!["fixed".into(), state.clone().into()])
            .build();

        state.set("off".to_string());
        assert_eq!(el.class_list(), vec!["fixed", "off"]);
    }

    #[test]
    fn test_attributes_literal_and_numeric() {
        let el = create("td")
            .attributes(vec!["colspan".into(), 2.into(), "data-k".into(), "v".into()])
            .build();

        assert_eq!(el.attribute("colspan").as_deref(), Some("2"));
        assert_eq!(el.attribute("data-k").as_deref(), Some("v"));
    }

    #[test]
    fn test_attributes_signal_value_tracks_writes() {
        let width = signal("10".to_string());
        let el = create("rect")
            .attributes(vec!["width".into(), width.clone().into()])
            .build();

        assert_eq!(el.attribute("width").as_deref(), Some("10"));
        width.set("20".to_string());
        assert_eq!(el.attribute("width").as_deref(), Some("20"));
    }

    #[test]
    #[should_panic(expected = "key/value pairs")]
    fn test_attributes_odd_arity_panics() {
        create("div").attributes(vec!["a".into(), 1.into(), "b".into()]);
    }

    #[test]
    fn test_attributes_odd_arity_does_not_mutate() {
        let node = create("div");
        let el = node.build();

        let result = catch_unwind(AssertUnwindSafe(|| {
            node.clone()
                .attributes(vec!["a".into(), 1.into(), "b".into()]);
        }));

        assert!(result.is_err());
        assert_eq!(el.attribute_count(), 0, "failed call must not touch the element");
    }

    #[test]
    #[should_panic(expected = "keys must be literal strings")]
    fn test_styles_non_text_key_panics() {
        let sig = signal("red".to_string());
        create("div").styles(vec![sig.into(), "color".into()]);
    }

    #[test]
    fn test_styles_literal_and_signal() {
        let color = signal("red".to_string());
        let el = create("div")
            .styles(vec![
                "display".into(),
                "flex".into(),
                "color".into(),
                color.clone().into(),
            ])
            .build();

        assert_eq!(el.style("display").as_deref(), Some("flex"));
        assert_eq!(el.style("color").as_deref(), Some("red"));

        color.set("blue".to_string());
        assert_eq!(el.style("color").as_deref(), Some("blue"));
    }

    #[test]
    fn test_children_accept_elements_builders_and_lists() {
        let realized = Element::new("span");
        let nested = create("em").text("hi");
        let el = create("div")
            .children(vec![
                realized.clone().into(),
                nested.into(),
                vec![create("b"), create("i")].into(),
                Child::None,
            ])
            .build();

        let children = el.children();
        assert_eq!(children.len(), 4, "None is ignored, list is flattened");
        assert_eq!(children[0], realized);
        assert_eq!(children[1].tag(), "em");
        assert_eq!(children[2].tag(), "b");
        assert_eq!(children[3].tag(), "i");
    }

    #[test]
    fn test_signal_child_replaces_in_place() {
        let first = Element::new("span");
        let slot = signal(first.clone());
        let el = create("div")
            .children(vec![create("header").into(), slot.clone().into()])
            .build();

        assert_eq!(el.child_count(), 2);
        assert_eq!(el.children()[1], first);

        let second = Element::new("p");
        slot.set(second.clone());

        let children = el.children();
        assert_eq!(children.len(), 2, "replacement, not append");
        assert_eq!(children[1], second, "new node lands in the same position");
    }

    #[test]
    fn test_signal_child_skips_update_when_tracked_node_is_gone() {
        let first = Element::new("span");
        let slot = signal(first.clone());
        let el = create("div").children(vec![slot.clone().into()]).build();

        el.clear_children(); // host yanked the node out from under us

        let second = Element::new("p");
        slot.set(second); // warn + skip, no panic
        assert_eq!(el.child_count(), 0, "tree left in its prior state");
    }

    #[test]
    fn test_overwrite_children_clears_first() {
        let node = create("ul").children(vec![create("li").into(), create("li").into()]);
        let el = node.build();
        assert_eq!(el.child_count(), 2);

        node.overwrite_children(vec![create("li").text("only").into()]);
        let children = el.children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].text(), "only");
    }

    #[test]
    fn test_click_handler_fires_on_dispatch() {
        let clicks = std::rc::Rc::new(std::cell::Cell::new(0));
        let clicks_handler = clicks.clone();
        let el = create("button")
            .on_click(move |_| clicks_handler.set(clicks_handler.get() + 1))
            .build();

        el.dispatch(&Event::new("click"));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_input_handler_reads_event_value() {
        let query = signal(String::new());
        let query_handler = query.clone();
        let el = create("input")
            .on_input(move |event| query_handler.set(event.value.clone()))
            .build();

        el.dispatch(&Event::with_value("input", "abc"));
        assert_eq!(query.get(), "abc");
    }
}
