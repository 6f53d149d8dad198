//! Element model - the retained in-memory DOM.
//!
//! The templating layer binds signals to elements through the mutation
//! primitives defined here: property setters, attribute get/set, class
//! list add/remove, style set, child append/replace, and event handler
//! slots. An [`Element`] is a cheap shared handle; a host renderer walks
//! the tree and draws it however it likes. Nothing here performs I/O.
//!
//! Identity matters: `PartialEq` on `Element` compares handles, not
//! content. Two separately created `<div>`s are never equal, and a clone
//! of a handle is always equal to the original. Child replacement and the
//! signal changed-flag both rely on this.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

use indexmap::IndexMap;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Failures from child-list mutation primitives.
///
/// Reactive bindings downgrade these to `tracing::warn!` and skip the
/// update, leaving the tree in its prior state; direct callers can
/// propagate them with `?`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    /// The node passed as the replacement/removal target is not a child
    /// of this element.
    #[error("node is not a child of this element")]
    NotAChild,
}

// =============================================================================
// Namespace
// =============================================================================

/// Element namespace, chosen at creation time from the tag name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
}

/// Tags constructed in the SVG namespace. Everything else is HTML.
const SVG_TAGS: &[&str] = &[
    "svg",
    "path",
    "circle",
    "ellipse",
    "line",
    "polygon",
    "polyline",
    "rect",
    "g",
    "defs",
    "use",
    "symbol",
    "marker",
    "pattern",
    "mask",
    "clipPath",
    "linearGradient",
    "radialGradient",
    "stop",
    "tspan",
    "textPath",
    "filter",
    "foreignObject",
    "image",
];

// =============================================================================
// Events
// =============================================================================

/// A dispatched UI event. `value` carries the input payload where one
/// applies (input/change events), and is empty otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: String,
    pub value: String,
}

impl Event {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            value: String::new(),
        }
    }

    pub fn with_value(kind: &str, value: &str) -> Self {
        Self {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }
}

/// Event handler callback (Rc for shared ownership in closures).
pub type EventCallback = Rc<dyn Fn(&Event)>;

// =============================================================================
// Element
// =============================================================================

struct ElementData {
    tag: String,
    namespace: Namespace,

    // Scalar properties, mirroring the DOM properties the builder exposes.
    id: String,
    title: String,
    src: String,
    href: String,
    value: String,
    placeholder: String,
    name: String,
    alt: String,
    input_type: String,
    text: String,
    html: String,
    checked: bool,
    disabled: bool,
    hidden: bool,

    attributes: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    classes: Vec<String>,
    children: Vec<Element>,
    handlers: HashMap<String, EventCallback>,
}

/// A shared handle to one element in the retained tree.
///
/// Cloning shares the underlying node; equality is handle identity.
pub struct Element {
    inner: Rc<RefCell<ElementData>>,
}

impl Element {
    /// Create an element, selecting the namespace purely from the fixed
    /// SVG tag allow-list.
    pub fn new(tag: &str) -> Self {
        let namespace = if SVG_TAGS.contains(&tag) {
            Namespace::Svg
        } else {
            Namespace::Html
        };
        Self {
            inner: Rc::new(RefCell::new(ElementData {
                tag: tag.to_string(),
                namespace,
                id: String::new(),
                title: String::new(),
                src: String::new(),
                href: String::new(),
                value: String::new(),
                placeholder: String::new(),
                name: String::new(),
                alt: String::new(),
                input_type: String::new(),
                text: String::new(),
                html: String::new(),
                checked: false,
                disabled: false,
                hidden: false,
                attributes: IndexMap::new(),
                styles: IndexMap::new(),
                classes: Vec::new(),
                children: Vec::new(),
                handlers: HashMap::new(),
            })),
        }
    }

    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    pub fn namespace(&self) -> Namespace {
        self.inner.borrow().namespace
    }

    // -------------------------------------------------------------------------
    // Scalar properties
    // -------------------------------------------------------------------------

    pub fn id(&self) -> String {
        self.inner.borrow().id.clone()
    }

    pub fn set_id(&self, v: &str) {
        self.inner.borrow_mut().id = v.to_string();
    }

    pub fn title(&self) -> String {
        self.inner.borrow().title.clone()
    }

    pub fn set_title(&self, v: &str) {
        self.inner.borrow_mut().title = v.to_string();
    }

    pub fn src(&self) -> String {
        self.inner.borrow().src.clone()
    }

    pub fn set_src(&self, v: &str) {
        self.inner.borrow_mut().src = v.to_string();
    }

    pub fn href(&self) -> String {
        self.inner.borrow().href.clone()
    }

    pub fn set_href(&self, v: &str) {
        self.inner.borrow_mut().href = v.to_string();
    }

    pub fn value(&self) -> String {
        self.inner.borrow().value.clone()
    }

    pub fn set_value(&self, v: &str) {
        self.inner.borrow_mut().value = v.to_string();
    }

    pub fn placeholder(&self) -> String {
        self.inner.borrow().placeholder.clone()
    }

    pub fn set_placeholder(&self, v: &str) {
        self.inner.borrow_mut().placeholder = v.to_string();
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    pub fn set_name(&self, v: &str) {
        self.inner.borrow_mut().name = v.to_string();
    }

    pub fn alt(&self) -> String {
        self.inner.borrow().alt.clone()
    }

    pub fn set_alt(&self, v: &str) {
        self.inner.borrow_mut().alt = v.to_string();
    }

    pub fn input_type(&self) -> String {
        self.inner.borrow().input_type.clone()
    }

    pub fn set_input_type(&self, v: &str) {
        self.inner.borrow_mut().input_type = v.to_string();
    }

    pub fn text(&self) -> String {
        self.inner.borrow().text.clone()
    }

    pub fn set_text(&self, v: &str) {
        self.inner.borrow_mut().text = v.to_string();
    }

    pub fn html(&self) -> String {
        self.inner.borrow().html.clone()
    }

    pub fn set_html(&self, v: &str) {
        self.inner.borrow_mut().html = v.to_string();
    }

    pub fn checked(&self) -> bool {
        self.inner.borrow().checked
    }

    pub fn set_checked(&self, v: bool) {
        self.inner.borrow_mut().checked = v;
    }

    pub fn disabled(&self) -> bool {
        self.inner.borrow().disabled
    }

    pub fn set_disabled(&self, v: bool) {
        self.inner.borrow_mut().disabled = v;
    }

    pub fn hidden(&self) -> bool {
        self.inner.borrow().hidden
    }

    pub fn set_hidden(&self, v: bool) {
        self.inner.borrow_mut().hidden = v;
    }

    // -------------------------------------------------------------------------
    // Attributes and styles
    // -------------------------------------------------------------------------

    pub fn set_attribute(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .attributes
            .insert(key.to_string(), value.to_string());
    }

    pub fn attribute(&self, key: &str) -> Option<String> {
        self.inner.borrow().attributes.get(key).cloned()
    }

    pub fn remove_attribute(&self, key: &str) {
        self.inner.borrow_mut().attributes.shift_remove(key);
    }

    pub fn attribute_count(&self) -> usize {
        self.inner.borrow().attributes.len()
    }

    pub fn set_style(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .styles
            .insert(key.to_string(), value.to_string());
    }

    pub fn style(&self, key: &str) -> Option<String> {
        self.inner.borrow().styles.get(key).cloned()
    }

    // -------------------------------------------------------------------------
    // Class list
    // -------------------------------------------------------------------------

    /// Add a class name once; adding an already-present name is a no-op.
    pub fn add_class(&self, class: &str) {
        if class.is_empty() {
            return;
        }
        let mut inner = self.inner.borrow_mut();
        if !inner.classes.iter().any(|c| c == class) {
            inner.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.inner.borrow_mut().classes.retain(|c| c != class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.iter().any(|c| c == class)
    }

    pub fn class_list(&self) -> Vec<String> {
        self.inner.borrow().classes.clone()
    }

    // -------------------------------------------------------------------------
    // Children
    // -------------------------------------------------------------------------

    pub fn append_child(&self, child: &Element) {
        self.inner.borrow_mut().children.push(child.clone());
    }

    /// Replace `old` with `new`, preserving position.
    ///
    /// Replacing a node with itself is a no-op as long as it is still a
    /// child. Fails with [`DomError::NotAChild`] if `old` is not in the
    /// child list.
    pub fn replace_child(&self, old: &Element, new: &Element) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        match inner.children.iter().position(|c| c == old) {
            Some(index) => {
                inner.children[index] = new.clone();
                Ok(())
            }
            None => Err(DomError::NotAChild),
        }
    }

    pub fn remove_child(&self, child: &Element) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        match inner.children.iter().position(|c| c == child) {
            Some(index) => {
                inner.children.remove(index);
                Ok(())
            }
            None => Err(DomError::NotAChild),
        }
    }

    pub fn clear_children(&self) {
        self.inner.borrow_mut().children.clear();
    }

    /// Replace the entire child list in one step.
    pub fn set_children(&self, children: Vec<Element>) {
        self.inner.borrow_mut().children = children;
    }

    pub fn children(&self) -> Vec<Element> {
        self.inner.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Assign the handler slot for an event kind, replacing any previous
    /// handler (native on-property semantics, not addEventListener).
    pub fn set_handler(&self, kind: &str, handler: EventCallback) {
        self.inner
            .borrow_mut()
            .handlers
            .insert(kind.to_string(), handler);
    }

    /// Invoke the handler for `event.kind`, if one is assigned. No
    /// bubbling, no default actions; the handler runs synchronously.
    pub fn dispatch(&self, event: &Event) {
        // Clone the handler out of the borrow so it can mutate this element.
        let handler = self.inner.borrow().handlers.get(&event.kind).cloned();
        if let Some(handler) = handler {
            handler(event);
        }
    }
}

impl Clone for Element {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Element {}

impl Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Element")
            .field("tag", &inner.tag)
            .field("namespace", &inner.namespace)
            .field("children", &inner.children.len())
            .finish()
    }
}

/// Create a fresh hidden placeholder element.
///
/// Used wherever a reactive slot has nothing to show yet: the placeholder
/// keeps the position in the child list so a later replacement lands in
/// the right spot.
pub fn null_element() -> Element {
    let el = Element::new("template");
    el.set_hidden(true);
    el
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_namespace_from_tag_allow_list() {
        assert_eq!(Element::new("div").namespace(), Namespace::Html);
        assert_eq!(Element::new("span").namespace(), Namespace::Html);
        assert_eq!(Element::new("svg").namespace(), Namespace::Svg);
        assert_eq!(Element::new("circle").namespace(), Namespace::Svg);
        assert_eq!(Element::new("clipPath").namespace(), Namespace::Svg);
    }

    #[test]
    fn test_equality_is_handle_identity() {
        let a = Element::new("div");
        let b = Element::new("div");
        let a2 = a.clone();

        assert_ne!(a, b, "structurally identical elements are distinct nodes");
        assert_eq!(a, a2, "a clone is the same node");
    }

    #[test]
    fn test_class_list_add_remove() {
        let el = Element::new("div");
        el.add_class("a");
        el.add_class("a"); // no duplicate
        el.add_class("b");

        assert_eq!(el.class_list(), vec!["a", "b"]);

        el.remove_class("a");
        assert!(!el.has_class("a"));
        assert!(el.has_class("b"));
    }

    #[test]
    fn test_attributes_preserve_insertion_order() {
        let el = Element::new("div");
        el.set_attribute("data-b", "2");
        el.set_attribute("data-a", "1");

        assert_eq!(el.attribute("data-b").as_deref(), Some("2"));
        assert_eq!(el.attribute("data-a").as_deref(), Some("1"));

        el.remove_attribute("data-b");
        assert_eq!(el.attribute("data-b"), None);
        assert_eq!(el.attribute_count(), 1);
    }

    #[test]
    fn test_replace_child_preserves_position() {
        let parent = Element::new("ul");
        let first = Element::new("li");
        let second = Element::new("li");
        let replacement = Element::new("li");

        parent.append_child(&first);
        parent.append_child(&second);

        parent.replace_child(&first, &replacement).unwrap();
        let children = parent.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], replacement);
        assert_eq!(children[1], second);
    }

    #[test]
    fn test_replace_child_with_itself_is_a_no_op() {
        let parent = Element::new("div");
        let child = Element::new("span");
        parent.append_child(&child);

        assert_eq!(parent.replace_child(&child, &child), Ok(()));
        assert_eq!(parent.child_count(), 1);
    }

    #[test]
    fn test_replace_missing_child_fails() {
        let parent = Element::new("div");
        let stranger = Element::new("span");
        let replacement = Element::new("span");

        assert_eq!(
            parent.replace_child(&stranger, &replacement),
            Err(DomError::NotAChild)
        );
        assert_eq!(parent.child_count(), 0, "tree left in its prior state");
    }

    #[test]
    fn test_remove_child_identity_match() {
        let parent = Element::new("div");
        let child = Element::new("span");
        let lookalike = Element::new("span");
        parent.append_child(&child);

        assert_eq!(parent.remove_child(&lookalike), Err(DomError::NotAChild));
        assert_eq!(parent.remove_child(&child), Ok(()));
        assert_eq!(parent.child_count(), 0);
    }

    #[test]
    fn test_dispatch_invokes_assigned_handler() {
        let el = Element::new("button");
        let clicks = Rc::new(Cell::new(0));

        let clicks_handler = clicks.clone();
        el.set_handler(
            "click",
            Rc::new(move |_event| clicks_handler.set(clicks_handler.get() + 1)),
        );

        el.dispatch(&Event::new("click"));
        el.dispatch(&Event::new("click"));
        el.dispatch(&Event::new("keydown")); // no handler, no-op

        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn test_handler_may_mutate_its_own_element() {
        let el = Element::new("input");
        let el_handler = el.clone();
        el.set_handler(
            "input",
            Rc::new(move |event| el_handler.set_value(&event.value)),
        );

        el.dispatch(&Event::with_value("input", "typed"));
        assert_eq!(el.value(), "typed");
    }

    #[test]
    fn test_null_element_is_hidden_placeholder() {
        let placeholder = null_element();
        assert!(placeholder.hidden());
        assert_eq!(placeholder.child_count(), 0);
        assert_ne!(null_element(), placeholder, "each call creates a fresh node");
    }
}
