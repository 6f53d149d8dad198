//! Templating types - reactive property wrappers and builder arguments.
//!
//! [`PropValue`] is the single seam between literals and signals: every
//! builder setter accepts `impl Into<PropValue<T>>`, so call sites pass a
//! plain value, a signal, or an `Option` interchangeably and the binding
//! logic branches exactly once.

use std::rc::Rc;

use crate::dom::Element;
use crate::reactive::Signal;
use crate::templating::node::DomNode;

// =============================================================================
// PropValue - literal-or-reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or absent.
///
/// - `Static` values are applied once at bind time.
/// - `Signal` values are applied immediately and re-applied on every
///   future write to the signal (changed or not).
/// - `Unset` is a no-op: the property keeps its default. `Option::None`
///   converts into it, so optional props thread through naturally.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// No value; the binding site does nothing.
    Unset,
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> Option<T> {
        match self {
            PropValue::Static(v) => Some(v.clone()),
            PropValue::Signal(s) => Some(s.get()),
            PropValue::Unset => None,
        }
    }

    pub fn is_signal(&self) -> bool {
        matches!(self, PropValue::Signal(_))
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl<T: Clone + PartialEq + 'static> From<Option<T>> for PropValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => PropValue::Static(v),
            None => PropValue::Unset,
        }
    }
}

impl From<&str> for PropValue<String> {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

/// Whether a property value carries a signal.
///
/// The tagged-variant spelling of a reactive-or-not probe: only values
/// constructed from a real [`Signal`] answer true.
pub fn is_signal<T: Clone + PartialEq + 'static>(value: &PropValue<T>) -> bool {
    value.is_signal()
}

/// Coerce a property value into a signal.
///
/// A signal passes through unchanged (same shared state); a literal is
/// wrapped in a fresh signal seeded with it; `Unset` yields a fresh
/// signal holding `T::default()`.
pub fn as_signal<T>(value: impl Into<PropValue<T>>) -> Signal<T>
where
    T: Clone + PartialEq + Default + 'static,
{
    match value.into() {
        PropValue::Signal(s) => s,
        PropValue::Static(v) => Signal::new(v),
        PropValue::Unset => Signal::new(T::default()),
    }
}

// =============================================================================
// Child - anything that can go into children()
// =============================================================================

/// One argument to [`DomNode::children`].
///
/// [`DomNode::children`]: crate::templating::DomNode::children
pub enum Child {
    /// An already-realized element, appended as-is.
    Element(Element),
    /// A nested builder, auto-built on append.
    Node(DomNode),
    /// A nested sequence, recursively flattened.
    List(Vec<Child>),
    /// A reactive child: the current element is appended and every later
    /// emission replaces the previously-appended node in place.
    Signal(Signal<Element>),
    /// Nothing; ignored with a warning rather than raised as an error.
    None,
}

impl From<Element> for Child {
    fn from(el: Element) -> Self {
        Child::Element(el)
    }
}

impl From<DomNode> for Child {
    fn from(node: DomNode) -> Self {
        Child::Node(node)
    }
}

impl From<Signal<Element>> for Child {
    fn from(signal: Signal<Element>) -> Self {
        Child::Signal(signal)
    }
}

impl<C: Into<Child>> From<Vec<C>> for Child {
    fn from(list: Vec<C>) -> Self {
        Child::List(list.into_iter().map(Into::into).collect())
    }
}

impl<C: Into<Child>> From<Option<C>> for Child {
    fn from(value: Option<C>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Child::None,
        }
    }
}

// =============================================================================
// Arg - flat key/value arguments for attributes() and styles()
// =============================================================================

/// One entry in the flat key/value lists taken by `attributes()` and
/// `styles()`. Keys must be text; values may be text, numbers, or signals.
#[derive(Clone)]
pub enum Arg {
    Text(String),
    Num(f64),
    Reactive(Signal<String>),
}

impl Arg {
    /// Render a value-position argument's current literal form, if it has
    /// one (signals are bound separately).
    pub(crate) fn literal(&self) -> Option<String> {
        match self {
            Arg::Text(s) => Some(s.clone()),
            Arg::Num(n) => Some(format_number(*n)),
            Arg::Reactive(_) => None,
        }
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Arg::Text(_) => "text",
            Arg::Num(_) => "number",
            Arg::Reactive(_) => "signal",
        }
    }
}

/// Numbers format without a trailing `.0` so `width: 100` comes out as
/// `"100"`, not `"100.0"`.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Text(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Text(v)
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Num(v as f64)
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Num(v as f64)
    }
}

impl From<u32> for Arg {
    fn from(v: u32) -> Self {
        Arg::Num(v as f64)
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Num(v)
    }
}

impl From<Signal<String>> for Arg {
    fn from(v: Signal<String>) -> Self {
        Arg::Reactive(v)
    }
}

// =============================================================================
// InputType - recognized input-type constants
// =============================================================================

/// The recognized `<input type="…">` values used by form-element builders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputType {
    Text,
    Password,
    Checkbox,
    Radio,
    Number,
    Email,
    Date,
    Time,
    File,
    Hidden,
    Range,
    Color,
    Submit,
    Reset,
    Button,
    Url,
    Search,
    Tel,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Password => "password",
            InputType::Checkbox => "checkbox",
            InputType::Radio => "radio",
            InputType::Number => "number",
            InputType::Email => "email",
            InputType::Date => "date",
            InputType::Time => "time",
            InputType::File => "file",
            InputType::Hidden => "hidden",
            InputType::Range => "range",
            InputType::Color => "color",
            InputType::Submit => "submit",
            InputType::Reset => "reset",
            InputType::Button => "button",
            InputType::Url => "url",
            InputType::Search => "search",
            InputType::Tel => "tel",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Content factory used by when()
// =============================================================================

/// Content for [`when`]: a realized element, or a factory invoked lazily
/// on each flip to shown.
///
/// [`when`]: crate::templating::when
#[derive(Clone)]
pub enum WhenContent {
    Element(Element),
    Factory(Rc<dyn Fn() -> DomNode>),
}

impl WhenContent {
    pub fn factory(f: impl Fn() -> DomNode + 'static) -> Self {
        WhenContent::Factory(Rc::new(f))
    }
}

impl From<Element> for WhenContent {
    fn from(el: Element) -> Self {
        WhenContent::Element(el)
    }
}

impl From<DomNode> for WhenContent {
    fn from(node: DomNode) -> Self {
        WhenContent::Element(node.build())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::signal;

    #[test]
    fn test_is_signal_tags_only_real_signals() {
        let reactive: PropValue<i32> = signal(1).into();
        let literal: PropValue<i32> = 1.into();
        let unset: PropValue<i32> = None.into();

        assert!(is_signal(&reactive));
        assert!(!is_signal(&literal));
        assert!(!is_signal(&unset));
    }

    #[test]
    fn test_as_signal_passes_signals_through() {
        let source = signal(5);
        let roundtrip = as_signal(source.clone());

        source.set(9);
        assert_eq!(roundtrip.get(), 9, "same shared state, not a copy");
    }

    #[test]
    fn test_as_signal_wraps_literals_and_unset() {
        assert_eq!(as_signal(5i32).get(), 5);
        assert_eq!(as_signal::<i32>(None::<i32>).get(), 0);
    }

    #[test]
    fn test_prop_value_get() {
        assert_eq!(PropValue::from(3).get(), Some(3));
        assert_eq!(PropValue::from(signal(4)).get(), Some(4));
        assert_eq!(PropValue::<i32>::Unset.get(), None);
    }

    #[test]
    fn test_arg_number_formatting() {
        assert_eq!(Arg::from(1).literal().as_deref(), Some("1"));
        assert_eq!(Arg::from(100.0).literal().as_deref(), Some("100"));
        assert_eq!(Arg::from(1.5).literal().as_deref(), Some("1.5"));
    }

    #[test]
    fn test_input_type_strings() {
        assert_eq!(InputType::Text.as_str(), "text");
        assert_eq!(InputType::Checkbox.to_string(), "checkbox");
    }
}
