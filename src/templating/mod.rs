//! Templating - the fluent DOM builder and control-flow helpers.
//!
//! [`create`] opens a builder for one element; chainable setters bind
//! literals or signals to its properties, attributes, classes, styles and
//! children; [`DomNode::build`] yields the element. [`when`] and
//! [`signal_map`] cover conditional and list rendering on top of the same
//! binding machinery.

pub mod control_flow;
pub mod node;
pub mod types;

pub use control_flow::{signal_map, when, WhenResult};
pub use node::{create, DomNode};
pub use types::{as_signal, is_signal, Arg, Child, InputType, PropValue, WhenContent};
