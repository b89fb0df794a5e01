//! Element tree carried through parsing, expansion and layout
//!
//! Every stage of the pipeline works on the same owned [`Element`] tree:
//! the parser builds it, the template expander rewrites it in place and the
//! layout engine annotates it with rectangles.

mod attributes;
mod box_model;
mod element;

pub use attributes::{AttributeError, ValueError};
pub use box_model::{BoxModel, Spacing, SpacingParseError};
pub use element::{Descendants, Directive, DockEdge, Element, ElementKind, ScrollDirection};
