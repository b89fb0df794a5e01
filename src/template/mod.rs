//! Template system for directives and reusable components
//!
//! Parsed trees keep `@if`, `@else-if`, `@else` and `@foreach` as grouping
//! nodes, and unknown tags as component instances. Expansion evaluates them
//! against a [`Model`] and returns a tree made only of primitive elements
//! and text (plus instances of components that could not be found).
//!
//! # Example
//!
//! ```text
//! <!-- Greeting.suim -->
//! <model>{ name: "World" }</model>
//! <label>Hello {name}</label>
//!
//! <!-- page -->
//! <vstack>
//!   <Greeting name="Ada"/>
//!   @if Admin
//!     <button>Settings</button>
//!   @end
//! </vstack>
//! ```

mod condition;
mod expander;
mod model;
mod registry;

pub use condition::{Condition, ConditionError, Literal};
pub use expander::{ExpansionReport, Expander, DEFAULT_MAX_DEPTH};
pub use model::{Model, ModelError, Value};
pub use registry::{
    ComponentDefinition, ComponentError, ComponentRegistry, ComponentSource, NoComponents,
    DEFAULT_EXTENSION,
};
