//! Sizing resolution and layout
//!
//! [`resolve`] turns a single [`Sizing`] value into pixels. The
//! [`LayoutEngine`] walks an expanded element tree and stores a
//! [`LayoutRect`] on every visible node; [`paint_order`] and [`hit_test`]
//! expose the result to a renderer.

pub mod engine;
pub mod sizing;
pub mod surface;
pub mod theme;
pub mod types;

pub use engine::LayoutEngine;
pub use sizing::{resolve, Sizing, SizingParseError};
pub use surface::{hit_test, paint_list, paint_order};
pub use theme::{ThemeError, ThemeMetrics};
pub use types::{Axis, LayoutRect};
