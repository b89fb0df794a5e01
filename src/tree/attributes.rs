//! Attribute setter table
//!
//! Raw markup attributes are converted into typed element fields through a
//! static table of `name -> setter` entries: one shared table for attributes
//! every element understands, plus one table per element kind. Attributes
//! with no setter stay in the raw attribute map only.

use thiserror::Error;

use crate::layout::{Axis, Sizing, SizingParseError};

use super::box_model::{Spacing, SpacingParseError};
use super::element::{DockEdge, Element, ElementKind, ScrollDirection};

/// Why a raw value could not be converted
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error("expected a number")]
    Number,

    #[error("expected true or false")]
    Bool,

    #[error("expected a whole number of at least {0}")]
    Count(u32),

    #[error(transparent)]
    Sizing(#[from] SizingParseError),

    #[error("expected 1, 2 or 4 comma-separated numbers")]
    Spacing,

    #[error("expected one of: {0}")]
    Keyword(&'static str),
}

impl From<SpacingParseError> for ValueError {
    fn from(_: SpacingParseError) -> Self {
        ValueError::Spacing
    }
}

/// A raw attribute value that did not convert to its typed field
#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid value '{value}' for attribute '{name}': {reason}")]
pub struct AttributeError {
    pub name: String,
    pub value: String,
    pub reason: ValueError,
}

type Setter = fn(&mut Element, &str) -> Result<(), ValueError>;

const COMMON: &[(&str, Setter)] = &[
    ("id", set_id),
    ("x", set_x),
    ("y", set_y),
    ("width", set_width),
    ("height", set_height),
    ("min-width", set_min_width),
    ("max-width", set_max_width),
    ("min-height", set_min_height),
    ("max-height", set_max_height),
    ("margin", set_margin),
    ("margin-top", set_margin_top),
    ("margin-right", set_margin_right),
    ("margin-bottom", set_margin_bottom),
    ("margin-left", set_margin_left),
    ("padding", set_padding),
    ("padding-top", set_padding_top),
    ("padding-right", set_padding_right),
    ("padding-bottom", set_padding_bottom),
    ("padding-left", set_padding_left),
    ("border", set_border),
    ("visible", set_visible),
    ("enabled", set_enabled),
    ("z-index", set_z_index),
    ("dock", set_dock),
];

const STACK: &[(&str, Setter)] = &[("spacing", set_spacing)];
const GRID: &[(&str, Setter)] = &[("columns", set_columns), ("rows", set_rows)];
const DOCK: &[(&str, Setter)] = &[("last-child-fill", set_last_child_fill)];
const SCROLL: &[(&str, Setter)] = &[
    ("direction", set_direction),
    ("scroll-x", set_scroll_x),
    ("scroll-y", set_scroll_y),
];
const TEXTUAL: &[(&str, Setter)] = &[("text", set_text)];
const INPUT: &[(&str, Setter)] = &[
    ("value", set_value),
    ("placeholder", set_placeholder),
    ("type", set_input_type),
];
const TEXT_AREA: &[(&str, Setter)] = &[
    ("value", set_value),
    ("placeholder", set_placeholder),
    ("rows", set_rows),
    ("cols", set_text_columns),
];
const SELECT: &[(&str, Setter)] = &[("value", set_value), ("options", set_options)];
const PROGRESS: &[(&str, Setter)] = &[("value", set_progress_value), ("max", set_maximum)];
const LABEL: &[(&str, Setter)] = &[("text", set_text), ("for", set_for)];
const TEXT: &[(&str, Setter)] = &[("content", set_text)];

fn table_for(kind: &ElementKind) -> &'static [(&'static str, Setter)] {
    match kind {
        ElementKind::VStack { .. } | ElementKind::HStack { .. } => STACK,
        ElementKind::Grid { .. } => GRID,
        ElementKind::Dock { .. } => DOCK,
        ElementKind::Scroll { .. } => SCROLL,
        ElementKind::Button { .. }
        | ElementKind::Heading { .. }
        | ElementKind::Paragraph { .. } => TEXTUAL,
        ElementKind::Input { .. } => INPUT,
        ElementKind::TextArea { .. } => TEXT_AREA,
        ElementKind::Select { .. } => SELECT,
        ElementKind::Progress { .. } => PROGRESS,
        ElementKind::Label { .. } => LABEL,
        ElementKind::Text { .. } => TEXT,
        _ => &[],
    }
}

fn lookup(kind: &ElementKind, name: &str) -> Option<Setter> {
    table_for(kind)
        .iter()
        .chain(COMMON.iter())
        .find(|(key, _)| *key == name)
        .map(|(_, setter)| *setter)
}

/// Run the setter for one attribute, if the element's kind has one
pub(crate) fn apply(element: &mut Element, name: &str, value: &str) -> Result<(), AttributeError> {
    let key = name.to_ascii_lowercase();
    let Some(setter) = lookup(&element.kind, &key) else {
        return Ok(());
    };
    setter(element, value.trim()).map_err(|reason| AttributeError {
        name: name.to_string(),
        value: value.to_string(),
        reason,
    })
}

fn number(value: &str) -> Result<f64, ValueError> {
    let value = value.strip_suffix("px").unwrap_or(value);
    value.trim().parse().map_err(|_| ValueError::Number)
}

fn boolean(value: &str) -> Result<bool, ValueError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ValueError::Bool),
    }
}

fn count(value: &str, at_least: u32) -> Result<u32, ValueError> {
    match value.parse::<u32>() {
        Ok(n) if n >= at_least => Ok(n),
        _ => Err(ValueError::Count(at_least)),
    }
}

/// An unknown unit still leaves the element with a 0 px extent
fn sizing(value: &str, axis: Axis) -> (Sizing, Result<(), ValueError>) {
    match Sizing::parse(value, axis) {
        Ok(sizing) => (sizing, Ok(())),
        Err(err) => (Sizing::Absolute(0.0), Err(err.into())),
    }
}

fn set_id(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.id = Some(v.to_string());
    Ok(())
}

fn set_x(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.x = Some(number(v)?);
    Ok(())
}

fn set_y(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.y = Some(number(v)?);
    Ok(())
}

fn set_width(el: &mut Element, v: &str) -> Result<(), ValueError> {
    let (value, result) = sizing(v, Axis::Horizontal);
    el.box_model.width = value;
    result
}

fn set_height(el: &mut Element, v: &str) -> Result<(), ValueError> {
    let (value, result) = sizing(v, Axis::Vertical);
    el.box_model.height = value;
    result
}

fn set_min_width(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.min_width = Some(number(v)?);
    Ok(())
}

fn set_max_width(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.max_width = Some(number(v)?);
    Ok(())
}

fn set_min_height(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.min_height = Some(number(v)?);
    Ok(())
}

fn set_max_height(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.max_height = Some(number(v)?);
    Ok(())
}

fn set_margin(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.margin = v.parse::<Spacing>()?;
    Ok(())
}

fn set_margin_top(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.margin.top = number(v)?;
    Ok(())
}

fn set_margin_right(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.margin.right = number(v)?;
    Ok(())
}

fn set_margin_bottom(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.margin.bottom = number(v)?;
    Ok(())
}

fn set_margin_left(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.margin.left = number(v)?;
    Ok(())
}

fn set_padding(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.padding = v.parse::<Spacing>()?;
    Ok(())
}

fn set_padding_top(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.padding.top = number(v)?;
    Ok(())
}

fn set_padding_right(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.padding.right = number(v)?;
    Ok(())
}

fn set_padding_bottom(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.padding.bottom = number(v)?;
    Ok(())
}

fn set_padding_left(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.padding.left = number(v)?;
    Ok(())
}

fn set_border(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.box_model.border = v.parse::<Spacing>()?;
    Ok(())
}

fn set_visible(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.visible = boolean(v)?;
    Ok(())
}

fn set_enabled(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.enabled = boolean(v)?;
    Ok(())
}

fn set_z_index(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.z_index = v.parse().map_err(|_| ValueError::Number)?;
    Ok(())
}

fn set_dock(el: &mut Element, v: &str) -> Result<(), ValueError> {
    el.dock = match v.to_ascii_lowercase().as_str() {
        "top" => Some(DockEdge::Top),
        "bottom" => Some(DockEdge::Bottom),
        "left" => Some(DockEdge::Left),
        "right" => Some(DockEdge::Right),
        "none" | "fill" => None,
        _ => return Err(ValueError::Keyword("top, bottom, left, right, fill")),
    };
    Ok(())
}

fn set_spacing(el: &mut Element, v: &str) -> Result<(), ValueError> {
    match &mut el.kind {
        ElementKind::VStack { spacing } => *spacing = Sizing::parse(v, Axis::Vertical)?,
        ElementKind::HStack { spacing } => *spacing = Sizing::parse(v, Axis::Horizontal)?,
        _ => {}
    }
    Ok(())
}

fn set_columns(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::Grid { columns, .. } = &mut el.kind {
        *columns = count(v, 1)? as usize;
    }
    Ok(())
}

fn set_rows(el: &mut Element, v: &str) -> Result<(), ValueError> {
    match &mut el.kind {
        ElementKind::Grid { rows, .. } => *rows = count(v, 1)? as usize,
        ElementKind::TextArea { rows, .. } => *rows = count(v, 1)?,
        _ => {}
    }
    Ok(())
}

fn set_text_columns(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::TextArea { columns, .. } = &mut el.kind {
        *columns = count(v, 1)?;
    }
    Ok(())
}

fn set_last_child_fill(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::Dock { last_child_fill } = &mut el.kind {
        *last_child_fill = boolean(v)?;
    }
    Ok(())
}

fn set_direction(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::Scroll { direction, .. } = &mut el.kind {
        *direction = match v.to_ascii_lowercase().as_str() {
            "vertical" => ScrollDirection::Vertical,
            "horizontal" => ScrollDirection::Horizontal,
            "both" => ScrollDirection::Both,
            _ => return Err(ValueError::Keyword("vertical, horizontal, both")),
        };
    }
    Ok(())
}

fn set_scroll_x(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::Scroll { scroll_x, .. } = &mut el.kind {
        *scroll_x = number(v)?;
    }
    Ok(())
}

fn set_scroll_y(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::Scroll { scroll_y, .. } = &mut el.kind {
        *scroll_y = number(v)?;
    }
    Ok(())
}

fn set_text(el: &mut Element, v: &str) -> Result<(), ValueError> {
    match &mut el.kind {
        ElementKind::Button { text }
        | ElementKind::Heading { text, .. }
        | ElementKind::Paragraph { text }
        | ElementKind::Label { text, .. } => *text = v.to_string(),
        ElementKind::Text { content } => *content = v.to_string(),
        _ => {}
    }
    Ok(())
}

fn set_value(el: &mut Element, v: &str) -> Result<(), ValueError> {
    match &mut el.kind {
        ElementKind::Input { value, .. } | ElementKind::TextArea { value, .. } => {
            *value = v.to_string()
        }
        ElementKind::Select { selected, .. } => *selected = Some(v.to_string()),
        _ => {}
    }
    Ok(())
}

fn set_placeholder(el: &mut Element, v: &str) -> Result<(), ValueError> {
    match &mut el.kind {
        ElementKind::Input { placeholder, .. } | ElementKind::TextArea { placeholder, .. } => {
            *placeholder = v.to_string()
        }
        _ => {}
    }
    Ok(())
}

fn set_input_type(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::Input { input_type, .. } = &mut el.kind {
        *input_type = v.to_ascii_lowercase();
    }
    Ok(())
}

fn set_options(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::Select { options, .. } = &mut el.kind {
        *options = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
    Ok(())
}

fn set_progress_value(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::Progress { value, .. } = &mut el.kind {
        *value = number(v)?;
    }
    Ok(())
}

fn set_maximum(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::Progress { maximum, .. } = &mut el.kind {
        *maximum = number(v)?;
    }
    Ok(())
}

fn set_for(el: &mut Element, v: &str) -> Result<(), ValueError> {
    if let ElementKind::Label { for_id, .. } = &mut el.kind {
        *for_id = Some(v.to_string());
    }
    Ok(())
}
