//! Element node and per-kind payloads

use std::collections::BTreeMap;

use crate::error::Span;
use crate::layout::{LayoutRect, Sizing};

use super::attributes::{self, AttributeError};
use super::box_model::BoxModel;

/// Which offsets a scroll container applies to its content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    #[default]
    Vertical,
    Horizontal,
    Both,
}

/// Edge a dock child is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Template directive carried through the tree until expansion
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    If { condition: String },
    ElseIf { condition: String },
    Else,
    Foreach { source: String, variable: String },
}

impl Directive {
    /// Keyword as written after `@`
    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::If { .. } => "if",
            Directive::ElseIf { .. } => "else-if",
            Directive::Else => "else",
            Directive::Foreach { .. } => "foreach",
        }
    }
}

/// Element kind with kind-specific payload.
///
/// The kind selects both the default visual role and the arrangement
/// strategy used for the element's children.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Div,
    Stack,
    VStack {
        spacing: Sizing,
    },
    HStack {
        spacing: Sizing,
    },
    Grid {
        columns: usize,
        rows: usize,
    },
    Dock {
        last_child_fill: bool,
    },
    /// Paints above every z-index layer of its siblings
    Overlay,
    Scroll {
        direction: ScrollDirection,
        scroll_x: f64,
        scroll_y: f64,
    },
    Button {
        text: String,
    },
    Input {
        value: String,
        placeholder: String,
        input_type: String,
    },
    TextArea {
        value: String,
        placeholder: String,
        rows: u32,
        columns: u32,
    },
    Select {
        selected: Option<String>,
        options: Vec<String>,
    },
    Progress {
        value: f64,
        maximum: f64,
    },
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    Label {
        text: String,
        for_id: Option<String>,
    },
    /// Literal text run
    Text {
        content: String,
    },
    Directive(Directive),
    /// Tag outside the primitive registry; a component instance candidate
    Custom,
}

impl ElementKind {
    /// Select a kind from the primitive registry, case-insensitively
    pub fn for_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "div" => ElementKind::Div,
            "stack" => ElementKind::Stack,
            "vstack" | "vbox" => ElementKind::VStack {
                spacing: Sizing::Absolute(0.0),
            },
            "hstack" | "hbox" => ElementKind::HStack {
                spacing: Sizing::Absolute(0.0),
            },
            "grid" => ElementKind::Grid {
                columns: 1,
                rows: 1,
            },
            "dock" => ElementKind::Dock {
                last_child_fill: true,
            },
            "overlay" => ElementKind::Overlay,
            "scroll" => ElementKind::Scroll {
                direction: ScrollDirection::default(),
                scroll_x: 0.0,
                scroll_y: 0.0,
            },
            "button" => ElementKind::Button {
                text: String::new(),
            },
            "input" => ElementKind::Input {
                value: String::new(),
                placeholder: String::new(),
                input_type: "text".to_string(),
            },
            "textarea" => ElementKind::TextArea {
                value: String::new(),
                placeholder: String::new(),
                rows: 4,
                columns: 50,
            },
            "select" => ElementKind::Select {
                selected: None,
                options: Vec::new(),
            },
            "progress" => ElementKind::Progress {
                value: 0.0,
                maximum: 100.0,
            },
            "h1" => heading(1),
            "h2" => heading(2),
            "h3" => heading(3),
            "h4" => heading(4),
            "h5" => heading(5),
            "h6" => heading(6),
            "p" => ElementKind::Paragraph {
                text: String::new(),
            },
            "label" => ElementKind::Label {
                text: String::new(),
                for_id: None,
            },
            _ => ElementKind::Custom,
        }
    }

    /// Whether this kind is a registered primitive
    pub fn is_primitive(&self) -> bool {
        !matches!(self, ElementKind::Custom | ElementKind::Directive(_))
    }
}

fn heading(level: u8) -> ElementKind {
    ElementKind::Heading {
        level,
        text: String::new(),
    }
}

/// One node of the element tree.
///
/// Children are owned; there is no back-reference to the parent. Use
/// [`Element::find_path`] and [`Element::parent_of`] to walk upwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name as written
    pub tag: String,
    pub kind: ElementKind,
    /// Not required to be unique
    pub id: Option<String>,
    pub children: Vec<Element>,
    pub box_model: BoxModel,
    /// Raw attribute values before type conversion
    pub attributes: BTreeMap<String, String>,
    pub visible: bool,
    pub enabled: bool,
    pub z_index: i32,
    /// Absolute position overrides
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Edge this element is pinned to inside a dock
    pub dock: Option<DockEdge>,
    /// Source range of the opening tag or text run
    pub span: Span,
    /// Rectangle from the most recent layout pass; `None` before layout and
    /// for hidden subtrees
    pub layout: Option<LayoutRect>,
}

impl Element {
    /// Create an element for a tag, selecting its kind from the registry
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let kind = ElementKind::for_tag(&tag);
        Self::with_kind(tag, kind)
    }

    /// Create a literal text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_kind(
            "#text",
            ElementKind::Text {
                content: content.into(),
            },
        )
    }

    /// Create a directive grouping node
    pub fn directive(directive: Directive) -> Self {
        let tag = format!("@{}", directive.keyword());
        Self::with_kind(tag, ElementKind::Directive(directive))
    }

    fn with_kind(tag: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            tag: tag.into(),
            kind,
            id: None,
            children: Vec::new(),
            box_model: BoxModel::default(),
            attributes: BTreeMap::new(),
            visible: true,
            enabled: true,
            z_index: 0,
            x: None,
            y: None,
            dock: None,
            span: 0..0,
            layout: None,
        }
    }

    /// Builder-style attribute assignment that ignores conversion errors
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        let _ = self.set_attribute(name, value);
        self
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Store a raw attribute and convert it through the setter table.
    ///
    /// The raw value is kept even when conversion fails.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeError> {
        self.attributes.insert(name.to_string(), value.to_string());
        attributes::apply(self, name, value)
    }

    /// Raw attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        self.descendants()
            .filter_map(|el| match &el.kind {
                ElementKind::Text { content } => Some(content.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Pre-order iterator over this element and all of its descendants
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First element with this id in depth-first pre-order
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.descendants().find(|el| el.id.as_deref() == Some(id))
    }

    /// Mutable variant of [`Element::find_by_id`]
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        let path = self.find_path(id)?;
        self.node_at_mut(&path)
    }

    /// Child-index path from this element to the first element with this id
    pub fn find_path(&self, id: &str) -> Option<Vec<usize>> {
        if self.id.as_deref() == Some(id) {
            return Some(Vec::new());
        }
        self.children.iter().enumerate().find_map(|(i, child)| {
            child.find_path(id).map(|mut path| {
                path.insert(0, i);
                path
            })
        })
    }

    /// Follow a child-index path
    pub fn node_at(&self, path: &[usize]) -> Option<&Element> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Mutable variant of [`Element::node_at`]
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// Parent of the node at a path; `None` for the root itself
    pub fn parent_of(&self, path: &[usize]) -> Option<&Element> {
        let (_, parent_path) = path.split_last()?;
        self.node_at(parent_path)
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        self.descendants().count()
    }
}

/// Iterator returned by [`Element::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
