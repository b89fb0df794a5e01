//! Plain-text outline of an element tree and its rectangles

use std::fmt::Write;

use crate::tree::{Element, ElementKind};

/// Render one line per node, children indented under their parent.
///
/// Elements print as `<tag#id>`, text nodes as their quoted content.
/// Hidden nodes are marked and their subtree is skipped.
pub fn outline(root: &Element) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = match (&element.kind, &element.id) {
        (ElementKind::Text { content }, _) => format!("{:?}", content),
        (_, Some(id)) => format!("<{}#{}>", element.tag, id),
        (_, None) => format!("<{}>", element.tag),
    };

    // Writing to a String cannot fail
    if !element.visible {
        let _ = writeln!(out, "{}{} hidden", indent, label);
        return;
    }
    let _ = match element.layout {
        Some(rect) => writeln!(
            out,
            "{}{} x={:.1} y={:.1} w={:.1} h={:.1}",
            indent, label, rect.x, rect.y, rect.width, rect.height
        ),
        None => writeln!(out, "{}{}", indent, label),
    };
    for child in &element.children {
        write_node(out, child, depth + 1);
    }
}
