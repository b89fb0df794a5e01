//! What a renderer sees after layout: paint order and hit testing

use crate::tree::{Element, ElementKind};

use super::types::LayoutRect;

fn paints(element: &Element) -> bool {
    element.visible && element.layout.is_some()
}

/// Children of `element` in the order they should be painted.
///
/// Hidden children and children without a rectangle are left out. The rest
/// are ordered by z-index, ties in document order; overlay containers come
/// after every z-index layer.
pub fn paint_order(element: &Element) -> Vec<&Element> {
    let mut children: Vec<&Element> = element.children.iter().filter(|c| paints(c)).collect();
    children.sort_by_key(|c| (matches!(c.kind, ElementKind::Overlay), c.z_index));
    children
}

/// Flatten a laid-out tree into `(element, rect)` pairs, back to front
pub fn paint_list(root: &Element) -> Vec<(&Element, LayoutRect)> {
    fn visit<'a>(element: &'a Element, out: &mut Vec<(&'a Element, LayoutRect)>) {
        let Some(rect) = element.layout.filter(|_| element.visible) else {
            return;
        };
        out.push((element, rect));
        for child in paint_order(element) {
            visit(child, out);
        }
    }

    let mut out = Vec::new();
    visit(root, &mut out);
    out
}

/// Topmost visible element whose rectangle contains the point.
///
/// Children are tried in reverse paint order and the search descends into
/// the first hit; an element with no hit child is itself the answer.
pub fn hit_test(root: &Element, x: f64, y: f64) -> Option<&Element> {
    let rect = root.layout.filter(|_| root.visible)?;
    if !rect.contains(x, y) {
        return None;
    }
    for child in paint_order(root).into_iter().rev() {
        if let Some(hit) = hit_test(child, x, y) {
            return Some(hit);
        }
    }
    Some(root)
}
