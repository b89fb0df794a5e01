//! Layout computation engine
//!
//! A single depth-first pass assigns one [`LayoutRect`] to every visible
//! node. Each node is sized against the region its parent offers, placed at
//! the region origin plus its leading margin, and then arranges its own
//! children inside its content box (rectangle minus border and padding).
//!
//! ## Arrangements
//!
//! - **Stacks** (`vstack`, `hstack`): two phases along the primary axis.
//!   Fixed children and all margins and spacing are summed first; remainder
//!   (`*`) children then share what is left by weight.
//! - **Grid**: equal cells, row-major.
//! - **Dock**: docked children consume the edges of a shrinking region.
//! - **Overlay**: every child is offered the whole content box.
//! - **Flow** (everything else): children run down the vertical axis.
//!
//! Hidden nodes lose their rectangle along with their whole subtree and take
//! no space in their parent's arrangement.

use tracing::{debug, trace};

use crate::tree::{DockEdge, Element, ElementKind, ScrollDirection};

use super::sizing::{resolve, Sizing};
use super::theme::ThemeMetrics;
use super::types::{Axis, LayoutRect};

/// How a container hands out space to its children
#[derive(Debug, Clone, Copy, PartialEq)]
enum Arrangement {
    Stack { axis: Axis, spacing: Sizing },
    Grid { columns: usize, rows: usize },
    Dock { last_child_fill: bool },
    Overlay,
    /// Vertical run, shifted by a scroll offset
    Flow { dx: f64, dy: f64 },
}

impl Arrangement {
    fn for_kind(kind: &ElementKind) -> Self {
        match kind {
            ElementKind::VStack { spacing } => Arrangement::Stack {
                axis: Axis::Vertical,
                spacing: *spacing,
            },
            ElementKind::HStack { spacing } => Arrangement::Stack {
                axis: Axis::Horizontal,
                spacing: *spacing,
            },
            ElementKind::Grid { columns, rows } => Arrangement::Grid {
                columns: (*columns).max(1),
                rows: (*rows).max(1),
            },
            ElementKind::Dock { last_child_fill } => Arrangement::Dock {
                last_child_fill: *last_child_fill,
            },
            ElementKind::Overlay => Arrangement::Overlay,
            ElementKind::Scroll {
                direction,
                scroll_x,
                scroll_y,
            } => {
                let (dx, dy) = match direction {
                    ScrollDirection::Vertical => (0.0, -scroll_y),
                    ScrollDirection::Horizontal => (-scroll_x, 0.0),
                    ScrollDirection::Both => (-scroll_x, -scroll_y),
                };
                Arrangement::Flow { dx, dy }
            }
            _ => Arrangement::Flow { dx: 0.0, dy: 0.0 },
        }
    }
}

/// Computes rectangles for an element tree
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    theme: ThemeMetrics,
}

impl LayoutEngine {
    pub fn new(theme: ThemeMetrics) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &ThemeMetrics {
        &self.theme
    }

    /// Lay out a tree inside a viewport.
    ///
    /// The root's `auto` and `*` axes take the viewport extent. Calling this
    /// again with the same inputs gives the same rectangles.
    pub fn layout(&self, root: &mut Element, viewport_width: f64, viewport_height: f64) {
        debug!(
            width = viewport_width,
            height = viewport_height,
            nodes = root.node_count(),
            "layout pass"
        );
        if !root.visible {
            clear(root);
            return;
        }
        let viewport = (viewport_width, viewport_height);
        let width = self.measure(root, Axis::Horizontal, viewport, false);
        let height = self.measure(root, Axis::Vertical, viewport, false);
        self.place(root, 0.0, 0.0, width, height);
    }

    /// Resolve one axis of an element against the region offered to it.
    ///
    /// `offered` is the (width, height) of that region. `pw` and `ph` take
    /// their parent extent from it whichever axis they are written on.
    /// `flow` is set when the axis is the direction its parent advances in;
    /// there `auto` means the theme's default for the element's role,
    /// elsewhere `auto` fills the offered extent.
    fn measure(&self, element: &Element, axis: Axis, offered: (f64, f64), flow: bool) -> f64 {
        let (offered_width, offered_height) = offered;
        let along = axis.select(offered_width, offered_height);
        let margin = element.box_model.margin.along(axis);
        let extent = match element.box_model.sizing(axis) {
            Sizing::Auto if flow => self.theme.auto_extent(&element.kind, axis),
            Sizing::Auto | Sizing::Star(_) => along - margin,
            sizing @ Sizing::PercentWidth(_) => resolve(sizing, offered_width, &self.theme),
            sizing @ Sizing::PercentHeight(_) => resolve(sizing, offered_height, &self.theme),
            sizing => resolve(sizing, along, &self.theme),
        };
        element.box_model.constrain(axis, extent)
    }

    /// Give an element its rectangle and arrange its children.
    ///
    /// `slot_x`/`slot_y` is the outer corner of the slot, before margin.
    fn place(&self, element: &mut Element, slot_x: f64, slot_y: f64, width: f64, height: f64) {
        let margin = element.box_model.margin;
        let x = element.x.unwrap_or(slot_x + margin.left);
        let y = element.y.unwrap_or(slot_y + margin.top);
        let rect = LayoutRect::new(x, y, width, height);
        trace!(tag = %element.tag, x, y, width, height, "placed");
        element.layout = Some(rect);

        let border = element.box_model.border;
        let padding = element.box_model.padding;
        let content = rect
            .inset(border.top, border.right, border.bottom, border.left)
            .inset(padding.top, padding.right, padding.bottom, padding.left);

        match Arrangement::for_kind(&element.kind) {
            Arrangement::Stack { axis, spacing } => {
                let spacing = self.spacing(spacing, axis, content);
                self.layout_stack(&mut element.children, content, axis, spacing);
            }
            Arrangement::Grid { columns, rows } => {
                self.layout_grid(&mut element.children, content, columns, rows)
            }
            Arrangement::Dock { last_child_fill } => {
                self.layout_dock(&mut element.children, content, last_child_fill)
            }
            Arrangement::Overlay => self.layout_overlay(&mut element.children, content),
            Arrangement::Flow { dx, dy } => {
                self.layout_flow(&mut element.children, content.translate(dx, dy))
            }
        }
    }

    fn spacing(&self, spacing: Sizing, axis: Axis, content: LayoutRect) -> f64 {
        let extent = match spacing {
            Sizing::Auto => return self.theme.default_spacing,
            Sizing::Star(_) => return 0.0,
            Sizing::PercentWidth(_) => content.width,
            Sizing::PercentHeight(_) => content.height,
            _ => content.extent(axis),
        };
        resolve(spacing, extent, &self.theme).max(0.0)
    }

    /// Two-phase stacking along either axis
    fn layout_stack(&self, children: &mut [Element], content: LayoutRect, axis: Axis, spacing: f64) {
        let cross = axis.cross();
        let extent = content.extent(axis);
        let offered = (content.width, content.height);

        let mut used = 0.0;
        let mut total_weight = 0.0;
        let mut visible = 0usize;
        for child in children.iter().filter(|c| c.visible) {
            visible += 1;
            used += child.box_model.margin.along(axis);
            match child.box_model.sizing(axis).star_weight() {
                Some(weight) => total_weight += weight,
                None => used += self.measure(child, axis, offered, true),
            }
        }
        used += spacing * visible.saturating_sub(1) as f64;
        let available = (extent - used).max(0.0);

        let mut cursor = content.start(axis);
        for child in children.iter_mut() {
            if !child.visible {
                clear(child);
                continue;
            }
            let along = match child.box_model.sizing(axis).star_weight() {
                Some(weight) if total_weight > 0.0 => child
                    .box_model
                    .constrain(axis, weight / total_weight * available),
                Some(_) => child.box_model.constrain(axis, 0.0),
                None => self.measure(child, axis, offered, true),
            };
            let across = self.measure(child, cross, offered, false);

            let (width, height) = axis.compose(along, across);
            let (slot_x, slot_y) = axis.compose(cursor, content.start(cross));
            self.place(child, slot_x, slot_y, width, height);

            cursor += child.box_model.margin.along(axis) + along + spacing;
        }
    }

    fn layout_grid(&self, children: &mut [Element], content: LayoutRect, columns: usize, rows: usize) {
        let cell_width = content.width / columns as f64;
        let cell_height = content.height / rows as f64;

        let mut index = 0usize;
        for child in children.iter_mut() {
            if !child.visible {
                clear(child);
                continue;
            }
            // Children past the last row keep going downwards
            let row = index / columns;
            let col = index % columns;
            index += 1;

            let cell = (cell_width, cell_height);
            let width = self.measure(child, Axis::Horizontal, cell, false);
            let height = self.measure(child, Axis::Vertical, cell, false);
            self.place(
                child,
                content.x + col as f64 * cell_width,
                content.y + row as f64 * cell_height,
                width,
                height,
            );
        }
    }

    fn layout_dock(&self, children: &mut [Element], content: LayoutRect, last_child_fill: bool) {
        let fill_index = if last_child_fill {
            children
                .iter()
                .rposition(|c| c.visible && c.dock.is_none())
        } else {
            None
        };

        let mut region = content;
        for (i, child) in children.iter_mut().enumerate() {
            if !child.visible {
                clear(child);
                continue;
            }
            let offered = (region.width, region.height);
            match child.dock {
                Some(edge @ (DockEdge::Top | DockEdge::Bottom)) => {
                    let width = self.measure(child, Axis::Horizontal, offered, false);
                    let height = self.measure(child, Axis::Vertical, offered, true);
                    let taken = (height + child.box_model.margin.vertical()).min(region.height);
                    if edge == DockEdge::Top {
                        self.place(child, region.x, region.y, width, height);
                        region = region.inset(taken, 0.0, 0.0, 0.0);
                    } else {
                        self.place(child, region.x, region.bottom() - taken, width, height);
                        region = region.inset(0.0, 0.0, taken, 0.0);
                    }
                }
                Some(edge) => {
                    let width = self.measure(child, Axis::Horizontal, offered, true);
                    let height = self.measure(child, Axis::Vertical, offered, false);
                    let taken = (width + child.box_model.margin.horizontal()).min(region.width);
                    if edge == DockEdge::Left {
                        self.place(child, region.x, region.y, width, height);
                        region = region.inset(0.0, 0.0, 0.0, taken);
                    } else {
                        self.place(child, region.right() - taken, region.y, width, height);
                        region = region.inset(0.0, taken, 0.0, 0.0);
                    }
                }
                None if Some(i) == fill_index => self.offer_whole(child, region),
                None => self.offer_whole(child, content),
            }
        }
    }

    fn layout_overlay(&self, children: &mut [Element], content: LayoutRect) {
        for child in children.iter_mut() {
            if child.visible {
                self.offer_whole(child, content);
            } else {
                clear(child);
            }
        }
    }

    /// Vertical run: each child advances the cursor by its height and margins
    fn layout_flow(&self, children: &mut [Element], content: LayoutRect) {
        let offered = (content.width, content.height);
        let mut cursor = content.y;
        for child in children.iter_mut() {
            if !child.visible {
                clear(child);
                continue;
            }
            let width = self.measure(child, Axis::Horizontal, offered, false);
            let height = self.measure(child, Axis::Vertical, offered, true);
            self.place(child, content.x, cursor, width, height);
            cursor += height + child.box_model.margin.vertical();
        }
    }

    fn offer_whole(&self, child: &mut Element, region: LayoutRect) {
        let offered = (region.width, region.height);
        let width = self.measure(child, Axis::Horizontal, offered, false);
        let height = self.measure(child, Axis::Vertical, offered, false);
        self.place(child, region.x, region.y, width, height);
    }
}

/// Drop the rectangles of a subtree
fn clear(element: &mut Element) {
    element.layout = None;
    for child in &mut element.children {
        clear(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn laid_out(source: &str, width: f64, height: f64) -> Element {
        let mut root = parse(source).root.expect("document should have a root");
        LayoutEngine::default().layout(&mut root, width, height);
        root
    }

    fn rect(root: &Element, id: &str) -> LayoutRect {
        root.find_by_id(id)
            .and_then(|el| el.layout)
            .unwrap_or_else(|| panic!("no layout for #{}", id))
    }

    fn rects(root: &Element) -> Vec<Option<LayoutRect>> {
        root.descendants().map(|el| el.layout).collect()
    }

    #[test]
    fn test_root_fills_viewport() {
        let root = laid_out("<div></div>", 800.0, 600.0);
        assert_eq!(root.layout, Some(LayoutRect::new(0.0, 0.0, 800.0, 600.0)));
    }

    #[test]
    fn test_hidden_sibling_takes_no_space() {
        let root = laid_out(
            "<vstack>\
               <div id=a height=50></div>\
               <div id=b visible=false height=999><p>inner</p></div>\
               <div id=c height=50></div>\
             </vstack>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "c").y, rect(&root, "a").y + 50.0);
        let hidden = root.find_by_id("b").unwrap();
        assert!(hidden.descendants().all(|el| el.layout.is_none()));
    }

    #[test]
    fn test_vertical_remainder_shares() {
        let root = laid_out(
            "<vstack height=400>\
               <div id=fixed height=100></div>\
               <div id=one height=*></div>\
               <div id=three height=3*></div>\
             </vstack>",
            800.0,
            600.0,
        );
        let one = rect(&root, "one");
        let three = rect(&root, "three");
        assert_eq!(one.height, 75.0);
        assert_eq!(three.height, 225.0);
        assert_eq!(one.height + three.height, 300.0);
        assert_eq!(three.y, 175.0);
    }

    #[test]
    fn test_horizontal_remainder_matches_vertical() {
        let root = laid_out(
            "<hstack width=400>\
               <div id=fixed width=100></div>\
               <div id=one width=*></div>\
               <div id=three width=3*></div>\
             </hstack>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "one").width, 75.0);
        assert_eq!(rect(&root, "three").width, 225.0);
        assert_eq!(rect(&root, "three").x, 175.0);
        // Cross axis fills
        assert_eq!(rect(&root, "one").height, 600.0);
    }

    #[test]
    fn test_stack_spacing_and_margins_are_accounted() {
        let root = laid_out(
            "<vstack height=300 spacing=10>\
               <div id=a height=50 margin=5></div>\
               <div id=b height=*></div>\
             </vstack>",
            800.0,
            600.0,
        );
        let a = rect(&root, "a");
        let b = rect(&root, "b");
        assert_eq!((a.x, a.y, a.width), (5.0, 5.0, 790.0));
        assert_eq!(b.y, 70.0);
        assert_eq!(b.height, 230.0);
        assert_eq!(b.bottom(), 300.0);
    }

    #[test]
    fn test_stack_auto_spacing_uses_theme() {
        let root = laid_out(
            "<hstack spacing=auto><button id=a></button><button id=b></button></hstack>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "a").width, 120.0);
        assert_eq!(rect(&root, "b").x, 128.0);
    }

    #[test]
    fn test_min_then_max() {
        let root = laid_out(
            "<vstack>\
               <div id=low height=10 min-height=20></div>\
               <div id=high height=100 max-height=30></div>\
               <div id=both height=5 min-height=50 max-height=40></div>\
             </vstack>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "low").height, 20.0);
        assert_eq!(rect(&root, "high").height, 30.0);
        assert_eq!(rect(&root, "both").height, 40.0);
    }

    #[test]
    fn test_percent_of_parent_content() {
        let root = laid_out(
            "<div width=400 height=200 padding=10><div id=child width=50% height=25%></div></div>",
            800.0,
            600.0,
        );
        let child = rect(&root, "child");
        assert_eq!((child.x, child.y), (10.0, 10.0));
        assert_eq!((child.width, child.height), (190.0, 45.0));
    }

    #[test]
    fn test_cross_axis_percent_units() {
        let root = laid_out("<div><div id=a height=50pw width=10ph></div></div>", 800.0, 600.0);
        let a = rect(&root, "a");
        assert_eq!((a.width, a.height), (60.0, 400.0));

        let root = laid_out(
            "<vstack><div id=a height=25pw></div><div id=b height=10%></div></vstack>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "a").height, 200.0);
        assert_eq!(rect(&root, "b").y, 200.0);
        assert_eq!(rect(&root, "b").height, 60.0);
    }

    #[test]
    fn test_border_and_padding_shrink_content() {
        let root = laid_out("<div padding=10 border=2><button id=b>Hi</button></div>", 800.0, 600.0);
        assert_eq!(rect(&root, "b"), LayoutRect::new(12.0, 12.0, 776.0, 40.0));
    }

    #[test]
    fn test_flow_uses_role_heights() {
        let root = laid_out(
            "<div><button id=a>A</button><input id=b/><p id=c>Text</p><div id=d margin=4></div></div>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "a").y, 0.0);
        assert_eq!(rect(&root, "b").y, 40.0);
        assert_eq!(rect(&root, "c").y, 76.0);
        assert_eq!(rect(&root, "c").height, 24.0);
        assert_eq!(rect(&root, "d"), LayoutRect::new(4.0, 104.0, 792.0, 40.0));
    }

    #[test]
    fn test_explicit_position_overrides() {
        let root = laid_out(
            "<div padding=20><div id=p x=30 y=40 width=10 height=10 margin=5></div></div>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "p"), LayoutRect::new(30.0, 40.0, 10.0, 10.0));
    }

    #[test]
    fn test_grid_cells_row_major() {
        let root = laid_out(
            "<grid columns=2 rows=2 width=200 height=100>\
               <div id=a></div><div id=b></div><div id=c></div><div id=d></div><div id=e></div>\
             </grid>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "a"), LayoutRect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(rect(&root, "b"), LayoutRect::new(100.0, 0.0, 100.0, 50.0));
        assert_eq!(rect(&root, "c"), LayoutRect::new(0.0, 50.0, 100.0, 50.0));
        // No reflow past capacity
        assert_eq!(rect(&root, "e"), LayoutRect::new(0.0, 100.0, 100.0, 50.0));
    }

    #[test]
    fn test_dock_edges_and_fill() {
        let root = laid_out(
            "<dock width=400 height=300>\
               <div id=top dock=top height=50></div>\
               <div id=bottom dock=bottom height=20></div>\
               <div id=left dock=left width=100></div>\
               <div id=fill></div>\
             </dock>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "top"), LayoutRect::new(0.0, 0.0, 400.0, 50.0));
        assert_eq!(rect(&root, "bottom"), LayoutRect::new(0.0, 280.0, 400.0, 20.0));
        assert_eq!(rect(&root, "left"), LayoutRect::new(0.0, 50.0, 100.0, 230.0));
        assert_eq!(rect(&root, "fill"), LayoutRect::new(100.0, 50.0, 300.0, 230.0));
    }

    #[test]
    fn test_undocked_children_overlap() {
        let root = laid_out(
            "<dock last-child-fill=false width=300 height=200><div id=a></div><div id=b width=50></div></dock>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "a"), LayoutRect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(rect(&root, "b"), LayoutRect::new(0.0, 0.0, 50.0, 200.0));
    }

    #[test]
    fn test_overlay_children_share_box() {
        let root = laid_out(
            "<overlay><div id=a></div><div id=b height=10></div></overlay>",
            640.0,
            480.0,
        );
        assert_eq!(rect(&root, "a"), LayoutRect::new(0.0, 0.0, 640.0, 480.0));
        assert_eq!(rect(&root, "b"), LayoutRect::new(0.0, 0.0, 640.0, 10.0));
    }

    #[test]
    fn test_scroll_offsets_children() {
        let root = laid_out(
            "<scroll scroll-x=15 scroll-y=30><div id=a height=100></div></scroll>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "a"), LayoutRect::new(0.0, -30.0, 800.0, 100.0));

        let root = laid_out(
            "<scroll direction=both scroll-x=15 scroll-y=30><div id=a height=100></div></scroll>",
            800.0,
            600.0,
        );
        assert_eq!(rect(&root, "a"), LayoutRect::new(-15.0, -30.0, 800.0, 100.0));
    }

    #[test]
    fn test_relayout_is_idempotent() {
        let mut root = parse(
            "<vstack spacing=4><div height=*></div><hstack height=60><div width=2*></div><div width=*></div></hstack></vstack>",
        )
        .root
        .unwrap();
        let engine = LayoutEngine::default();

        engine.layout(&mut root, 800.0, 600.0);
        let first = rects(&root);
        engine.layout(&mut root, 800.0, 600.0);
        assert_eq!(rects(&root), first);

        engine.layout(&mut root, 320.0, 200.0);
        assert_ne!(rects(&root), first);
        engine.layout(&mut root, 800.0, 600.0);
        assert_eq!(rects(&root), first);
    }

    #[test]
    fn test_hidden_root_has_no_layout() {
        let root = laid_out("<div visible=false><p>x</p></div>", 800.0, 600.0);
        assert!(rects(&root).iter().all(Option::is_none));
    }

    #[test]
    fn test_custom_theme_metrics() {
        let theme = ThemeMetrics::default().with_button_height(52.0).with_root_font_size(10.0);
        let mut root = parse("<div><button id=a></button><div id=b height=3rem></div></div>")
            .root
            .unwrap();
        LayoutEngine::new(theme).layout(&mut root, 800.0, 600.0);
        assert_eq!(rect(&root, "a").height, 52.0);
        assert_eq!(rect(&root, "b"), LayoutRect::new(0.0, 52.0, 800.0, 30.0));
    }
}
