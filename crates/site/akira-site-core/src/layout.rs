//! Block/grid layout of a view tree into the motion scene.

use std::collections::HashMap;

use akira_motion_core::{ElementId, ElementSpec, MotionContext, Rect, Scene};

use crate::node::{Node, LINE_HEIGHT};

/// A view laid out into the scene. `order` follows a pre-order walk of the view.
#[derive(Clone, Debug, Default)]
pub struct Mounted {
    order: Vec<ElementId>,
    keys: HashMap<String, ElementId>,
}

impl Mounted {
    pub fn root(&self) -> Option<ElementId> {
        self.order.first().copied()
    }

    pub fn get(&self, key: &str) -> Option<ElementId> {
        self.keys.get(key).copied()
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.order
    }

    /// Elements of this mount carrying `class`, in document order.
    pub fn with_class(&self, scene: &Scene, class: &str) -> Vec<ElementId> {
        self.order
            .iter()
            .copied()
            .filter(|id| scene.get(*id).is_some_and(|e| e.has_class(class)))
            .collect()
    }
}

/// Height the node occupies at `width`.
fn measure(node: &Node, width: f32) -> f32 {
    let content = if node.children.is_empty() {
        if node.text.is_some() {
            LINE_HEIGHT
        } else {
            0.0
        }
    } else {
        let cols = node.columns.max(1);
        let col_width = width / cols as f32;
        let rows: Vec<f32> = node
            .children
            .chunks(cols)
            .map(|row| row.iter().map(|c| measure(c, col_width)).fold(0.0, f32::max))
            .collect();
        rows.iter().sum::<f32>() + node.gap * rows.len().saturating_sub(1) as f32
    };
    content.max(node.min_height)
}

fn place(cx: &mut MotionContext, node: &Node, rect: Rect, parent: Option<ElementId>, out: &mut Mounted) {
    let mut spec = ElementSpec::new(node.tag.clone()).rect(rect);
    if let Some(id) = &node.dom_id {
        spec = spec.id(id.clone());
    }
    for class in &node.classes {
        spec = spec.class(class.clone());
    }
    if let Some(parent) = parent {
        spec = spec.parent(parent);
    }
    let id = cx.add_element(spec);
    out.order.push(id);
    if let Some(key) = &node.key {
        if out.keys.insert(key.clone(), id).is_some() {
            log::warn!("duplicate view key '{key}'");
        }
    }

    let cols = node.columns.max(1);
    let col_width = rect.width / cols as f32;
    let mut y = rect.y;
    for row in node.children.chunks(cols) {
        let height = row.iter().map(|c| measure(c, col_width)).fold(0.0, f32::max);
        for (i, child) in row.iter().enumerate() {
            let child_rect = Rect::new(rect.x + i as f32 * col_width, y, col_width, measure(child, col_width));
            place(cx, child, child_rect, Some(id), out);
        }
        y += height + node.gap;
    }
}

/// Insert the tree into the scene starting at `top`, full viewport width.
pub fn layout(cx: &mut MotionContext, view: &Node, top: f32) -> Mounted {
    let width = cx.scene().viewport().width;
    let rect = Rect::new(0.0, top, width, measure(view, width));
    let mut out = Mounted::default();
    place(cx, view, rect, None, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn grid_rows_stack_with_gap() {
        let mut cx = MotionContext::default();
        let view = Node::new("div").key("grid").columns(3).gap(30.0).children(
            (1..=6).map(|i| Node::new("div").class("card").key(format!("card-{i}")).min_height(320.0)),
        );
        let m = layout(&mut cx, &view, 1000.0);
        assert_eq!(m.elements().len(), 7);
        let scene = cx.scene();
        let grid = scene.get(m.get("grid").unwrap()).unwrap();
        assert_relative_eq!(grid.rect.height, 670.0);
        let c5 = scene.get(m.get("card-5").unwrap()).unwrap();
        assert_relative_eq!(c5.rect.y, 1350.0);
        assert_relative_eq!(c5.rect.x, 1280.0 / 3.0, epsilon = 1e-3);
        assert_eq!(c5.parent, m.root());
        assert_eq!(m.with_class(scene, "card").len(), 6);
    }
}
