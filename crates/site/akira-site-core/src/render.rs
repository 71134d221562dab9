//! Markup for a mounted view with the current motion pose inlined.

use std::fmt::Write;

use akira_motion_core::{Element, Prop, Scene};

use crate::layout::Mounted;
use crate::node::Node;

const EPS: f32 = 1e-4;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn non_zero(v: f32) -> bool {
    v.abs() > EPS
}

/// Inline `style` for the element's pose, or `None` at rest.
pub fn inline_style(el: &Element) -> Option<String> {
    let mut parts = Vec::new();
    let opacity = el.value(Prop::Opacity);
    if non_zero(opacity - 1.0) {
        parts.push(format!("opacity: {}", round(opacity)));
    }

    let mut transform = Vec::new();
    let (x, y) = (el.value(Prop::X), el.value(Prop::Y) + el.pin_offset());
    if non_zero(x) || non_zero(y) {
        transform.push(format!("translate({}px, {}px)", round(x), round(y)));
    }
    let (xp, yp) = (el.value(Prop::XPercent), el.value(Prop::YPercent));
    if non_zero(xp) || non_zero(yp) {
        transform.push(format!("translate({}%, {}%)", round(xp), round(yp)));
    }
    let rotation = el.value(Prop::Rotation);
    if non_zero(rotation) {
        transform.push(format!("rotate({}deg)", round(rotation)));
    }
    let scale = el.value(Prop::Scale);
    if non_zero(scale - 1.0) {
        transform.push(format!("scale({})", round(scale)));
    }
    if !transform.is_empty() {
        parts.push(format!("transform: {}", transform.join(" ")));
    }
    if let Some(width) = el.touched().get(&Prop::Width) {
        parts.push(format!("width: {}px", round(*width)));
    }
    (!parts.is_empty()).then(|| parts.join("; "))
}

fn round(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

fn write_node<'a>(out: &mut String, node: &Node, scene: &Scene, ids: &mut impl Iterator<Item = &'a akira_motion_core::ElementId>) {
    let el = ids.next().and_then(|id| scene.get(*id));
    let _ = write!(out, "<{}", node.tag);
    if let Some(id) = &node.dom_id {
        let _ = write!(out, " id=\"{}\"", escape(id));
    }
    if !node.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape(&node.classes.join(" ")));
    }
    if let Some(href) = &node.href {
        let _ = write!(out, " href=\"{}\"", escape(href));
    }
    if let Some(style) = el.and_then(inline_style) {
        let _ = write!(out, " style=\"{style}\"");
    }
    out.push('>');
    if let Some(text) = &node.text {
        out.push_str(&escape(text));
    }
    for child in &node.children {
        write_node(out, child, scene, ids);
    }
    let _ = write!(out, "</{}>", node.tag);
}

/// Serialize `view` as laid out in `mounted`.
pub fn render_html(scene: &Scene, view: &Node, mounted: &Mounted) -> String {
    let mut out = String::new();
    let mut ids = mounted.elements().iter();
    write_node(&mut out, view, scene, &mut ids);
    out
}
