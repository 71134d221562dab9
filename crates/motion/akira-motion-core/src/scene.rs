//! Headless host document: elements with layout boxes and motion styles, plus the
//! viewport they are scrolled through.
//!
//! Insertion order is document order. Triggers measure layout rects, never the
//! animated pose, so a moving element does not move its own trigger.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::ids::ElementId;
use crate::value::{Prop, PropValue, ResolvedStyle};

/// Layout box in document coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Viewport {
    /// Whether any part of `rect` is on screen at the current scroll offset.
    pub fn intersects(&self, rect: &Rect) -> bool {
        rect.bottom() > self.scroll_y && rect.top() < self.scroll_y + self.height
    }
}

/// Description of an element to insert.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default)]
    pub parent: Option<ElementId>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }
}

#[derive(Clone, Debug)]
pub struct Element {
    pub id: ElementId,
    pub tag: String,
    pub dom_id: Option<String>,
    pub classes: Vec<String>,
    pub rect: Rect,
    pub parent: Option<ElementId>,
    style: ResolvedStyle,
    pin_offset: f32,
}

impl Element {
    /// Current value of a channel; untouched channels read as their resting value.
    pub fn value(&self, prop: Prop) -> f32 {
        self.style
            .get(&prop)
            .copied()
            .unwrap_or_else(|| prop.resting(self.rect.width))
    }

    /// Resolve a target value against this element's box.
    pub fn resolve(&self, prop: Prop, value: PropValue) -> f32 {
        value.resolve(prop, self.rect.width, self.rect.height)
    }

    /// Full motion pose, resting values included.
    pub fn style(&self) -> ResolvedStyle {
        Prop::ALL.iter().map(|p| (*p, self.value(*p))).collect()
    }

    /// Only the channels something has written.
    pub fn touched(&self) -> &ResolvedStyle {
        &self.style
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Vertical displacement applied while pinned.
    pub fn pin_offset(&self) -> f32 {
        self.pin_offset
    }

    pub(crate) fn write(&mut self, prop: Prop, value: f32) {
        self.style.insert(prop, value);
    }

    pub(crate) fn set_pin_offset(&mut self, offset: f32) {
        self.pin_offset = offset;
    }
}

/// What an operation animates: a selector, one element, or an explicit list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Selector(String),
    Element(ElementId),
    Elements(Vec<ElementId>),
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Target::Selector(s.to_string())
    }
}

impl From<String> for Target {
    fn from(s: String) -> Self {
        Target::Selector(s)
    }
}

impl From<ElementId> for Target {
    fn from(id: ElementId) -> Self {
        Target::Element(id)
    }
}

impl From<Vec<ElementId>> for Target {
    fn from(ids: Vec<ElementId>) -> Self {
        Target::Elements(ids)
    }
}

impl From<&[ElementId]> for Target {
    fn from(ids: &[ElementId]) -> Self {
        Target::Elements(ids.to_vec())
    }
}

/// `tag#id.class` compound; every present part must match.
#[derive(Clone, Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        self.tag.as_deref().map_or(true, |t| t == "*" || el.tag == t)
            && self
                .id
                .as_deref()
                .map_or(true, |id| el.dom_id.as_deref() == Some(id))
            && self.classes.iter().all(|c| el.has_class(c))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(src: &str, full: &str) -> Result<Compound, MotionError> {
    let invalid = |reason: &str| MotionError::InvalidSelector {
        input: full.to_string(),
        reason: reason.to_string(),
    };
    let mut out = Compound::default();
    let mut rest = src;

    let tag_len = rest
        .char_indices()
        .find(|(_, c)| !(is_ident_char(*c) || *c == '*'))
        .map_or(rest.len(), |(i, _)| i);
    if tag_len > 0 {
        out.tag = Some(rest[..tag_len].to_ascii_lowercase());
        rest = &rest[tag_len..];
    }

    while let Some(sigil) = rest.chars().next() {
        let body = &rest[1..];
        let len = body
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map_or(body.len(), |(i, _)| i);
        if len == 0 {
            return Err(invalid("empty name"));
        }
        let name = body[..len].to_string();
        match sigil {
            '.' => out.classes.push(name),
            '#' => out.id = Some(name),
            _ => return Err(invalid("unsupported syntax")),
        }
        rest = &body[len..];
    }
    Ok(out)
}

/// Comma-separated list of descendant chains over `tag`, `.class` and `#id`.
#[derive(Clone, Debug, PartialEq)]
pub struct Selector {
    chains: Vec<Vec<Compound>>,
}

impl std::str::FromStr for Selector {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chains = Vec::new();
        for part in s.split(',') {
            let chain = part
                .split_whitespace()
                .map(|c| parse_compound(c, s))
                .collect::<Result<Vec<_>, _>>()?;
            if chain.is_empty() {
                return Err(MotionError::InvalidSelector {
                    input: s.to_string(),
                    reason: "empty selector".into(),
                });
            }
            chains.push(chain);
        }
        Ok(Selector { chains })
    }
}

impl Selector {
    fn matches(&self, scene: &Scene, el: &Element) -> bool {
        self.chains.iter().any(|chain| chain_matches(scene, el, chain))
    }
}

fn chain_matches(scene: &Scene, el: &Element, chain: &[Compound]) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !last.matches(el) {
        return false;
    }
    // Walk up the parent chain consuming ancestor compounds right to left.
    let mut pending = ancestors.iter().rev().peekable();
    let mut cursor = el.parent.and_then(|p| scene.get(p));
    while let (Some(want), Some(node)) = (pending.peek(), cursor) {
        if want.matches(node) {
            pending.next();
        }
        cursor = node.parent.and_then(|p| scene.get(p));
    }
    pending.peek().is_none()
}

#[derive(Clone, Debug)]
pub struct Scene {
    elements: Vec<Element>,
    /// Position of each element in `elements`.
    index: HashMap<ElementId, usize>,
    viewport: Viewport,
    next_id: u32,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            elements: Vec::new(),
            index: HashMap::new(),
            viewport: Viewport {
                width,
                height,
                scroll_y: 0.0,
            },
            next_id: 0,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub(crate) fn set_scroll(&mut self, y: f32) {
        self.viewport.scroll_y = y.max(0.0);
    }

    pub(crate) fn set_size(&mut self, width: f32, height: f32) {
        self.viewport.width = width.max(0.0);
        self.viewport.height = height.max(0.0);
    }

    /// Append an element; it becomes last in document order.
    pub fn insert(&mut self, spec: ElementSpec) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.index.insert(id, self.elements.len());
        self.elements.push(Element {
            id,
            tag: spec.tag.to_ascii_lowercase(),
            dom_id: spec.id,
            classes: spec.classes,
            rect: spec.rect,
            parent: spec.parent,
            style: BTreeMap::new(),
            pin_offset: 0.0,
        });
        id
    }

    /// Remove an element and its descendants. Returns how many were removed.
    pub fn remove(&mut self, id: ElementId) -> usize {
        let mut doomed = vec![id];
        // Parents precede children in document order, so one pass collects the subtree.
        for el in &self.elements {
            if let Some(p) = el.parent {
                if doomed.contains(&p) && !doomed.contains(&el.id) {
                    doomed.push(el.id);
                }
            }
        }
        let before = self.elements.len();
        self.elements.retain(|e| !doomed.contains(&e.id));
        self.index = self
            .elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id, i))
            .collect();
        before - self.elements.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.index.get(&id).and_then(|&i| self.elements.get(i))
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let i = *self.index.get(&id)?;
        self.elements.get_mut(i)
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(el) = self.get_mut(id) {
            el.rect = rect;
        }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Bottom edge of the lowest element.
    pub fn document_height(&self) -> f32 {
        self.elements
            .iter()
            .map(|e| e.rect.bottom())
            .fold(0.0, f32::max)
    }

    fn document_index(&self, id: ElementId) -> usize {
        self.index.get(&id).copied().unwrap_or(usize::MAX)
    }

    /// Sort ids into document order and drop ones no longer in the scene.
    pub fn document_order(&self, ids: &mut Vec<ElementId>) {
        ids.retain(|id| self.contains(*id));
        ids.sort_by_key(|id| self.document_index(*id));
        ids.dedup();
    }

    /// Resolve a target to live elements in document order. Never fails: an invalid
    /// selector or a target with no matches resolves to nothing.
    pub fn query(&self, target: &Target) -> Vec<ElementId> {
        match target {
            Target::Element(id) => {
                if self.contains(*id) {
                    vec![*id]
                } else {
                    Vec::new()
                }
            }
            Target::Elements(ids) => {
                let mut out = ids.clone();
                self.document_order(&mut out);
                out
            }
            Target::Selector(s) => match s.parse::<Selector>() {
                Ok(sel) => self
                    .elements
                    .iter()
                    .filter(|e| sel.matches(self, e))
                    .map(|e| e.id)
                    .collect(),
                Err(err) => {
                    log::warn!("selector ignored: {err}");
                    Vec::new()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Scene, ElementId, ElementId, ElementId) {
        let mut scene = Scene::new(1000.0, 800.0);
        let grid = scene.insert(ElementSpec::new("div").id("grid").class("grid"));
        let a = scene.insert(ElementSpec::new("div").class("card").parent(grid));
        let b = scene.insert(ElementSpec::new("div").class("card").class("wide").parent(grid));
        scene.insert(ElementSpec::new("div").class("card"));
        (scene, grid, a, b)
    }

    #[test]
    fn class_id_and_tag_selectors() {
        let (scene, grid, a, b) = sample();
        assert_eq!(scene.query(&"#grid".into()), vec![grid]);
        assert_eq!(scene.query(&".card.wide".into()), vec![b]);
        assert_eq!(scene.query(&"div.card".into()).len(), 3);
        assert_eq!(scene.query(&".grid .card".into()), vec![a, b]);
    }

    #[test]
    fn selector_lists_stay_in_document_order() {
        let (scene, grid, a, b) = sample();
        assert_eq!(scene.query(&".wide, #grid, .card.wide".into()), vec![grid, b]);
        let _ = a;
    }

    #[test]
    fn unmatched_and_invalid_selectors_resolve_empty() {
        let (scene, ..) = sample();
        assert!(scene.query(&".missing".into()).is_empty());
        assert!(scene.query(&"div > .card".into()).is_empty());
        assert!(scene.query(&"".into()).is_empty());
        assert!(scene.query(&Target::Element(ElementId(999))).is_empty());
    }

    #[test]
    fn remove_takes_descendants() {
        let (mut scene, grid, ..) = sample();
        assert_eq!(scene.remove(grid), 3);
        assert_eq!(scene.len(), 1);
        let survivor = scene.insert(ElementSpec::new("span"));
        assert_eq!(scene.get(survivor).unwrap().tag, "span");
        assert!(scene.get(grid).is_none());
    }

    #[test]
    fn untouched_channels_read_resting() {
        let mut scene = Scene::new(100.0, 100.0);
        let id = scene.insert(ElementSpec::new("p").rect(Rect::new(0.0, 0.0, 240.0, 20.0)));
        let el = scene.get(id).unwrap();
        assert_eq!(el.value(Prop::Opacity), 1.0);
        assert_eq!(el.value(Prop::Width), 240.0);
        assert!(el.touched().is_empty());
    }
}
