#![allow(dead_code)]
use std::collections::HashMap;

use akira_motion_core::{Config, Crossing, ElementId, ElementSpec, MotionContext, MotionEvent, Outputs, Rect};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Layout {
    pub viewport: LayoutViewport,
    pub elements: Vec<LayoutElement>,
}

#[derive(Debug, Deserialize)]
pub struct LayoutViewport {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Deserialize)]
pub struct LayoutElement {
    pub key: String,
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub rect: Rect,
    #[serde(default)]
    pub parent: Option<String>,
}

/// Context sized to the layout's viewport with every element inserted.
pub fn context_from_layout(name: &str) -> (MotionContext, HashMap<String, ElementId>) {
    let layout: Layout = akira_test_fixtures::layouts::load(name).expect("layout fixture");
    let cfg = Config {
        viewport_width: layout.viewport.width,
        viewport_height: layout.viewport.height,
        ..Config::default()
    };
    let mut cx = MotionContext::new(cfg);
    let mut keys = HashMap::new();
    for el in layout.elements {
        let mut spec = ElementSpec::new(el.tag).rect(el.rect);
        if let Some(id) = el.id {
            spec = spec.id(id);
        }
        for class in el.classes {
            spec = spec.class(class);
        }
        if let Some(parent) = el.parent.as_ref().and_then(|p| keys.get(p)) {
            spec = spec.parent(*parent);
        }
        let id = cx.add_element(spec);
        keys.insert(el.key, id);
    }
    (cx, keys)
}

/// Distinct crossing kinds reported by `TriggerToggled` events, sorted.
pub fn crossing_kinds(out: &Outputs) -> Vec<Crossing> {
    let mut kinds: Vec<Crossing> = out
        .events
        .iter()
        .filter_map(|e| match e {
            MotionEvent::TriggerToggled { crossing, .. } => Some(*crossing),
            _ => None,
        })
        .collect();
    sort_kinds(&mut kinds);
    kinds
}

pub fn sort_kinds(kinds: &mut Vec<Crossing>) {
    kinds.sort_by_key(|c| *c as u8);
    kinds.dedup();
}

#[derive(Debug, Deserialize)]
pub struct ScrollScript {
    pub target: String,
    pub steps: Vec<ScrollStep>,
}

#[derive(Debug, Deserialize)]
pub struct ScrollStep {
    pub scroll: f32,
    #[serde(default)]
    pub expect: Vec<Crossing>,
    #[serde(default)]
    pub tick: Option<f32>,
}
