use std::sync::Arc;

use akira_motion_core::{catalog, MotionContext, MotionNode, Reveal};

use crate::component::Component;
use crate::layout::Mounted;
use crate::node::Node;

pub const DEFAULT_TITLE: &str = "Your shortcut to everything.";
pub const DEFAULT_SUBTITLE: &str =
    "A collection of powerful productivity tools all within an extendable launcher. Fast, ergonomic and reliable.";

/// Full-screen hero height in CSS pixels.
pub const HERO_HEIGHT: f32 = 800.0;

#[derive(Debug)]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    text: Vec<MotionNode<Reveal>>,
}

impl Default for HeroSection {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_SUBTITLE)
    }
}

impl HeroSection {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            text: Vec::new(),
        }
    }

    pub fn text_nodes(&self) -> &[MotionNode<Reveal>] {
        &self.text
    }
}

impl Component for HeroSection {
    fn name(&self) -> &str {
        "hero"
    }

    fn view(&self) -> Node {
        Node::new("section").class("hero").min_height(HERO_HEIGHT).child(
            Node::new("div")
                .class("hero-text")
                .child(Node::new("h1").class("hero-title").key("title").text(&self.title))
                .child(Node::new("p").class("hero-subtitle").key("subtitle").text(&self.subtitle)),
        )
    }

    fn attach(&mut self, cx: &mut MotionContext, mounted: &Mounted) {
        let table = Arc::new(catalog::slide_up());
        self.text = ["title", "subtitle"]
            .into_iter()
            .filter_map(|key| mounted.get(key))
            .map(|el| {
                let mut node = MotionNode::new(el, Arc::clone(&table));
                node.set(cx, Reveal::Hidden);
                node.animate(cx, Reveal::Visible);
                node
            })
            .collect();
    }
}
