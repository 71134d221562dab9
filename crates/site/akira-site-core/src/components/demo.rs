//! Showcase page exercising both toolkits.

use std::sync::Arc;

use akira_motion_core::animations::{fade_in, fade_out, stagger_in};
use akira_motion_core::scroll::{batch, BatchConfig};
use akira_motion_core::{
    catalog, AnimationId, BatchId, MotionContext, MotionNode, Press, Reveal, StaggerGroup, Target,
    TriggerCallbacks, TweenVars,
};

use crate::component::Component;
use crate::layout::Mounted;
use crate::node::Node;

pub const CARD_COUNT: usize = 6;
pub const SCROLL_CARD_COUNT: usize = 5;
/// Per-card delay of the scroll list entrance.
pub const SCROLL_STAGGER: f32 = 0.2;
pub const CARD_HEIGHT: f32 = 320.0;
pub const SCROLL_CARD_HEIGHT: f32 = 200.0;

#[derive(Debug, Default)]
pub struct AnimationDemo {
    header: Option<MotionNode<Reveal>>,
    heading: Option<MotionNode<Reveal>>,
    grid: Option<StaggerGroup<Reveal>>,
    cards: Vec<MotionNode<Press>>,
    button: Option<MotionNode<Press>>,
    gsap: Option<AnimationId>,
    scroll_batch: Option<BatchId>,
}

fn info_card(title: &str, body: &str) -> Node {
    Node::new("div")
        .class("demo-card")
        .child(Node::new("h3").text(title))
        .child(Node::new("p").text(body))
}

fn section(title: &str) -> Node {
    Node::new("section").class("demo-section").gap(48.0).child(Node::new("h2").text(title))
}

impl AnimationDemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gsap_animation(&self) -> Option<AnimationId> {
        self.gsap
    }

    pub fn scroll_batch(&self) -> Option<BatchId> {
        self.scroll_batch
    }

    pub fn grid(&self) -> Option<&StaggerGroup<Reveal>> {
        self.grid.as_ref()
    }

    /// Pointer handlers of card `i` (0-based).
    pub fn card_mut(&mut self, i: usize) -> Option<&mut MotionNode<Press>> {
        self.cards.get_mut(i)
    }

    pub fn button_mut(&mut self) -> Option<&mut MotionNode<Press>> {
        self.button.as_mut()
    }

    fn scroll_callbacks() -> TriggerCallbacks {
        let enter = |cx: &mut MotionContext, els: &[akira_motion_core::ElementId]| {
            stagger_in(cx, els, TweenVars::new().stagger(SCROLL_STAGGER));
        };
        TriggerCallbacks::new()
            .on_enter(enter)
            .on_enter_back(enter)
            .on_leave(|cx, els| {
                fade_out(cx, els, TweenVars::new());
            })
    }
}

impl Component for AnimationDemo {
    fn name(&self) -> &str {
        "animation-demo"
    }

    fn view(&self) -> Node {
        let header = Node::new("div")
            .class("demo-header")
            .key("header")
            .child(Node::new("h1").text("Animation Demo"))
            .child(Node::new("p").text("Showcasing GSAP, ScrollTrigger, and Framer Motion"));

        let gsap = section("GSAP Animations").child(
            Node::new("div").class("gsap-grid").key("gsap").columns(3).gap(32.0).children([
                info_card("Fade In", "Smooth opacity transition powered by GSAP"),
                info_card("Scale Animation", "Scale and fade animations with easing"),
                info_card("Stagger Effect", "Sequential animations with delay"),
            ]),
        );

        let framer = Node::new("section")
            .class("demo-section")
            .gap(48.0)
            .child(Node::new("h2").key("framer-heading").text("Framer Motion Animations"))
            .child(
                Node::new("div").class("card-grid").key("grid").columns(3).gap(32.0).children(
                    (1..=CARD_COUNT).map(|i| {
                        Node::new("div")
                            .class("card")
                            .key(format!("card-{i}"))
                            .min_height(CARD_HEIGHT)
                            .child(Node::new("h3").text(format!("Card {i}")))
                            .child(Node::new("p").text("Interactive card with hover effects"))
                    }),
                ),
            );

        let css = section("Tailwind CSS Animations").child(
            Node::new("div").class("css-grid").columns(4).gap(24.0).children([
                info_card("Fade In", "CSS fade animation").class("animate-fade-in"),
                info_card("Slide Up", "CSS slide animation").class("animate-slide-in-up"),
                info_card("Scale In", "CSS scale animation").class("animate-scale-in"),
                info_card("Rotate In", "CSS rotate animation").class("animate-rotate-in"),
            ]),
        );

        let scroll = section("ScrollTrigger Animations").child(
            Node::new("div").class("scroll-list").gap(32.0).children((1..=SCROLL_CARD_COUNT).map(|i| {
                Node::new("div")
                    .class("scroll-card")
                    .min_height(SCROLL_CARD_HEIGHT)
                    .child(Node::new("h3").text(format!("Scroll Item {i}")))
                    .child(Node::new("p").text(
                        "This element animates when it enters the viewport using ScrollTrigger.",
                    ))
            })),
        );

        let buttons = section("Interactive Elements").child(
            Node::new("div")
                .class("buttons")
                .columns(3)
                .child(Node::new("button").key("button").text("Framer Motion Button"))
                .child(Node::new("button").class("css-hover").text("CSS Hover Button"))
                .child(Node::new("button").class("animate-pulse-slow").text("CSS Animated Button")),
        );

        Node::new("div")
            .class("animation-demo")
            .gap(96.0)
            .child(header)
            .child(gsap)
            .child(framer)
            .child(css)
            .child(scroll)
            .child(buttons)
            .child(
                Node::new("section")
                    .class("animate-typewriter")
                    .text("This text appears with a typewriter effect..."),
            )
    }

    fn attach(&mut self, cx: &mut MotionContext, mounted: &Mounted) {
        self.header = mounted.get("header").map(|el| {
            let mut node = MotionNode::new(el, Arc::new(catalog::fade_in()));
            node.set(cx, Reveal::Hidden);
            node.animate(cx, Reveal::Visible);
            node
        });

        self.gsap = mounted
            .get("gsap")
            .map(|el| fade_in(cx, el, TweenVars::new().delay(0.5)));

        self.heading = mounted.get("framer-heading").map(|el| {
            let mut node = MotionNode::new(el, Arc::new(catalog::slide_up()));
            node.when_in_view(cx, Reveal::Visible, Reveal::Hidden, false);
            node
        });

        let card_ids: Vec<_> = (1..=CARD_COUNT)
            .filter_map(|i| mounted.get(&format!("card-{i}")))
            .collect();
        if let Some(grid) = mounted.get("grid") {
            let item = Arc::new(catalog::stagger_item());
            let mut group = StaggerGroup::new(
                MotionNode::new(grid, Arc::new(catalog::stagger_container())),
                card_ids.iter().map(|c| MotionNode::new(*c, Arc::clone(&item))).collect(),
            );
            group.when_in_view(cx, Reveal::Visible, Reveal::Hidden, false);
            self.grid = Some(group);
        }
        let hover = Arc::new(catalog::card_hover());
        self.cards = card_ids
            .iter()
            .map(|c| MotionNode::new(*c, Arc::clone(&hover)))
            .collect();

        let scroll_cards = mounted.with_class(cx.scene(), "scroll-card");
        self.scroll_batch = batch(
            cx,
            Target::Elements(scroll_cards),
            BatchConfig::new().callbacks(Self::scroll_callbacks()),
        );

        self.button = mounted.get("button").map(|el| {
            let mut node = MotionNode::new(el, Arc::new(catalog::button()));
            node.set(cx, Press::Rest);
            node
        });
    }
}
