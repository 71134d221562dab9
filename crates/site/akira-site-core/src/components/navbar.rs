use std::sync::Arc;

use akira_motion_core::{catalog, AnimationId, Drawer, MotionContext, MotionNode};

use crate::component::Component;
use crate::config::{NavItem, SiteConfig};
use crate::layout::Mounted;
use crate::node::{link, Node};

pub const GET_STARTED: &str = "Get Started";
pub const VIEW_PRICING: &str = "View Pricing";

/// Desktop bar plus the mobile drawer. Only the signed-out actions are rendered.
#[derive(Debug)]
pub struct Navbar {
    pub brand: String,
    pub items: Vec<NavItem>,
    menu: Option<MotionNode<Drawer>>,
}

impl Default for Navbar {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

fn actions(extra: &str) -> Node {
    Node::new("div")
        .class(extra)
        .child(link(GET_STARTED, "/sign-up").class("get-started"))
        .child(link(VIEW_PRICING, "/pricing").class("view-pricing"))
}

impl Navbar {
    pub fn from_config(cfg: &SiteConfig) -> Self {
        Self {
            brand: cfg.brand.clone(),
            items: cfg.nav_items.clone(),
            menu: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.menu
            .as_ref()
            .is_some_and(|m| m.state() == Some(Drawer::Open))
    }

    /// Flip the mobile menu. Returns the new open state.
    pub fn toggle(&mut self, cx: &mut MotionContext) -> bool {
        let target = if self.is_open() { Drawer::Closed } else { Drawer::Open };
        if let Some(menu) = self.menu.as_mut() {
            menu.animate(cx, target);
        }
        self.is_open()
    }

    /// Close after a menu item was chosen. No-op when already closed.
    pub fn close(&mut self, cx: &mut MotionContext) -> Option<AnimationId> {
        if !self.is_open() {
            return None;
        }
        self.menu.as_mut().map(|m| m.animate(cx, Drawer::Closed))
    }
}

impl Component for Navbar {
    fn name(&self) -> &str {
        "navbar"
    }

    fn view(&self) -> Node {
        let logo = || link(&self.brand, "/").class("nav-logo");
        let body = Node::new("nav")
            .class("nav-body")
            .child(logo())
            .child(
                Node::new("ul")
                    .class("nav-items")
                    .children(self.items.iter().map(|i| Node::new("li").child(link(&i.name, &i.link)))),
            )
            .child(actions("nav-actions"));
        let mobile = Node::new("div")
            .class("mobile-nav")
            .child(
                Node::new("div")
                    .class("mobile-nav-header")
                    .child(logo())
                    .child(Node::new("button").class("mobile-nav-toggle").key("toggle")),
            )
            .child(
                Node::new("div")
                    .class("mobile-menu")
                    .key("menu")
                    .children(self.items.iter().map(|i| link(&i.name, &i.link).class("mobile-item")))
                    .child(actions("mobile-actions")),
            );
        Node::new("header").class("navbar").child(body).child(mobile)
    }

    fn attach(&mut self, cx: &mut MotionContext, mounted: &Mounted) {
        self.menu = mounted.get("menu").map(|el| {
            let mut node = MotionNode::new(el, Arc::new(catalog::nav()));
            node.set(cx, Drawer::Closed);
            node
        });
    }
}
