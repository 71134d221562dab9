use akira_motion_core::MotionContext;

use crate::component::Component;
use crate::components::Footer;
use crate::config::SiteConfig;
use crate::layout::Mounted;
use crate::node::Node;

pub const WELCOME: &str = "Welcome to Akira";

/// Landing page: welcome header over the footer.
#[derive(Debug, Default)]
pub struct HomePage {
    footer: Footer,
}

impl HomePage {
    pub fn new(cfg: &SiteConfig) -> Self {
        Self {
            footer: Footer::from_config(cfg),
        }
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }
}

impl Component for HomePage {
    fn name(&self) -> &str {
        "home"
    }

    fn view(&self) -> Node {
        Node::new("div")
            .class("home")
            .child(
                Node::new("main").min_height(800.0).child(
                    Node::new("header")
                        .class("home-header")
                        .child(Node::new("h1").text(WELCOME))
                        .child(Node::new("p").class("text-muted").text("Modern web application")),
                ),
            )
            .child(self.footer.view())
    }

    fn attach(&mut self, cx: &mut MotionContext, mounted: &Mounted) {
        self.footer.attach(cx, mounted);
    }
}
