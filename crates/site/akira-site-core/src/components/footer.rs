use akira_motion_core::animations::scroll_reveal;
use akira_motion_core::{AnimationId, MotionContext, RevealOptions};

use crate::component::Component;
use crate::config::{FooterColumn, SiteConfig};
use crate::layout::Mounted;
use crate::node::{link, Node};

#[derive(Debug)]
pub struct Footer {
    pub columns: Vec<FooterColumn>,
    pub copyright: String,
    reveal: Option<AnimationId>,
}

impl Default for Footer {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

impl Footer {
    pub fn from_config(cfg: &SiteConfig) -> Self {
        Self {
            columns: cfg.footer_columns.clone(),
            copyright: cfg.copyright.clone(),
            reveal: None,
        }
    }

    pub fn reveal(&self) -> Option<AnimationId> {
        self.reveal
    }
}

impl Component for Footer {
    fn name(&self) -> &str {
        "footer"
    }

    fn view(&self) -> Node {
        Node::new("footer")
            .class("footer")
            .key("footer")
            .gap(24.0)
            .child(
                Node::new("div")
                    .class("footer-columns")
                    .columns(self.columns.len().max(1))
                    .children(self.columns.iter().map(|col| {
                        Node::new("div")
                            .class("footer-column")
                            .child(Node::new("h4").text(&col.title))
                            .child(
                                Node::new("ul")
                                    .children(col.links.iter().map(|l| Node::new("li").child(link(&l.name, &l.link)))),
                            )
                    })),
            )
            .child(Node::new("p").class("copyright").text(&self.copyright))
    }

    fn attach(&mut self, cx: &mut MotionContext, mounted: &Mounted) {
        if let Some(el) = mounted.get("footer") {
            self.reveal = Some(scroll_reveal(cx, el, RevealOptions::default()));
        }
    }
}
