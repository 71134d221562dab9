//! Site copy and navigation, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub name: String,
    pub link: String,
}

impl NavItem {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterColumn {
    pub title: String,
    pub links: Vec<NavItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub brand: String,
    pub nav_items: Vec<NavItem>,
    pub footer_columns: Vec<FooterColumn>,
    pub copyright: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            brand: "Akira".into(),
            nav_items: vec![
                NavItem::new("Home", "/"),
                NavItem::new("Features", "#features"),
                NavItem::new("Pricing", "/pricing"),
            ],
            footer_columns: vec![
                FooterColumn {
                    title: "Product".into(),
                    links: vec![
                        NavItem::new("Features", "#features"),
                        NavItem::new("Pricing", "/pricing"),
                    ],
                },
                FooterColumn {
                    title: "Company".into(),
                    links: vec![NavItem::new("About", "/about"), NavItem::new("Contact", "/contact")],
                },
                FooterColumn {
                    title: "Legal".into(),
                    links: vec![NavItem::new("Privacy", "/privacy"), NavItem::new("Terms", "/terms")],
                },
            ],
            copyright: "© Akira. All rights reserved.".into(),
        }
    }
}

impl SiteConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, SiteError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = SiteConfig::from_json_str(r#"{ "brand": "Akira Labs" }"#).unwrap();
        assert_eq!(cfg.brand, "Akira Labs");
        assert_eq!(cfg.nav_items.len(), 3);
        assert!(SiteConfig::from_json_str("[1, 2]").is_err());
    }
}
