//! Akira site components.
//!
//! Components describe a static view and register their motion against an
//! `akira_motion_core::MotionContext` when mounted. `App` lays views out into the
//! context's scene, scopes every registration to its mount and releases it on
//! unmount.

pub mod app;
pub mod component;
pub mod components;
pub mod config;
pub mod error;
pub mod layout;
pub mod node;
pub mod render;

pub use app::{App, MountId};
pub use component::Component;
pub use components::{AnimationDemo, Footer, HeroSection, HomePage, Navbar, QuickTest};
pub use config::{FooterColumn, NavItem, SiteConfig};
pub use error::SiteError;
pub use layout::{layout, Mounted};
pub use node::Node;
pub use render::render_html;
