#![allow(dead_code)]
//! Akira motion core (engine-agnostic)
//!
//! Headless motion layer for the Akira site: typed variant tables, a tween and
//! timeline engine, scroll triggers, media queries and registration scopes, all
//! owned by one `MotionContext`. Hosts (the wasm adapter, the site renderer) feed
//! it scroll, resize and frame time and apply the `Outputs` it returns.

pub mod animations;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod ids;
pub mod interp;
pub mod media;
pub mod motion;
pub mod outputs;
pub mod scene;
pub mod scope;
pub mod scroll;
pub mod timeline;
pub mod trigger;
pub mod tween;
pub mod value;
pub mod variants;

// Re-exports for consumers (adapters)
pub use animations::RevealOptions;
pub use config::Config;
pub use context::MotionContext;
pub use engine::{Animation, Engine};
pub use error::MotionError;
pub use ids::{AnimationId, BatchId, ElementId, MediaId, ScopeId, TriggerId};
pub use interp::{Ease, EaseDir};
pub use media::{MediaCondition, MediaQuery, MediaSetup};
pub use motion::{MotionNode, StaggerGroup};
pub use outputs::{Change, MotionEvent, Outputs};
pub use scene::{Element, ElementSpec, Rect, Scene, Target, Viewport};
pub use scroll::BatchConfig;
pub use timeline::{create_timeline, Placement, TimelineBuilder, TimelineVars};
pub use trigger::{
    Crossing, Edge, ScrollEnd, ScrollPosition, Scrub, ToggleAction, ToggleActions, TriggerCallback,
    TriggerCallbacks, TriggerConfig, TriggerInfo, TriggerPatch,
};
pub use tween::{Repeat, TweenVars};
pub use value::{Prop, PropValue, ResolvedStyle, StyleMap};
pub use variants::{
    catalog, Drawer, InView, PageTransition, Presence, Press, Reveal, Spin, Transition, Variant,
    VariantState, VariantTable,
};
