//! Declarative variant tables.
//!
//! A table maps every state of a typed state enum to a pose and a transition.
//! Tables are built from an exhaustive `fn(S) -> Variant`, so a state without a
//! variant does not compile. String lookups (`by_name`) exist for hosts that
//! only have labels; unknown names resolve to `None` and animate nothing.

use std::fmt;
use std::marker::PhantomData;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::interp::Ease;
use crate::tween::{Repeat, TweenVars};
use crate::value::{Prop, PropValue, StyleMap};

/// A closed set of named states one kind of consumer understands.
pub trait VariantState: Copy + Eq + fmt::Debug + 'static {
    /// Every state, in `index` order.
    const ALL: &'static [Self];

    /// Conventional label, as used in JSON tables.
    fn name(self) -> &'static str;

    fn index(self) -> usize;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }
}

macro_rules! variant_states {
    ($(#[$meta:meta])* $name:ident { $($state:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($state),+
        }

        impl VariantState for $name {
            const ALL: &'static [Self] = &[$($name::$state),+];

            fn name(self) -> &'static str {
                match self {
                    $($name::$state => $label),+
                }
            }

            fn index(self) -> usize {
                self as usize
            }
        }
    };
}

variant_states! {
    /// Scroll or mount reveals.
    Reveal { Hidden => "hidden", Visible => "visible" }
}

variant_states! {
    /// Things that mount, show and leave (modals, overlays).
    Presence { Hidden => "hidden", Visible => "visible", Exit => "exit" }
}

variant_states! {
    /// Pointer-driven elements.
    Press { Rest => "rest", Hover => "hover", Tap => "tap" }
}

variant_states! {
    PageTransition { Initial => "initial", In => "in", Out => "out" }
}

variant_states! {
    /// The mobile navigation drawer.
    Drawer { Closed => "closed", Open => "open" }
}

variant_states! {
    /// Looping indicators.
    Spin { Animate => "animate" }
}

variant_states! {
    /// Viewport-observed elements.
    InView { Offscreen => "offscreen", Onscreen => "onscreen" }
}

/// Duration of a transition that names none.
pub const DEFAULT_TRANSITION_DURATION: f32 = 0.3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    #[default]
    Tween,
    /// Physical spring that settles within the duration.
    Spring,
}

/// Spring bounce when a spring transition names none.
pub const DEFAULT_BOUNCE: f32 = 0.25;

fn is_never(r: &Repeat) -> bool {
    *r == Repeat::Never
}

fn is_tween(k: &TransitionKind) -> bool {
    *k == TransitionKind::Tween
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f32>,
    #[serde(skip_serializing_if = "is_never")]
    pub repeat: Repeat,
    #[serde(rename = "type", skip_serializing_if = "is_tween")]
    pub kind: TransitionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stagger_children: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_children: Option<f32>,
    /// Extra delay per custom index (`i × delay_per_index`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_per_index: Option<f32>,
}

impl Transition {
    pub fn tween(duration: f32, ease: Ease) -> Self {
        Self {
            duration: Some(duration),
            ease: Some(ease),
            ..Self::default()
        }
    }

    pub fn spring(duration: f32, bounce: f32) -> Self {
        Self {
            duration: Some(duration),
            kind: TransitionKind::Spring,
            bounce: Some(bounce),
            ..Self::default()
        }
    }

    pub fn duration(duration: f32) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn children(mut self, stagger: f32, delay: f32) -> Self {
        self.stagger_children = Some(stagger);
        self.delay_children = Some(delay);
        self
    }

    pub fn per_index(mut self, delay: f32) -> Self {
        self.delay_per_index = Some(delay);
        self
    }

    /// Extra delay child `i` of a container with this transition waits.
    pub fn child_delay(&self, i: usize) -> f32 {
        self.delay_children.unwrap_or(0.0) + i as f32 * self.stagger_children.unwrap_or(0.0)
    }

    pub fn ease_or_default(&self) -> Ease {
        match self.kind {
            TransitionKind::Spring => Ease::Spring {
                bounce: self.bounce.unwrap_or(DEFAULT_BOUNCE),
            },
            TransitionKind::Tween => self.ease.unwrap_or(Ease::EASE_OUT),
        }
    }
}

/// A pose plus how to get there.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Variant {
    #[serde(flatten)]
    pub style: StyleMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

impl Variant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prop: Prop, value: impl Into<PropValue>) -> Self {
        self.style.insert(prop, value);
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Tween settings for animating into this variant as custom index `index`,
    /// after `extra_delay` seconds.
    pub fn tween_vars(&self, index: usize, extra_delay: f32) -> TweenVars {
        let t = self.transition.clone().unwrap_or_default();
        let delay = t.delay.unwrap_or(0.0) + index as f32 * t.delay_per_index.unwrap_or(0.0) + extra_delay;
        TweenVars {
            duration: Some(t.duration.unwrap_or(DEFAULT_TRANSITION_DURATION)),
            ease: Some(t.ease_or_default()),
            delay: Some(delay),
            repeat: Some(t.repeat),
            style: self.style.clone(),
            ..TweenVars::default()
        }
    }
}

/// Exhaustive state → variant table.
#[derive(Clone, PartialEq)]
pub struct VariantTable<S: VariantState> {
    variants: Vec<Variant>,
    marker: PhantomData<S>,
}

impl<S: VariantState> VariantTable<S> {
    pub fn new(f: impl Fn(S) -> Variant) -> Self {
        Self {
            variants: S::ALL.iter().map(|s| f(*s)).collect(),
            marker: PhantomData,
        }
    }

    pub fn get(&self, state: S) -> &Variant {
        &self.variants[state.index()]
    }

    /// Lookup by label; unknown labels are `None`.
    pub fn by_name(&self, name: &str) -> Option<&Variant> {
        S::from_name(name).map(|s| self.get(s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, &Variant)> {
        S::ALL.iter().copied().zip(self.variants.iter())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl<S: VariantState> fmt::Debug for VariantTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(s, v)| (s.name(), v)))
            .finish()
    }
}

impl<S: VariantState> Serialize for VariantTable<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.variants.len()))?;
        for (state, variant) in self.iter() {
            map.serialize_entry(state.name(), variant)?;
        }
        map.end()
    }
}

/// The site's variant tables.
pub mod catalog {
    use super::*;

    fn hidden_visible(hidden: Variant, visible: Variant) -> VariantTable<Reveal> {
        VariantTable::new(|s| match s {
            Reveal::Hidden => hidden.clone(),
            Reveal::Visible => visible.clone(),
        })
    }

    fn slide(prop: Prop, distance: f32) -> VariantTable<Reveal> {
        hidden_visible(
            Variant::new().with(prop, distance).with(Prop::Opacity, 0.0),
            Variant::new()
                .with(prop, 0.0)
                .with(Prop::Opacity, 1.0)
                .transition(Transition::tween(0.8, Ease::EASE_OUT)),
        )
    }

    pub fn fade_in() -> VariantTable<Reveal> {
        hidden_visible(
            Variant::new().with(Prop::Opacity, 0.0),
            Variant::new()
                .with(Prop::Opacity, 1.0)
                .transition(Transition::tween(0.6, Ease::EASE_OUT)),
        )
    }

    pub fn slide_up() -> VariantTable<Reveal> {
        slide(Prop::Y, 100.0)
    }

    pub fn slide_down() -> VariantTable<Reveal> {
        slide(Prop::Y, -100.0)
    }

    pub fn slide_left() -> VariantTable<Reveal> {
        slide(Prop::X, -100.0)
    }

    pub fn slide_right() -> VariantTable<Reveal> {
        slide(Prop::X, 100.0)
    }

    pub fn scale_in() -> VariantTable<Reveal> {
        hidden_visible(
            Variant::new().with(Prop::Scale, 0.8).with(Prop::Opacity, 0.0),
            Variant::new()
                .with(Prop::Scale, 1.0)
                .with(Prop::Opacity, 1.0)
                .transition(Transition::tween(0.6, Ease::BACK_OUT_CURVE)),
        )
    }

    pub fn rotate_in() -> VariantTable<Reveal> {
        hidden_visible(
            Variant::new()
                .with(Prop::Rotation, -180.0)
                .with(Prop::Scale, 0.8)
                .with(Prop::Opacity, 0.0),
            Variant::new()
                .with(Prop::Rotation, 0.0)
                .with(Prop::Scale, 1.0)
                .with(Prop::Opacity, 1.0)
                .transition(Transition::tween(0.8, Ease::BACK_OUT_CURVE)),
        )
    }

    pub fn bounce_in() -> VariantTable<Reveal> {
        hidden_visible(
            Variant::new().with(Prop::Scale, 0.3).with(Prop::Opacity, 0.0),
            Variant::new()
                .with(Prop::Scale, 1.0)
                .with(Prop::Opacity, 1.0)
                .transition(Transition::spring(0.8, 0.4)),
        )
    }

    pub fn stagger_container() -> VariantTable<Reveal> {
        hidden_visible(
            Variant::new().with(Prop::Opacity, 0.0),
            Variant::new()
                .with(Prop::Opacity, 1.0)
                .transition(Transition::default().children(0.1, 0.2)),
        )
    }

    pub fn stagger_item() -> VariantTable<Reveal> {
        hidden_visible(
            Variant::new().with(Prop::Y, 50.0).with(Prop::Opacity, 0.0),
            Variant::new()
                .with(Prop::Y, 0.0)
                .with(Prop::Opacity, 1.0)
                .transition(Transition::tween(0.8, Ease::EASE_OUT)),
        )
    }

    pub fn page() -> VariantTable<PageTransition> {
        VariantTable::new(|s| match s {
            PageTransition::Initial => Variant::new().with(Prop::Opacity, 0.0).with(Prop::Y, 20.0),
            PageTransition::In => Variant::new()
                .with(Prop::Opacity, 1.0)
                .with(Prop::Y, 0.0)
                .transition(Transition::tween(0.6, Ease::EASE_OUT)),
            PageTransition::Out => Variant::new()
                .with(Prop::Opacity, 0.0)
                .with(Prop::Y, -20.0)
                .transition(Transition::tween(0.4, Ease::EASE_IN)),
        })
    }

    pub fn modal() -> VariantTable<Presence> {
        VariantTable::new(|s| match s {
            Presence::Hidden => Variant::new().with(Prop::Opacity, 0.0).with(Prop::Scale, 0.8),
            Presence::Visible => Variant::new()
                .with(Prop::Opacity, 1.0)
                .with(Prop::Scale, 1.0)
                .transition(Transition::tween(0.3, Ease::EASE_OUT)),
            Presence::Exit => Variant::new()
                .with(Prop::Opacity, 0.0)
                .with(Prop::Scale, 0.8)
                .transition(Transition::tween(0.2, Ease::EASE_IN)),
        })
    }

    pub fn overlay() -> VariantTable<Presence> {
        VariantTable::new(|s| match s {
            Presence::Hidden => Variant::new().with(Prop::Opacity, 0.0),
            Presence::Visible => Variant::new()
                .with(Prop::Opacity, 1.0)
                .transition(Transition::duration(0.3)),
            Presence::Exit => Variant::new()
                .with(Prop::Opacity, 0.0)
                .transition(Transition::duration(0.2)),
        })
    }

    pub fn nav() -> VariantTable<Drawer> {
        VariantTable::new(|s| match s {
            Drawer::Closed => Variant::new()
                .with(Prop::X, PropValue::Percent(-100.0))
                .transition(Transition::tween(0.3, Ease::EASE_IN)),
            Drawer::Open => Variant::new()
                .with(Prop::X, 0.0)
                .transition(Transition::tween(0.3, Ease::EASE_OUT)),
        })
    }

    pub fn card_hover() -> VariantTable<Press> {
        VariantTable::new(|s| match s {
            Press::Rest => Variant::new()
                .with(Prop::Scale, 1.0)
                .with(Prop::Y, 0.0)
                .transition(Transition::tween(0.3, Ease::EASE_OUT)),
            Press::Hover => Variant::new()
                .with(Prop::Scale, 1.05)
                .with(Prop::Y, -10.0)
                .transition(Transition::tween(0.3, Ease::EASE_OUT)),
            Press::Tap => Variant::new()
                .with(Prop::Scale, 0.95)
                .transition(Transition::tween(0.1, Ease::EASE_IN)),
        })
    }

    pub fn button() -> VariantTable<Press> {
        VariantTable::new(|s| match s {
            Press::Rest => Variant::new()
                .with(Prop::Scale, 1.0)
                .transition(Transition::tween(0.2, Ease::EASE_OUT)),
            Press::Hover => Variant::new()
                .with(Prop::Scale, 1.1)
                .transition(Transition::tween(0.2, Ease::EASE_OUT)),
            Press::Tap => Variant::new()
                .with(Prop::Scale, 0.95)
                .transition(Transition::tween(0.1, Ease::EASE_IN)),
        })
    }

    pub fn spinner() -> VariantTable<Spin> {
        VariantTable::new(|Spin::Animate| {
            Variant::new()
                .with(Prop::Rotation, 360.0)
                .transition(Transition::tween(1.0, Ease::Linear).repeat(Repeat::Infinite))
        })
    }

    /// Visible takes a custom index: line `i` waits `i × 0.1`.
    pub fn text_reveal() -> VariantTable<Reveal> {
        hidden_visible(
            Variant::new().with(Prop::Opacity, 0.0).with(Prop::Y, 50.0),
            Variant::new()
                .with(Prop::Opacity, 1.0)
                .with(Prop::Y, 0.0)
                .transition(Transition::tween(0.6, Ease::EASE_OUT).per_index(0.1)),
        )
    }

    pub fn typewriter() -> VariantTable<Reveal> {
        hidden_visible(
            Variant::new().with(Prop::Width, 0.0),
            Variant::new()
                .with(Prop::Width, PropValue::Auto)
                .transition(Transition::tween(2.0, Ease::Linear)),
        )
    }

    pub fn parallax() -> VariantTable<InView> {
        VariantTable::new(|s| match s {
            InView::Offscreen => Variant::new().with(Prop::Y, 100.0).with(Prop::Opacity, 0.0),
            InView::Onscreen => Variant::new()
                .with(Prop::Y, 0.0)
                .with(Prop::Opacity, 1.0)
                .transition(Transition::spring(0.8, 0.4)),
        })
    }

    /// Table names exposed to string-keyed hosts.
    pub const NAMES: &[&str] = &[
        "fadeIn",
        "slideUp",
        "slideDown",
        "slideLeft",
        "slideRight",
        "scaleIn",
        "rotateIn",
        "bounceIn",
        "staggerContainer",
        "staggerItem",
        "page",
        "modal",
        "overlay",
        "nav",
        "cardHover",
        "button",
        "spinner",
        "textReveal",
        "typewriter",
        "parallax",
    ];

    /// JSON form of a table by name.
    pub fn table_json(name: &str) -> Option<serde_json::Value> {
        Some(match name {
            "fadeIn" => fade_in().to_json(),
            "slideUp" => slide_up().to_json(),
            "slideDown" => slide_down().to_json(),
            "slideLeft" => slide_left().to_json(),
            "slideRight" => slide_right().to_json(),
            "scaleIn" => scale_in().to_json(),
            "rotateIn" => rotate_in().to_json(),
            "bounceIn" => bounce_in().to_json(),
            "staggerContainer" => stagger_container().to_json(),
            "staggerItem" => stagger_item().to_json(),
            "page" => page().to_json(),
            "modal" => modal().to_json(),
            "overlay" => overlay().to_json(),
            "nav" => nav().to_json(),
            "cardHover" => card_hover().to_json(),
            "button" => button().to_json(),
            "spinner" => spinner().to_json(),
            "textReveal" => text_reveal().to_json(),
            "typewriter" => typewriter().to_json(),
            "parallax" => parallax().to_json(),
            _ => return None,
        })
    }

    /// One variant by table and state name. Unknown names are `None`.
    pub fn lookup(table: &str, state: &str) -> Option<Variant> {
        fn pick<S: VariantState>(t: VariantTable<S>, state: &str) -> Option<Variant> {
            t.by_name(state).cloned()
        }
        match table {
            "fadeIn" => pick(fade_in(), state),
            "slideUp" => pick(slide_up(), state),
            "slideDown" => pick(slide_down(), state),
            "slideLeft" => pick(slide_left(), state),
            "slideRight" => pick(slide_right(), state),
            "scaleIn" => pick(scale_in(), state),
            "rotateIn" => pick(rotate_in(), state),
            "bounceIn" => pick(bounce_in(), state),
            "staggerContainer" => pick(stagger_container(), state),
            "staggerItem" => pick(stagger_item(), state),
            "page" => pick(page(), state),
            "modal" => pick(modal(), state),
            "overlay" => pick(overlay(), state),
            "nav" => pick(nav(), state),
            "cardHover" => pick(card_hover(), state),
            "button" => pick(button(), state),
            "spinner" => pick(spinner(), state),
            "textReveal" => pick(text_reveal(), state),
            "typewriter" => pick(typewriter(), state),
            "parallax" => pick(parallax(), state),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_has_a_name_and_lookup() {
        fn check<S: VariantState>(t: &VariantTable<S>) {
            for s in S::ALL {
                assert_eq!(S::from_name(s.name()), Some(*s));
                assert!(t.by_name(s.name()).is_some());
            }
            assert!(t.by_name("wiggle").is_none());
        }
        check(&catalog::fade_in());
        check(&catalog::modal());
        check(&catalog::card_hover());
        check(&catalog::page());
        check(&catalog::nav());
        check(&catalog::spinner());
        check(&catalog::parallax());
    }

    #[test]
    fn tables_serialize_by_state_name() {
        let json = catalog::nav().to_json();
        assert_eq!(json["closed"]["x"], serde_json::json!("-100%"));
        assert_eq!(json["open"]["transition"]["duration"], serde_json::json!(0.3));

        let json = catalog::bounce_in().to_json();
        assert_eq!(json["visible"]["transition"]["type"], "spring");
        assert_eq!(json["hidden"].get("transition"), None);
    }

    #[test]
    fn per_index_delay_and_child_delay() {
        let visible = catalog::text_reveal().get(Reveal::Visible).clone();
        let vars = visible.tween_vars(3, 0.0);
        assert!((vars.delay.unwrap() - 0.3).abs() < 1e-6);

        let container = catalog::stagger_container();
        let t = container.get(Reveal::Visible).transition.clone().unwrap();
        assert!((t.child_delay(5) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn unspecified_transition_uses_framer_defaults() {
        let vars = catalog::fade_in().get(Reveal::Hidden).tween_vars(0, 0.0);
        assert_eq!(vars.duration, Some(DEFAULT_TRANSITION_DURATION));
        assert_eq!(vars.ease, Some(Ease::EASE_OUT));
    }

    #[test]
    fn catalog_names_resolve() {
        for name in catalog::NAMES {
            assert!(catalog::table_json(name).is_some(), "{name}");
        }
        assert!(catalog::lookup("cardHover", "hover").is_some());
        assert!(catalog::lookup("cardHover", "visible").is_none());
        assert!(catalog::lookup("nope", "hidden").is_none());
    }
}
