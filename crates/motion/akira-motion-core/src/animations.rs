//! Named animation operations.
//!
//! Each takes a target plus override vars merged over the operation's defaults,
//! and returns the animation handle. A target that matches nothing yields a
//! handle with nothing behind it.

use serde::{Deserialize, Serialize};

use crate::context::MotionContext;
use crate::ids::{AnimationId, TriggerId};
use crate::interp::Ease;
use crate::scene::Target;
use crate::trigger::{
    Edge, ScrollEnd, ScrollPosition, Scrub, ToggleActions, TriggerConfig, TriggerPatch,
};
use crate::tween::TweenVars;
use crate::value::{Prop, StyleMap};

/// Overshoot of the `back` eases used by the scale and rotate entrances.
pub const BACK_STRENGTH: f32 = 1.7;

fn enter(
    cx: &mut MotionContext,
    label: &str,
    target: Target,
    from: StyleMap,
    defaults: TweenVars,
    vars: TweenVars,
) -> AnimationId {
    cx.spawn(label, &target, Some(&from), vars.merged_over(defaults))
}

fn exit(cx: &mut MotionContext, label: &str, target: Target, defaults: TweenVars, vars: TweenVars) -> AnimationId {
    cx.spawn(label, &target, None, vars.merged_over(defaults))
}

pub fn fade_in(cx: &mut MotionContext, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
    enter(
        cx,
        "fadeIn",
        target.into(),
        StyleMap::new().with(Prop::Opacity, 0.0),
        TweenVars::new()
            .prop(Prop::Opacity, 1.0)
            .duration(0.6)
            .ease(Ease::POWER2_OUT),
        vars,
    )
}

pub fn fade_out(cx: &mut MotionContext, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
    exit(
        cx,
        "fadeOut",
        target.into(),
        TweenVars::new()
            .prop(Prop::Opacity, 0.0)
            .duration(0.4)
            .ease(Ease::POWER2_IN),
        vars,
    )
}

fn slide(
    cx: &mut MotionContext,
    label: &str,
    target: Target,
    axis: Prop,
    distance: f32,
    vars: TweenVars,
) -> AnimationId {
    enter(
        cx,
        label,
        target,
        StyleMap::new().with(axis, distance).with(Prop::Opacity, 0.0),
        TweenVars::new()
            .prop(axis, 0.0)
            .prop(Prop::Opacity, 1.0)
            .duration(0.8)
            .ease(Ease::POWER3_OUT),
        vars,
    )
}

/// Rise from 100px below.
pub fn slide_in_up(cx: &mut MotionContext, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
    slide(cx, "slideInUp", target.into(), Prop::Y, 100.0, vars)
}

pub fn slide_in_down(cx: &mut MotionContext, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
    slide(cx, "slideInDown", target.into(), Prop::Y, -100.0, vars)
}

pub fn slide_in_left(cx: &mut MotionContext, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
    slide(cx, "slideInLeft", target.into(), Prop::X, -100.0, vars)
}

pub fn slide_in_right(cx: &mut MotionContext, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
    slide(cx, "slideInRight", target.into(), Prop::X, 100.0, vars)
}

pub fn scale_in(cx: &mut MotionContext, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
    enter(
        cx,
        "scaleIn",
        target.into(),
        StyleMap::new().with(Prop::Scale, 0.8).with(Prop::Opacity, 0.0),
        TweenVars::new()
            .prop(Prop::Scale, 1.0)
            .prop(Prop::Opacity, 1.0)
            .duration(0.6)
            .ease(Ease::back_out(BACK_STRENGTH)),
        vars,
    )
}

pub fn scale_out(cx: &mut MotionContext, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
    exit(
        cx,
        "scaleOut",
        target.into(),
        TweenVars::new()
            .prop(Prop::Scale, 0.8)
            .prop(Prop::Opacity, 0.0)
            .duration(0.4)
            .ease(Ease::back_in(BACK_STRENGTH)),
        vars,
    )
}

pub fn rotate_in(cx: &mut MotionContext, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
    enter(
        cx,
        "rotateIn",
        target.into(),
        StyleMap::new()
            .with(Prop::Rotation, -180.0)
            .with(Prop::Scale, 0.8)
            .with(Prop::Opacity, 0.0),
        TweenVars::new()
            .prop(Prop::Rotation, 0.0)
            .prop(Prop::Scale, 1.0)
            .prop(Prop::Opacity, 1.0)
            .duration(0.8)
            .ease(Ease::back_out(BACK_STRENGTH)),
        vars,
    )
}

/// Slide-up entrance over a group; target `i` in document order starts `i × stagger`
/// after the first. The stagger defaults to `Config::default_stagger`.
pub fn stagger_in(cx: &mut MotionContext, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
    let stagger = cx.config().default_stagger;
    enter(
        cx,
        "staggerIn",
        target.into(),
        StyleMap::new().with(Prop::Y, 50.0).with(Prop::Opacity, 0.0),
        TweenVars::new()
            .prop(Prop::Y, 0.0)
            .prop(Prop::Opacity, 1.0)
            .duration(0.8)
            .ease(Ease::POWER3_OUT)
            .stagger(stagger),
        vars,
    )
}

/// Tie vertical offset to scroll while the target crosses the viewport.
/// `speed` 1 moves the target up by half its height over that span.
pub fn parallax(
    cx: &mut MotionContext,
    target: impl Into<Target>,
    speed: f32,
    vars: TweenVars,
) -> AnimationId {
    let target = target.into();
    let id = cx.spawn(
        "parallax",
        &target,
        None,
        vars.merged_over(
            TweenVars::new()
                .prop(Prop::YPercent, -50.0 * speed)
                .ease(Ease::Linear),
        ),
    );
    let trigger = TriggerConfig {
        trigger: Some(target),
        start: ScrollPosition::new(Edge::Top, Edge::Bottom),
        end: Some(ScrollEnd::At(ScrollPosition::new(Edge::Bottom, Edge::Top))),
        scrub: Scrub::Immediate,
        ..TriggerConfig::default()
    };
    cx.attach_trigger(id, trigger);
    id
}

/// Options for `scroll_reveal`. Unset fields take the reveal defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealOptions {
    /// Element whose position triggers the reveal; the target itself by default.
    pub trigger: Option<Target>,
    pub start: Option<ScrollPosition>,
    pub end: Option<ScrollEnd>,
    #[serde(flatten)]
    pub vars: TweenVars,
}

/// Rise into place when the target crosses the reveal line, and sink back when
/// scrolled back above it.
pub fn scroll_reveal(cx: &mut MotionContext, target: impl Into<Target>, options: RevealOptions) -> AnimationId {
    let target = target.into();
    let observed = options.trigger.unwrap_or_else(|| target.clone());
    if cx.resolve(&observed).is_empty() {
        return cx.empty_handle();
    }
    let start = options.start.unwrap_or_else(|| {
        cx.config().reveal_start.parse().unwrap_or_else(|err| {
            log::warn!("reveal_start ignored: {err}");
            ScrollPosition::new(Edge::Top, Edge::Percent(80.0))
        })
    });
    let id = enter(
        cx,
        "scrollReveal",
        target,
        StyleMap::new().with(Prop::Y, 100.0).with(Prop::Opacity, 0.0),
        TweenVars::new()
            .prop(Prop::Y, 0.0)
            .prop(Prop::Opacity, 1.0)
            .duration(1.0)
            .ease(Ease::POWER3_OUT),
        options.vars,
    );
    let trigger = TriggerConfig {
        trigger: Some(observed),
        start,
        end: options.end,
        toggle_actions: ToggleActions::PLAY_REVERSE_ON_LEAVE_BACK,
        ..TriggerConfig::default()
    };
    cx.attach_trigger(id, trigger);
    id
}

/// Hold the target in place while its box scrolls past the top of the viewport.
pub fn pin_element(cx: &mut MotionContext, target: impl Into<Target>, patch: TriggerPatch) -> Option<TriggerId> {
    let cfg = patch.apply(TriggerConfig {
        trigger: Some(target.into()),
        start: ScrollPosition::new(Edge::Top, Edge::Top),
        end: Some(ScrollEnd::At(ScrollPosition::new(Edge::Bottom, Edge::Top))),
        pin: true,
        ..TriggerConfig::default()
    });
    cx.create_trigger(cfg, Default::default())
}

/// Turn vertical scroll over a pinned container into horizontal travel of its
/// items: `N` items scroll over `(N−1)` viewport widths and snap per item.
pub fn horizontal_scroll(
    cx: &mut MotionContext,
    container: impl Into<Target>,
    items: impl Into<Target>,
    patch: TriggerPatch,
) -> AnimationId {
    let items = items.into();
    let count = cx.resolve(&items).len();
    let travel = count.saturating_sub(1) as f32;
    let cfg = patch.apply(TriggerConfig {
        trigger: Some(container.into()),
        start: ScrollPosition::new(Edge::Top, Edge::Top),
        end: Some(ScrollEnd::ViewportWidths(travel)),
        scrub: Scrub::Smooth(1.0),
        pin: true,
        snap: (count >= 2).then(|| 1.0 / travel),
        ..TriggerConfig::default()
    });
    if cx.trigger_unmatched(&cfg) {
        return cx.empty_handle();
    }
    let id = cx.spawn(
        "horizontalScroll",
        &items,
        None,
        TweenVars::new()
            .prop(Prop::XPercent, -100.0 * travel)
            .ease(Ease::Linear),
    );
    cx.attach_trigger(id, cfg);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ElementSpec, Rect};
    use approx::assert_relative_eq;

    #[test]
    fn fade_in_overrides_merge() {
        let mut cx = MotionContext::default();
        let el = cx.add_element(ElementSpec::new("div").class("hero"));
        let id = fade_in(&mut cx, ".hero", TweenVars::new().delay(0.5));
        // from pose is on screen before the first tick
        assert_eq!(cx.scene().get(el).unwrap().value(Prop::Opacity), 0.0);
        assert_relative_eq!(cx.animation(id).unwrap().duration(), 1.1);
    }

    #[test]
    fn stagger_offsets_follow_document_order() {
        let mut cx = MotionContext::default();
        let ids: Vec<_> = (0..4)
            .map(|_| cx.add_element(ElementSpec::new("li")))
            .collect();
        let anim = stagger_in(&mut cx, "li", TweenVars::new());
        let a = cx.animation(anim).unwrap();
        assert_relative_eq!(a.offset_of(ids[3]).unwrap(), 0.3, epsilon = 1e-6);
        assert_relative_eq!(a.duration(), 0.8 + 0.3, epsilon = 1e-6);
    }

    #[test]
    fn pinned_section_travels_with_scroll() {
        let mut cx = MotionContext::default();
        let el = cx.add_element(
            ElementSpec::new("section")
                .id("features")
                .rect(Rect::new(0.0, 1000.0, 1280.0, 600.0)),
        );
        let id = pin_element(&mut cx, "#features", TriggerPatch::default()).unwrap();
        let info = cx.trigger_info(id).unwrap();
        assert!(info.pin);
        assert_relative_eq!(info.start, 1000.0);
        assert_relative_eq!(info.end, 1600.0);

        cx.scroll_to(1200.0);
        assert!(cx.trigger_info(id).unwrap().is_active);
        assert_relative_eq!(cx.scene().get(el).unwrap().pin_offset(), 200.0);
        // released at the end of its range, held at the full distance
        cx.scroll_to(2000.0);
        assert_relative_eq!(cx.scene().get(el).unwrap().pin_offset(), 600.0);
    }

    #[test]
    fn parallax_is_scrubbed() {
        let mut cx = MotionContext::default();
        let el = cx.add_element(
            ElementSpec::new("div")
                .class("bg")
                .rect(Rect::new(0.0, 1000.0, 1280.0, 400.0)),
        );
        parallax(&mut cx, ".bg", 1.0, TweenVars::new());
        // "top bottom" = 200, "bottom top" = 1400
        cx.scroll_to(800.0);
        assert_relative_eq!(
            cx.scene().get(el).unwrap().value(Prop::YPercent),
            -25.0,
            epsilon = 1e-4
        );
    }
}
