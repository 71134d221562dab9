mod common;

use std::sync::Arc;

use akira_motion_core::animations::{fade_in, horizontal_scroll, scroll_reveal, stagger_in};
use akira_motion_core::{
    catalog, create_timeline, scroll, Crossing, MotionContext, MotionEvent, MotionNode, Placement,
    Prop, Reveal, RevealOptions, StaggerGroup, TimelineVars, TriggerConfig, TriggerPatch,
    TweenVars,
};
use approx::assert_relative_eq;

use common::context_from_layout;

fn opacity(cx: &MotionContext, el: akira_motion_core::ElementId) -> f32 {
    cx.scene().get(el).unwrap().value(Prop::Opacity)
}

#[test]
fn fade_in_reaches_one_without_overshoot() {
    let mut cx = MotionContext::default();
    let el = cx.add_element(akira_motion_core::ElementSpec::new("p").class("copy"));
    fade_in(&mut cx, ".copy", TweenVars::new());
    assert_eq!(opacity(&cx, el), 0.0);

    let mut t = 0.0;
    let mut last = 0.0;
    while t < 0.6 - 1e-6 {
        let out = cx.tick(0.05);
        t += 0.05;
        let v = opacity(&cx, el);
        assert!(v <= 1.0 + 1e-6, "overshoot at {t}: {v}");
        assert!(v + 1e-6 >= last, "opacity went backwards at {t}");
        last = v;
        if let Some(changed) = out.value_of(el, Prop::Opacity) {
            assert_relative_eq!(changed, v);
        }
    }
    assert_relative_eq!(opacity(&cx, el), 1.0, epsilon = 1e-5);
    let out = cx.tick(0.0);
    assert!(out.changes.is_empty());
}

#[test]
fn stagger_in_offsets_and_total_duration() {
    let (mut cx, keys) = context_from_layout("card-grid");
    let id = stagger_in(&mut cx, ".card", TweenVars::new());
    let anim = cx.animation(id).unwrap();
    for n in 1..=6 {
        let card = keys[&format!("card-{n}")];
        assert_relative_eq!(anim.offset_of(card).unwrap(), (n - 1) as f32 * 0.1, epsilon = 1e-6);
    }
    assert_relative_eq!(anim.duration(), 0.8 + 5.0 * 0.1, epsilon = 1e-6);
}

#[test]
fn scroll_reveal_plays_once_until_leave_back() {
    let (mut cx, keys) = context_from_layout("reveal-block");
    let block = keys["block"];
    let id = scroll_reveal(&mut cx, "#reveal", RevealOptions::default());
    let started = |out: &akira_motion_core::Outputs| {
        out.has_event(|e| matches!(e, MotionEvent::AnimationStarted { animation } if *animation == id))
    };

    // from pose applied at registration, nothing plays before the line
    assert_eq!(opacity(&cx, block), 0.0);
    assert!(!started(&cx.tick(0.5)));

    cx.scroll_to(1000.0);
    assert!(started(&cx.tick(1.2)));
    assert_relative_eq!(opacity(&cx, block), 1.0);

    // leave and enter-back from below are no-ops
    cx.scroll_to(2000.0);
    cx.scroll_to(1500.0);
    cx.scroll_to(1000.0);
    let out = cx.tick(1.0);
    assert!(!started(&out));
    assert!(out.value_of(block, Prop::Opacity).is_none());

    // leave-back reverses to the hidden pose
    cx.scroll_to(0.0);
    let out = cx.tick(1.2);
    assert!(out.has_event(|e| matches!(e, MotionEvent::AnimationReversed { .. })));
    assert_relative_eq!(opacity(&cx, block), 0.0);

    // entering again replays
    cx.scroll_to(1000.0);
    let out = cx.tick(1.2);
    assert!(out.value_of(block, Prop::Opacity).is_some());
    assert_relative_eq!(opacity(&cx, block), 1.0);
}

#[test]
fn horizontal_scroll_distance_and_snap() {
    let (mut cx, keys) = context_from_layout("horizontal-gallery");
    let id = horizontal_scroll(&mut cx, "#gallery", ".panel", TriggerPatch::default());
    let trigger = cx.trigger_of(id).unwrap();
    let info = cx.trigger_info(trigger).unwrap();
    assert_relative_eq!(info.end - info.start, 3.0 * 1280.0);
    assert_relative_eq!(info.snap.unwrap(), 1.0 / 3.0);
    assert!(info.pin);

    // halfway between the first and second snap point settles on the nearer one
    cx.scroll_to(info.start + 0.4 * 1280.0);
    let settled = cx.settle_scroll().unwrap();
    assert_relative_eq!(settled, info.start, epsilon = 1e-3);
    cx.scroll_to(info.start + 1280.0 * 1.6);
    let settled = cx.settle_scroll().unwrap();
    assert_relative_eq!(settled, info.start + 2.0 * 1280.0, epsilon = 1e-2);

    // smooth scrub: progress lags the scroll, then catches up
    let panel = keys["panel-1"];
    cx.tick(0.1);
    let early = cx.scene().get(panel).unwrap().value(Prop::XPercent);
    for _ in 0..60 {
        cx.tick(0.1);
    }
    let late = cx.scene().get(panel).unwrap().value(Prop::XPercent);
    assert!(early > late);
    assert_relative_eq!(late, -200.0, epsilon = 0.5);

    // the pinned container travels with the scroll
    assert_relative_eq!(
        cx.scene().get(keys["gallery"]).unwrap().pin_offset(),
        2.0 * 1280.0,
        epsilon = 1e-2
    );
}

#[test]
fn horizontal_scroll_with_one_item_has_no_snap() {
    let mut cx = MotionContext::default();
    cx.add_element(akira_motion_core::ElementSpec::new("section").id("solo"));
    cx.add_element(akira_motion_core::ElementSpec::new("div").class("only"));
    let id = horizontal_scroll(&mut cx, "#solo", ".only", TriggerPatch::default());
    let info = cx.trigger_info(cx.trigger_of(id).unwrap()).unwrap();
    assert_eq!(info.snap, None);
    assert_eq!(info.end, info.start);
}

#[test]
fn teardown_restores_trigger_count() {
    let (mut cx, _) = context_from_layout("scroll-cards");
    cx.create_trigger(
        akira_motion_core::TriggerConfig::on(".scroll-list"),
        Default::default(),
    );
    let before = cx.active_trigger_count();

    let scope = cx.scoped("demo", |cx| {
        scroll::batch(cx, ".scroll-card", Default::default());
        scroll_reveal(cx, ".scroll-list", RevealOptions::default());
    });
    assert_eq!(cx.active_trigger_count(), before + 6);
    cx.release_scope(scope);
    assert_eq!(cx.active_trigger_count(), before);

    // leaked registrations stay observable
    scroll::batch(&mut cx, ".scroll-card", Default::default());
    assert_eq!(cx.active_trigger_count(), before + 5);
}

#[test]
fn card_grid_staggers_in_on_scroll() {
    let (mut cx, keys) = context_from_layout("card-grid");
    let cards: Vec<_> = (1..=6).map(|n| keys[&format!("card-{n}")]).collect();
    let item = Arc::new(catalog::stagger_item());
    let mut group = StaggerGroup::new(
        MotionNode::new(keys["grid"], Arc::new(catalog::stagger_container())),
        cards.iter().map(|c| MotionNode::new(*c, Arc::clone(&item))).collect(),
    );
    group.when_in_view(&mut cx, Reveal::Visible, Reveal::Hidden, true).unwrap();
    for c in &cards {
        assert_eq!(opacity(&cx, *c), 0.0);
        assert_eq!(cx.scene().get(*c).unwrap().value(Prop::Y), 50.0);
    }

    // first card's top (1000) reaches the viewport bottom at 200
    cx.scroll_to(300.0);
    let delay = 0.2;
    cx.tick(delay + 0.8);
    assert_relative_eq!(opacity(&cx, cards[0]), 1.0);
    assert_relative_eq!(cx.scene().get(cards[0]).unwrap().value(Prop::Y), 0.0);
    // card 6 starts 0.5 later and is mid-flight
    let y6 = cx.scene().get(cards[5]).unwrap().value(Prop::Y);
    assert!(y6 > 0.0 && y6 < 50.0);
    cx.tick(0.5);
    assert_relative_eq!(opacity(&cx, cards[5]), 1.0);
    assert_relative_eq!(cx.scene().get(cards[5]).unwrap().value(Prop::Y), 0.0);
}

#[test]
fn unmatched_targets_raise_nothing_and_change_nothing() {
    let (mut cx, _) = context_from_layout("card-grid");
    let before: Vec<_> = cx.scene().elements().map(|e| e.style()).collect();
    let triggers = cx.active_trigger_count();

    fade_in(&mut cx, ".missing", TweenVars::new());
    stagger_in(&mut cx, ".missing", TweenVars::new());
    scroll_reveal(&mut cx, ".missing", RevealOptions::default());
    horizontal_scroll(&mut cx, ".missing", ".also-missing", TriggerPatch::default());
    akira_motion_core::animations::parallax(&mut cx, "#nope", 2.0, TweenVars::new());
    akira_motion_core::animations::pin_element(&mut cx, "#nope", TriggerPatch::default());
    scroll::batch(&mut cx, ".missing", Default::default());
    cx.to(".ghost", TweenVars::new().prop(Prop::Opacity, 0.0));

    cx.scroll_to(1200.0);
    let out = cx.tick(1.0);
    assert!(out.changes.is_empty());
    assert!(!out.has_event(|e| matches!(e, MotionEvent::TriggerToggled { crossing: Crossing::Enter, .. })));
    assert_eq!(cx.active_trigger_count(), triggers);
    let after: Vec<_> = cx.scene().elements().map(|e| e.style()).collect();
    assert_eq!(before, after);
}

#[test]
fn unmatched_trigger_leaves_matched_targets_alone() {
    let (mut cx, _) = context_from_layout("card-grid");
    let before: Vec<_> = cx.scene().elements().map(|e| e.style()).collect();
    let triggers = cx.active_trigger_count();

    let reveal = scroll_reveal(
        &mut cx,
        ".card",
        RevealOptions {
            trigger: Some(".ghost".into()),
            ..RevealOptions::default()
        },
    );
    let gallery = horizontal_scroll(&mut cx, ".ghost-container", ".card", TriggerPatch::default());
    let timeline = create_timeline(TimelineVars {
        scroll_trigger: Some(TriggerConfig::on(".ghost")),
        ..TimelineVars::default()
    })
    .to(".card", TweenVars::new().prop(Prop::Opacity, 0.2), Placement::End)
    .build(&mut cx);

    for id in [reveal, gallery, timeline] {
        assert!(cx.animation(id).is_none());
    }
    // no scrolling: nothing may play on its own
    let out = cx.tick(2.0);
    assert!(out.changes.is_empty());
    assert!(cx.engine().is_empty());
    assert_eq!(cx.active_trigger_count(), triggers);
    let after: Vec<_> = cx.scene().elements().map(|e| e.style()).collect();
    assert_eq!(before, after);
}

#[test]
fn animation_attached_to_unmatched_trigger_is_dropped() {
    let (mut cx, keys) = context_from_layout("card-grid");
    let card = keys["card-1"];
    let id = cx.to(card, TweenVars::new().prop(Prop::Opacity, 0.0));
    assert!(cx.attach_trigger(id, TriggerConfig::on(".ghost")).is_none());
    assert!(cx.animation(id).is_none());
    cx.tick(1.0);
    assert_eq!(opacity(&cx, card), 1.0);
}
