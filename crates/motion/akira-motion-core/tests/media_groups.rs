mod common;

use akira_motion_core::animations::{horizontal_scroll, stagger_in};
use akira_motion_core::{MediaSetup, MotionEvent, TriggerPatch, TweenVars};

use common::context_from_layout;

fn layouts() -> Vec<(&'static str, MediaSetup)> {
    vec![
        (
            "(min-width: 800px)",
            Box::new(|cx| {
                horizontal_scroll(cx, "#gallery", ".panel", TriggerPatch::default());
            }),
        ),
        (
            "(max-width: 799px)",
            Box::new(|cx| {
                stagger_in(cx, ".panel", TweenVars::new());
            }),
        ),
    ]
}

#[test]
fn resize_swaps_setups() {
    let (mut cx, _) = context_from_layout("horizontal-gallery");
    let media = cx.match_media(layouts());
    assert!(cx.media_matches(media));
    assert_eq!(cx.active_trigger_count(), 1);
    cx.flush();

    cx.resize(390.0, 844.0);
    // the desktop trigger went with its scope; the mobile setup adds none
    assert_eq!(cx.active_trigger_count(), 0);
    let out = cx.flush();
    let changed: Vec<_> = out
        .events
        .iter()
        .filter_map(|e| match e {
            MotionEvent::MediaChanged { query, matches, .. } => Some((query.clone(), *matches)),
            _ => None,
        })
        .collect();
    assert!(changed.contains(&("(min-width: 800px)".to_string(), false)));
    assert!(changed.contains(&("(max-width: 799px)".to_string(), true)));

    cx.resize(1280.0, 800.0);
    assert_eq!(cx.active_trigger_count(), 1);
}

#[test]
fn killed_group_releases_its_registrations() {
    let (mut cx, _) = context_from_layout("horizontal-gallery");
    let media = cx.match_media(layouts());
    cx.kill_media(media);
    assert_eq!(cx.active_trigger_count(), 0);
    assert!(!cx.media_matches(media));

    // resizing afterwards no longer runs either setup
    cx.resize(390.0, 844.0);
    cx.resize(1280.0, 800.0);
    assert_eq!(cx.active_trigger_count(), 0);
}

#[test]
fn group_registered_in_scope_dies_with_it() {
    let (mut cx, _) = context_from_layout("horizontal-gallery");
    let scope = cx.scoped("gallery", |cx| {
        cx.match_media(layouts());
    });
    assert_eq!(cx.active_trigger_count(), 1);
    cx.release_scope(scope);
    assert_eq!(cx.active_trigger_count(), 0);
    cx.resize(390.0, 844.0);
    cx.resize(1280.0, 800.0);
    assert_eq!(cx.active_trigger_count(), 0);
}
