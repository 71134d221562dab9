mod common;

use std::cell::RefCell;
use std::rc::Rc;

use akira_motion_core::animations::scroll_reveal;
use akira_motion_core::scroll::{batch, BatchConfig};
use akira_motion_core::{Crossing, RevealOptions, TriggerCallbacks};
use akira_test_fixtures::scroll_scripts;

use common::{context_from_layout, crossing_kinds, sort_kinds, ScrollScript};

fn script(name: &str) -> (ScrollScript, String) {
    let script: ScrollScript = scroll_scripts::load(name).expect("script fixture");
    let layout = scroll_scripts::layout(name)
        .expect("manifest entry")
        .expect("script names a layout");
    (script, layout)
}

#[test]
fn reveal_round_trip_follows_script() {
    let (script, layout) = script("reveal-round-trip");
    let (mut cx, _) = context_from_layout(&layout);
    scroll_reveal(&mut cx, script.target.as_str(), RevealOptions::default());
    cx.flush();

    for (i, step) in script.steps.iter().enumerate() {
        cx.scroll_to(step.scroll);
        let mut expect = step.expect.clone();
        sort_kinds(&mut expect);
        assert_eq!(crossing_kinds(&cx.flush()), expect, "step {i} at {}", step.scroll);
        if let Some(dt) = step.tick {
            cx.tick(dt);
        }
    }
}

fn recorder(log: &Rc<RefCell<Vec<Crossing>>>) -> TriggerCallbacks {
    let on = |kind: Crossing| {
        let log = Rc::clone(log);
        move |_: &mut akira_motion_core::MotionContext, els: &[akira_motion_core::ElementId]| {
            assert!(!els.is_empty());
            log.borrow_mut().push(kind);
        }
    };
    TriggerCallbacks::new()
        .on_enter(on(Crossing::Enter))
        .on_leave(on(Crossing::Leave))
        .on_enter_back(on(Crossing::EnterBack))
        .on_leave_back(on(Crossing::LeaveBack))
}

#[test]
fn batch_sweep_coalesces_per_kind() {
    let (script, layout) = script("batch-sweep");
    let (mut cx, _) = context_from_layout(&layout);
    let log = Rc::new(RefCell::new(Vec::new()));
    batch(
        &mut cx,
        script.target.as_str(),
        BatchConfig::new().callbacks(recorder(&log)),
    )
    .unwrap();
    cx.flush();

    for (i, step) in script.steps.iter().enumerate() {
        log.borrow_mut().clear();
        cx.scroll_to(step.scroll);
        let mut expect = step.expect.clone();
        sort_kinds(&mut expect);
        assert_eq!(crossing_kinds(&cx.flush()), expect, "events at step {i}");

        // one callback per kind per scroll update
        let calls = log.borrow().clone();
        let mut kinds = calls.clone();
        sort_kinds(&mut kinds);
        assert_eq!(kinds, expect, "callbacks at step {i}");
        assert_eq!(calls.len(), kinds.len(), "callbacks at step {i} were not coalesced");
        if let Some(dt) = step.tick {
            cx.tick(dt);
        }
    }
}
