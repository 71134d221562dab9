//! Trigger registry helpers: `batch`, `refresh` and `kill_all`.

use crate::animations::stagger_in;
use crate::context::MotionContext;
use crate::ids::{BatchId, TriggerId};
use crate::scene::Target;
use crate::trigger::{ScrollEnd, ScrollPosition, TriggerCallbacks, TriggerConfig, DEFAULT_START};
use crate::tween::TweenVars;
use crate::value::{Prop, StyleMap};

/// One trigger per matched element; crossings of the same kind from one scroll
/// update reach the callback together.
#[derive(Debug)]
pub struct BatchConfig {
    pub start: ScrollPosition,
    pub end: Option<ScrollEnd>,
    /// Split each coalesced group into chunks of at most this many elements.
    pub batch_max: Option<usize>,
    pub once: bool,
    /// Slots left empty fall back to the default entrance/exit poses.
    pub callbacks: TriggerCallbacks,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: None,
            batch_max: None,
            once: false,
            callbacks: TriggerCallbacks::new(),
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: ScrollPosition) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: ScrollEnd) -> Self {
        self.end = Some(end);
        self
    }

    pub fn batch_max(mut self, max: usize) -> Self {
        self.batch_max = Some(max);
        self
    }

    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn callbacks(mut self, callbacks: TriggerCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }
}

/// Entrance on (re-)entry, parked above or below the viewport on exit.
pub fn default_batch_callbacks(stagger: f32) -> TriggerCallbacks {
    TriggerCallbacks::new()
        .on_enter(move |cx, els| {
            stagger_in(cx, els, TweenVars::new().stagger(stagger));
        })
        .on_enter_back(move |cx, els| {
            stagger_in(cx, els, TweenVars::new().stagger(stagger));
        })
        .on_leave(|cx, els| {
            cx.set(els, StyleMap::new().with(Prop::Opacity, 0.0).with(Prop::Y, -100.0));
        })
        .on_leave_back(|cx, els| {
            cx.set(els, StyleMap::new().with(Prop::Opacity, 0.0).with(Prop::Y, 100.0));
        })
}

/// Register a batch over every element `target` matches. `None` when nothing matches.
pub fn batch(cx: &mut MotionContext, target: impl Into<Target>, config: BatchConfig) -> Option<BatchId> {
    let elements = cx.resolve(&target.into());
    if elements.is_empty() {
        return None;
    }
    let defaults = default_batch_callbacks(cx.config().batch_stagger);
    let callbacks = config.callbacks.merged_over(defaults);
    let batch = cx.insert_batch(config.batch_max, callbacks);
    let ids: Vec<TriggerId> = elements
        .into_iter()
        .map(|el| {
            let cfg = TriggerConfig {
                trigger: Some(Target::Element(el)),
                start: config.start,
                end: config.end,
                once: config.once,
                ..TriggerConfig::default()
            };
            cx.register_trigger(el, cfg, None, Some(batch), TriggerCallbacks::new())
        })
        .collect();
    cx.update_triggers(Some(&ids));
    Some(batch)
}

/// Re-measure every trigger against the current layout.
pub fn refresh(cx: &mut MotionContext) {
    cx.refresh();
}

/// Kill every live trigger. Returns how many there were.
pub fn kill_all(cx: &mut MotionContext) -> usize {
    cx.kill_all_triggers()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ElementSpec, Rect};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn one_scroll_update_is_one_callback() {
        let mut cx = MotionContext::default();
        let cards: Vec<_> = (0..3)
            .map(|i| {
                cx.add_element(
                    ElementSpec::new("div")
                        .class("scroll-card")
                        .rect(Rect::new(0.0, 1000.0 + i as f32 * 150.0, 300.0, 100.0)),
                )
            })
            .collect();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        batch(
            &mut cx,
            ".scroll-card",
            BatchConfig::new().callbacks(
                TriggerCallbacks::new().on_enter(move |_, els| sink.borrow_mut().push(els.to_vec())),
            ),
        )
        .unwrap();
        assert!(calls.borrow().is_empty());

        cx.scroll_to(1000.0);
        assert_eq!(*calls.borrow(), vec![cards.clone()]);
    }

    #[test]
    fn batch_max_chunks_groups() {
        let mut cx = MotionContext::default();
        for _ in 0..5 {
            cx.add_element(ElementSpec::new("li").rect(Rect::new(0.0, 100.0, 10.0, 10.0)));
        }
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&sizes);
        batch(
            &mut cx,
            "li",
            BatchConfig::new()
                .batch_max(2)
                .callbacks(TriggerCallbacks::new().on_enter(move |_, els| sink.borrow_mut().push(els.len()))),
        );
        assert_eq!(*sizes.borrow(), vec![2, 2, 1]);
    }

    #[test]
    fn default_leave_parks_elements() {
        let mut cx = MotionContext::default();
        let el = cx.add_element(ElementSpec::new("li").rect(Rect::new(0.0, 1000.0, 10.0, 100.0)));
        batch(&mut cx, "li", BatchConfig::new()).unwrap();
        cx.scroll_to(900.0);
        cx.tick(2.0);
        cx.scroll_to(1200.0);
        let e = cx.scene().get(el).unwrap();
        assert_eq!(e.value(Prop::Opacity), 0.0);
        assert_eq!(e.value(Prop::Y), -100.0);
    }

    #[test]
    fn unmatched_batch_is_none() {
        let mut cx = MotionContext::default();
        assert!(batch(&mut cx, ".nope", BatchConfig::new()).is_none());
        assert_eq!(kill_all(&mut cx), 0);
    }
}
