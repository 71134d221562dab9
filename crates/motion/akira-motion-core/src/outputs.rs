//! Output contracts from the motion context.
//!
//! Outputs carry the style values written since the previous drain, keyed by
//! element and property, plus a separate list of semantic events. Host adapters
//! (wasm, the site renderer) apply changes to their documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{AnimationId, ElementId, MediaId, TriggerId};
use crate::trigger::Crossing;
use crate::value::Prop;

/// One changed style value. Only the last write per element/property survives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub element: ElementId,
    pub prop: Prop,
    pub value: f32,
}

/// Discrete semantic signals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionEvent {
    AnimationStarted {
        animation: AnimationId,
    },
    AnimationCompleted {
        animation: AnimationId,
    },
    /// Reverse playback reached the start pose.
    AnimationReversed {
        animation: AnimationId,
    },
    TriggerToggled {
        trigger: TriggerId,
        crossing: Crossing,
        scroll: f32,
    },
    MediaChanged {
        media: MediaId,
        query: String,
        matches: bool,
    },
    Warning {
        message: String,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<MotionEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Last written value for an element/property in this batch.
    pub fn value_of(&self, element: ElementId, prop: Prop) -> Option<f32> {
        self.changes
            .iter()
            .rev()
            .find(|c| c.element == element && c.prop == prop)
            .map(|c| c.value)
    }

    pub fn has_event(&self, pred: impl Fn(&MotionEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }
}

/// Write collector; coalesces repeated writes to the same channel.
#[derive(Debug, Default)]
pub(crate) struct ChangeLog {
    values: BTreeMap<(ElementId, Prop), f32>,
}

impl ChangeLog {
    #[inline]
    pub fn record(&mut self, element: ElementId, prop: Prop, value: f32) {
        self.values.insert((element, prop), value);
    }

    pub fn drain(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.values)
            .into_iter()
            .map(|((element, prop), value)| Change {
                element,
                prop,
                value,
            })
            .collect()
    }
}

/// Event collector with a cap; overflow is summarized by one warning.
#[derive(Debug)]
pub(crate) struct EventLog {
    events: Vec<MotionEvent>,
    cap: usize,
    dropped: usize,
}

impl EventLog {
    pub fn new(cap: usize) -> Self {
        Self {
            events: Vec::new(),
            cap,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: MotionEvent) {
        if self.events.len() < self.cap {
            self.events.push(event);
        } else {
            self.dropped += 1;
        }
    }

    pub fn drain(&mut self) -> Vec<MotionEvent> {
        let mut out = std::mem::take(&mut self.events);
        if self.dropped > 0 {
            log::warn!("dropped {} motion events over the per-tick cap", self.dropped);
            out.push(MotionEvent::Warning {
                message: format!("dropped {} events", self.dropped),
            });
            self.dropped = 0;
        }
        out
    }
}
