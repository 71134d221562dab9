//! Timelines: tweens placed on one playhead.

use serde::{Deserialize, Serialize};

use crate::context::MotionContext;
use crate::engine::{Animation, Tween};
use crate::ids::AnimationId;
use crate::scene::Target;
use crate::trigger::TriggerConfig;
use crate::tween::TweenVars;
use crate::value::StyleMap;

/// Where a step starts relative to the timeline built so far.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// After everything placed so far.
    #[default]
    End,
    /// Offset from the current end; negative values overlap.
    Relative(f32),
    /// Absolute time from the timeline start.
    At(f32),
}

impl Placement {
    fn resolve(self, end: f32) -> f32 {
        match self {
            Placement::End => end,
            Placement::Relative(d) => (end + d).max(0.0),
            Placement::At(t) => t.max(0.0),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineVars {
    /// Settings every step inherits unless it sets its own.
    pub defaults: TweenVars,
    pub paused: bool,
    pub scroll_trigger: Option<TriggerConfig>,
}

#[derive(Clone, Debug)]
struct Step {
    target: Target,
    from: Option<StyleMap>,
    vars: TweenVars,
    placement: Placement,
}

/// Steps collected before anything touches the scene. `build` resolves targets,
/// applies `from` poses and registers the animation.
#[derive(Clone, Debug, Default)]
pub struct TimelineBuilder {
    vars: TimelineVars,
    label: String,
    steps: Vec<Step>,
}

impl TimelineBuilder {
    pub fn new(vars: TimelineVars) -> Self {
        Self {
            vars,
            label: "timeline".into(),
            steps: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn to(mut self, target: impl Into<Target>, vars: TweenVars, at: Placement) -> Self {
        self.steps.push(Step {
            target: target.into(),
            from: None,
            vars,
            placement: at,
        });
        self
    }

    pub fn from_to(mut self, target: impl Into<Target>, from: StyleMap, vars: TweenVars, at: Placement) -> Self {
        self.steps.push(Step {
            target: target.into(),
            from: Some(from),
            vars,
            placement: at,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Register the timeline. Steps whose targets match nothing are skipped; a
    /// timeline left without tweens, or whose scroll trigger matches nothing, is
    /// an empty handle.
    pub fn build(self, cx: &mut MotionContext) -> AnimationId {
        let id = cx.ids.alloc_animation();
        if self
            .vars
            .scroll_trigger
            .as_ref()
            .is_some_and(|cfg| cx.trigger_unmatched(cfg))
        {
            return id;
        }
        let mut tweens: Vec<Tween> = Vec::new();
        let mut end = 0.0f32;
        for step in self.steps {
            let targets = cx.resolve(&step.target);
            if targets.is_empty() {
                continue;
            }
            let vars = step.vars.merged_over(self.vars.defaults.clone());
            let start = step.placement.resolve(end);
            let placed = cx.build_tweens(&targets, step.from.as_ref(), &vars.style, start, vars.timing());
            end = placed.iter().map(Tween::end).fold(end, f32::max);
            tweens.extend(placed);
        }
        if tweens.is_empty() {
            return id;
        }
        let scope = cx.scopes.current();
        cx.engine
            .insert(Animation::new(id, self.label, scope, tweens, self.vars.paused));
        if let Some(cfg) = self.vars.scroll_trigger {
            cx.attach_trigger(id, cfg);
        }
        id
    }
}

/// Start a timeline.
pub fn create_timeline(vars: TimelineVars) -> TimelineBuilder {
    TimelineBuilder::new(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Ease;
    use crate::scene::ElementSpec;
    use crate::value::Prop;

    #[test]
    fn placements_chain_and_overlap() {
        let mut cx = MotionContext::default();
        cx.add_element(ElementSpec::new("h1"));
        cx.add_element(ElementSpec::new("p"));
        let defaults = TweenVars::new().duration(1.0).ease(Ease::Linear);
        let id = create_timeline(TimelineVars {
            defaults,
            ..TimelineVars::default()
        })
        .to("h1", TweenVars::new().prop(Prop::Opacity, 1.0), Placement::End)
        .to("p", TweenVars::new().prop(Prop::Y, 0.0), Placement::Relative(-0.5))
        .to("p", TweenVars::new().prop(Prop::X, 5.0), Placement::At(3.0))
        .build(&mut cx);

        let anim = cx.animation(id).unwrap();
        assert_eq!(anim.duration(), 4.0);
        let p = cx.resolve(&"p".into())[0];
        assert_eq!(anim.offset_of(p), Some(0.5));
    }

    #[test]
    fn unmatched_steps_are_skipped() {
        let mut cx = MotionContext::default();
        let id = create_timeline(TimelineVars::default())
            .to(".nothing", TweenVars::new().prop(Prop::Opacity, 0.0), Placement::End)
            .build(&mut cx);
        assert!(cx.animation(id).is_none());
    }
}
