//! Engine: owned registry of running animations, time math and rendering into the scene.
//!
//! An animation is a playhead over a set of per-element tweens placed at offsets.
//! Single tweens, staggered groups and timelines all share this shape.

use crate::ids::{AnimationId, ElementId, ScopeId, TriggerId};
use crate::interp::functions::lerp_f32;
use crate::outputs::{ChangeLog, EventLog, MotionEvent};
use crate::scene::{Element, Scene};
use crate::tween::Timing;
use crate::value::{Prop, ResolvedStyle, StyleMap};

/// Residual scrub distance treated as caught up.
const SCRUB_EPSILON: f32 = 1e-4;

#[derive(Clone, Debug)]
pub(crate) struct Tween {
    pub element: ElementId,
    /// Start pose. `None` until first render for `to` tweens.
    from: Option<ResolvedStyle>,
    /// Unresolved end pose; resolved into `to` when the start pose is captured.
    target: StyleMap,
    to: ResolvedStyle,
    pub offset: f32,
    timing: Timing,
    started: bool,
}

impl Tween {
    /// Tween whose start pose is read from the element when it first renders.
    pub fn to(element: ElementId, target: StyleMap, offset: f32, timing: Timing) -> Self {
        Self {
            element,
            from: None,
            target,
            to: ResolvedStyle::new(),
            offset,
            timing,
            started: false,
        }
    }

    /// Tween with an explicit start pose, which is rendered at once.
    pub fn from_to(
        el: &mut Element,
        from: &StyleMap,
        target: StyleMap,
        offset: f32,
        timing: Timing,
        log: &mut ChangeLog,
    ) -> Self {
        let mut start = ResolvedStyle::new();
        for (prop, value) in from.iter() {
            let v = el.resolve(prop, value);
            start.insert(prop, v);
            el.write(prop, v);
            log.record(el.id, prop, v);
        }
        let mut tw = Self::to(el.id, target, offset, timing);
        tw.capture(el, Some(start));
        tw
    }

    fn capture(&mut self, el: &Element, explicit_from: Option<ResolvedStyle>) {
        let mut from = explicit_from.unwrap_or_default();
        let mut to = ResolvedStyle::new();
        for (prop, value) in self.target.iter() {
            to.insert(prop, el.resolve(prop, value));
            from.entry(prop).or_insert_with(|| el.value(prop));
        }
        // Props only in `from` end where they started.
        for (prop, v) in from.iter() {
            to.entry(*prop).or_insert(*v);
        }
        self.from = Some(from);
        self.to = to;
    }

    pub fn props(&self) -> Vec<Prop> {
        if self.from.is_some() {
            self.to.keys().copied().collect()
        } else {
            self.target.props().collect()
        }
    }

    /// Returns whether any channel was removed.
    fn strip(&mut self, props: &[Prop]) -> bool {
        let mut removed = false;
        for p in props {
            removed |= self.target.remove(*p).is_some();
            removed |= self.to.remove(p).is_some();
            if let Some(from) = self.from.as_mut() {
                from.remove(p);
            }
        }
        removed
    }

    /// Time from the tween's start to its last frame; infinite when repeating forever.
    pub fn span(&self) -> f32 {
        match self.timing.repeat.iterations() {
            Some(n) => self.timing.duration * n as f32,
            None => f32::INFINITY,
        }
    }

    pub fn end(&self) -> f32 {
        self.offset + self.span()
    }

    /// Eased progress at `local` seconds after the tween's offset.
    fn eased(&self, local: f32) -> f32 {
        let t = &self.timing;
        if t.duration <= 0.0 {
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        if local <= 0.0 {
            return 0.0;
        }
        let (iteration, frac) = match t.repeat.iterations() {
            Some(n) if local >= t.duration * n as f32 => (n - 1, 1.0),
            _ => {
                let it = (local / t.duration).floor();
                (it as u32, (local - it * t.duration) / t.duration)
            }
        };
        let frac = if t.yoyo && iteration % 2 == 1 {
            1.0 - frac
        } else {
            frac
        };
        t.ease.apply(frac)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct ScrubState {
    /// Seconds to catch up with the scroll position; 0 follows it exactly.
    pub lag: f32,
    pub target: f32,
}

/// A playhead over tweens.
#[derive(Clone, Debug)]
pub struct Animation {
    pub id: AnimationId,
    pub label: String,
    pub scope: ScopeId,
    tweens: Vec<Tween>,
    time: f32,
    reversed: bool,
    paused: bool,
    started_emitted: bool,
    /// Some channel was taken over by a newer write.
    overwritten: bool,
    pub(crate) trigger: Option<TriggerId>,
    pub(crate) scrub: Option<ScrubState>,
}

impl Animation {
    pub(crate) fn new(
        id: AnimationId,
        label: impl Into<String>,
        scope: ScopeId,
        tweens: Vec<Tween>,
        paused: bool,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            scope,
            tweens,
            time: 0.0,
            reversed: false,
            paused,
            started_emitted: false,
            overwritten: false,
            trigger: None,
            scrub: None,
        }
    }

    /// Seconds from the playhead's start to its end.
    pub fn duration(&self) -> f32 {
        self.tweens.iter().map(Tween::end).fold(0.0, f32::max)
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn progress(&self) -> f32 {
        let d = self.duration();
        if d == 0.0 {
            if self.started_emitted {
                1.0
            } else {
                0.0
            }
        } else if d.is_finite() {
            (self.time / d).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Playing and not yet at the end it is heading towards.
    pub fn is_active(&self) -> bool {
        if self.paused || self.scrub.is_some() {
            return false;
        }
        if self.reversed {
            self.time > 0.0
        } else {
            self.time < self.duration()
        }
    }

    /// Played out and free of scroll control: nothing will move its playhead
    /// unless asked through its handle.
    fn is_settled(&self) -> bool {
        !self.paused && self.trigger.is_none() && self.scrub.is_none() && !self.is_active()
    }

    /// Every channel has been taken over by newer writes and no tween is still
    /// waiting to start.
    fn is_spent(&self) -> bool {
        self.overwritten
            && self.trigger.is_none()
            && self.scrub.is_none()
            && self.tweens.iter().all(|t| t.started && t.props().is_empty())
    }

    /// Elements this animation writes, in tween order.
    pub fn targets(&self) -> Vec<ElementId> {
        let mut out: Vec<ElementId> = Vec::new();
        for tw in &self.tweens {
            if !out.contains(&tw.element) {
                out.push(tw.element);
            }
        }
        out
    }

    /// Start offset of the first tween on `element`.
    pub fn offset_of(&self, element: ElementId) -> Option<f32> {
        self.tweens
            .iter()
            .find(|t| t.element == element)
            .map(|t| t.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Write the pose at the current playhead. Returns the channels of tweens
    /// that rendered for the first time.
    fn render(&mut self, scene: &mut Scene, log: &mut ChangeLog) -> Vec<(ElementId, Vec<Prop>)> {
        let time = self.time;
        let mut first_renders = Vec::new();
        for tw in &mut self.tweens {
            let local = time - tw.offset;
            if local < 0.0 && !tw.started {
                continue;
            }
            let Some(el) = scene.get_mut(tw.element) else {
                continue;
            };
            if !tw.started {
                if tw.from.is_none() {
                    tw.capture(el, None);
                }
                tw.started = true;
                first_renders.push((tw.element, tw.props()));
            }
            let p = tw.eased(local);
            let Some(from) = tw.from.as_ref() else {
                continue;
            };
            for (prop, to) in &tw.to {
                let start = from.get(prop).copied().unwrap_or(*to);
                let v = lerp_f32(start, *to, p);
                el.write(*prop, v);
                log.record(el.id, *prop, v);
            }
        }
        first_renders
    }

    /// Drop channels from tweens on `element` that have already rendered.
    fn strip(&mut self, element: ElementId, props: &[Prop]) {
        for tw in self
            .tweens
            .iter_mut()
            .filter(|t| t.element == element && t.started)
        {
            self.overwritten |= tw.strip(props);
        }
    }
}

/// Animation registry. Iteration order is creation order, so on a shared channel
/// the newest animation's write lands last.
#[derive(Debug, Default)]
pub struct Engine {
    animations: Vec<Animation>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn get(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.iter().find(|a| a.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: AnimationId) -> Option<&mut Animation> {
        self.animations.iter_mut().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.animations.iter()
    }

    fn index_of(&self, id: AnimationId) -> Option<usize> {
        self.animations.iter().position(|a| a.id == id)
    }

    pub(crate) fn insert(&mut self, anim: Animation) -> AnimationId {
        let id = anim.id;
        self.animations.push(anim);
        id
    }

    /// Remove the listed channels of `element` from every playing or settled
    /// animation but `except`. Tweens that have not rendered yet keep them and
    /// take over when they start.
    pub(crate) fn overwrite(&mut self, element: ElementId, props: &[Prop], except: Option<AnimationId>) {
        for anim in self
            .animations
            .iter_mut()
            .filter(|a| Some(a.id) != except && (a.is_active() || a.is_settled()))
        {
            anim.strip(element, props);
        }
    }

    /// Drop animations with nothing left to write. Returns how many went.
    pub(crate) fn reap(&mut self) -> usize {
        let before = self.animations.len();
        self.animations.retain(|a| !a.is_spent());
        before - self.animations.len()
    }

    fn render_at(&mut self, idx: usize, scene: &mut Scene, log: &mut ChangeLog) {
        let first = self.animations[idx].render(scene, log);
        let id = self.animations[idx].id;
        for (element, props) in first {
            self.overwrite(element, &props, Some(id));
        }
    }

    pub(crate) fn render(&mut self, id: AnimationId, scene: &mut Scene, log: &mut ChangeLog) {
        if let Some(idx) = self.index_of(id) {
            self.render_at(idx, scene, log);
        }
    }

    /// Advance every playing animation by `dt` seconds of wall-clock time.
    pub(crate) fn advance(&mut self, dt: f32, scene: &mut Scene, log: &mut ChangeLog, events: &mut EventLog) {
        let dt = dt.max(0.0);
        for idx in 0..self.animations.len() {
            let anim = &mut self.animations[idx];
            let duration = anim.duration();

            if let Some(scrub) = anim.scrub {
                if scrub.lag <= 0.0 || !duration.is_finite() {
                    continue;
                }
                let current = anim.progress();
                if (current - scrub.target).abs() <= SCRUB_EPSILON {
                    continue;
                }
                let step = (dt / scrub.lag).min(1.0);
                let mut next = current + (scrub.target - current) * step;
                if (next - scrub.target).abs() <= SCRUB_EPSILON {
                    next = scrub.target;
                }
                anim.time = next * duration;
                self.render_at(idx, scene, log);
                continue;
            }

            if anim.paused || anim.tweens.is_empty() {
                continue;
            }
            let id = anim.id;
            if anim.reversed {
                if anim.time <= 0.0 {
                    continue;
                }
                anim.time = (anim.time - dt).max(0.0);
                let done = anim.time <= 0.0;
                self.render_at(idx, scene, log);
                if done {
                    events.push(MotionEvent::AnimationReversed { animation: id });
                }
            } else {
                if anim.time >= duration && anim.started_emitted {
                    continue;
                }
                if !anim.started_emitted {
                    anim.started_emitted = true;
                    events.push(MotionEvent::AnimationStarted { animation: id });
                }
                anim.time = (anim.time + dt).min(duration);
                let done = anim.time >= duration;
                self.render_at(idx, scene, log);
                if done {
                    events.push(MotionEvent::AnimationCompleted { animation: id });
                }
            }
        }
        let reaped = self.reap();
        if reaped > 0 {
            log::trace!("dropped {reaped} overwritten animations");
        }
    }

    pub(crate) fn play(&mut self, id: AnimationId) {
        if let Some(a) = self.get_mut(id) {
            a.reversed = false;
            a.paused = false;
        }
    }

    pub(crate) fn pause(&mut self, id: AnimationId) {
        if let Some(a) = self.get_mut(id) {
            a.paused = true;
        }
    }

    pub(crate) fn resume(&mut self, id: AnimationId) {
        if let Some(a) = self.get_mut(id) {
            a.paused = false;
        }
    }

    pub(crate) fn reverse(&mut self, id: AnimationId) {
        if let Some(a) = self.get_mut(id) {
            a.reversed = true;
            a.paused = false;
        }
    }

    pub(crate) fn restart(&mut self, id: AnimationId, scene: &mut Scene, log: &mut ChangeLog) {
        if let Some(a) = self.get_mut(id) {
            a.time = 0.0;
            a.reversed = false;
            a.paused = false;
            a.started_emitted = false;
        }
        self.render(id, scene, log);
    }

    pub(crate) fn reset(&mut self, id: AnimationId, scene: &mut Scene, log: &mut ChangeLog) {
        if let Some(a) = self.get_mut(id) {
            a.time = 0.0;
            a.reversed = false;
            a.paused = true;
            a.started_emitted = false;
        }
        self.render(id, scene, log);
    }

    pub(crate) fn complete(
        &mut self,
        id: AnimationId,
        scene: &mut Scene,
        log: &mut ChangeLog,
        events: &mut EventLog,
    ) {
        let Some(a) = self.get_mut(id) else {
            return;
        };
        let d = a.duration();
        if !d.is_finite() {
            return;
        }
        a.time = d;
        a.reversed = false;
        a.started_emitted = true;
        self.render(id, scene, log);
        events.push(MotionEvent::AnimationCompleted { animation: id });
    }

    /// Jump to a progress in [0,1] and render it.
    pub(crate) fn seek_progress(&mut self, id: AnimationId, progress: f32, scene: &mut Scene, log: &mut ChangeLog) {
        let Some(a) = self.get_mut(id) else {
            return;
        };
        let d = a.duration();
        if !d.is_finite() {
            return;
        }
        a.time = progress.clamp(0.0, 1.0) * d;
        if a.time > 0.0 {
            a.started_emitted = true;
        }
        self.render(id, scene, log);
    }

    /// Remove an animation and hand it back.
    pub(crate) fn kill(&mut self, id: AnimationId) -> Option<Animation> {
        let idx = self.index_of(id)?;
        Some(self.animations.remove(idx))
    }

    /// Remove every animation registered in one of `scopes`. Returns their triggers.
    pub(crate) fn kill_scopes(&mut self, scopes: &[ScopeId]) -> (usize, Vec<TriggerId>) {
        let mut triggers = Vec::new();
        let before = self.animations.len();
        self.animations.retain(|a| {
            if scopes.contains(&a.scope) {
                triggers.extend(a.trigger);
                false
            } else {
                true
            }
        });
        (before - self.animations.len(), triggers)
    }

    /// Drop every tween on `element`; animations left empty are removed.
    pub(crate) fn kill_tweens_of(&mut self, element: ElementId) -> Vec<TriggerId> {
        let mut triggers = Vec::new();
        for anim in &mut self.animations {
            anim.tweens.retain(|t| t.element != element);
        }
        self.animations.retain(|a| {
            if a.tweens.is_empty() {
                triggers.extend(a.trigger);
                false
            } else {
                true
            }
        });
        triggers
    }
}
