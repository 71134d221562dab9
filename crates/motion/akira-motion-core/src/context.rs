//! `MotionContext`: the owned registry behind every animation operation.
//!
//! A context holds the scene, the running animations, the trigger registry, media
//! groups and the registration scopes. Hosts feed it scroll, resize and frame
//! time and drain `Outputs` from `tick`. Independent contexts never interact.

use crate::config::Config;
use crate::engine::{Animation, Engine, ScrubState, Tween};
use crate::ids::{AnimationId, BatchId, ElementId, IdAllocator, ScopeId, TriggerId};
use crate::media::MediaEntry;
use crate::outputs::{ChangeLog, EventLog, MotionEvent, Outputs};
use crate::scene::{ElementSpec, Scene, Target};
use crate::scope::ScopeTable;
use crate::trigger::{
    BatchEntry, Crossing, Fired, ToggleAction, TriggerCallback, TriggerCallbacks, TriggerConfig,
    TriggerEntry, TriggerInfo, TriggerRegistry, Zone,
};
use crate::tween::{Timing, TweenVars};
use crate::value::StyleMap;

/// Who owns a callback slot.
#[derive(Copy, Clone, Debug)]
enum CallbackOwner {
    Trigger(TriggerId),
    Batch(BatchId),
}

pub struct MotionContext {
    pub(crate) cfg: Config,
    pub(crate) ids: IdAllocator,
    pub(crate) scene: Scene,
    pub(crate) engine: Engine,
    pub(crate) triggers: TriggerRegistry,
    pub(crate) media: Vec<MediaEntry>,
    pub(crate) scopes: ScopeTable,
    pub(crate) changes: ChangeLog,
    pub(crate) events: EventLog,
}

impl Default for MotionContext {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl std::fmt::Debug for MotionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionContext")
            .field("elements", &self.scene.len())
            .field("animations", &self.engine.len())
            .field("triggers", &self.triggers.active_count())
            .field("media", &self.media.len())
            .finish()
    }
}

impl MotionContext {
    pub fn new(cfg: Config) -> Self {
        let scene = Scene::new(cfg.viewport_width, cfg.viewport_height);
        let events = EventLog::new(cfg.max_events_per_tick);
        Self {
            cfg,
            ids: IdAllocator::new(),
            scene,
            engine: Engine::new(),
            triggers: TriggerRegistry::new(),
            media: Vec::new(),
            scopes: ScopeTable::new(),
            changes: ChangeLog::default(),
            events,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Layout edits. Call `refresh` afterwards so triggers re-measure.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    // --- host input ---------------------------------------------------------

    pub fn add_element(&mut self, spec: ElementSpec) -> ElementId {
        self.scene.insert(spec)
    }

    /// Remove an element subtree along with the tweens and triggers bound to it.
    pub fn remove_element(&mut self, id: ElementId) -> usize {
        let before: Vec<ElementId> = self.scene.elements().map(|e| e.id).collect();
        let removed = self.scene.remove(id);
        let gone: Vec<ElementId> = before
            .into_iter()
            .filter(|e| !self.scene.contains(*e))
            .collect();
        for gone in gone {
            self.engine.kill_tweens_of(gone);
            let dead: Vec<TriggerId> = self
                .triggers
                .entries
                .iter()
                .filter(|t| t.element == gone)
                .map(|t| t.id)
                .collect();
            for t in dead {
                self.kill_trigger(t);
            }
        }
        removed
    }

    /// Move the viewport and evaluate every trigger.
    pub fn scroll_to(&mut self, y: f32) {
        self.scene.set_scroll(y);
        self.update_triggers(None);
    }

    /// Resize the viewport, re-evaluate media groups and re-measure triggers.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.scene.set_size(width, height);
        self.evaluate_media();
        self.refresh();
    }

    /// Re-measure every trigger from the current layout.
    pub fn refresh(&mut self) {
        self.triggers.refresh(&self.scene);
        self.update_triggers(None);
    }

    /// Scroll to the nearest snap point of the active snapping trigger, if any.
    pub fn settle_scroll(&mut self) -> Option<f32> {
        let target = self.triggers.snap_target(self.scene.viewport().scroll_y)?;
        self.scroll_to(target);
        Some(target)
    }

    /// Advance time by `dt` seconds and drain everything written since the last drain.
    pub fn tick(&mut self, dt: f32) -> Outputs {
        self.engine
            .advance(dt, &mut self.scene, &mut self.changes, &mut self.events);
        self.flush()
    }

    /// Drain pending changes and events without advancing time.
    pub fn flush(&mut self) -> Outputs {
        Outputs {
            changes: self.changes.drain(),
            events: self.events.drain(),
        }
    }

    /// Report a host-side problem through the next `Outputs`.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.events.push(MotionEvent::Warning { message });
    }

    // --- scopes -------------------------------------------------------------

    pub fn current_scope(&self) -> ScopeId {
        self.scopes.current()
    }

    /// Open a child of the current scope; later registrations belong to it.
    pub fn begin_scope(&mut self, label: impl Into<String>) -> ScopeId {
        let id = self.ids.alloc_scope();
        self.scopes.open(id, label);
        id
    }

    pub fn end_scope(&mut self, id: ScopeId) {
        self.scopes.close(id);
    }

    /// Make a live scope current again until the matching `end_scope`.
    /// Returns false for a released or unknown scope.
    pub fn enter_scope(&mut self, id: ScopeId) -> bool {
        if !self.scopes.contains(id) {
            return false;
        }
        self.scopes.enter(id);
        true
    }

    /// Run `f` inside a fresh scope and return it, closed but not released.
    pub fn scoped(&mut self, label: impl Into<String>, f: impl FnOnce(&mut Self)) -> ScopeId {
        let id = self.begin_scope(label);
        f(self);
        self.end_scope(id);
        id
    }

    /// Kill every animation, trigger, batch and media group registered in `id`
    /// or its descendants. Returns how many registrations went away.
    pub fn release_scope(&mut self, id: ScopeId) -> usize {
        let label = self.scopes.label(id).unwrap_or_default().to_string();
        let released = self.scopes.release(id);
        if released.is_empty() {
            return 0;
        }
        let (animations, _) = self.engine.kill_scopes(&released);
        let triggers = self.triggers.remove_scopes(&released);
        for entry in &triggers {
            self.detach(entry);
        }
        let media_before = self.media.len();
        self.media.retain(|m| !released.contains(&m.scope));
        let media = media_before - self.media.len();
        log::debug!(
            "released scope {:?} ({label}): {animations} animations, {} triggers, {media} media groups",
            id,
            triggers.len()
        );
        animations + triggers.len() + media
    }

    // --- primitives ---------------------------------------------------------

    /// Resolve a target to live elements in document order.
    pub fn resolve(&self, target: &Target) -> Vec<ElementId> {
        let found = self.scene.query(target);
        if found.is_empty() {
            log::debug!("target {:?} matched nothing", target);
        }
        found
    }

    /// Tween from the current pose to `vars.style`.
    pub fn to(&mut self, target: impl Into<Target>, vars: TweenVars) -> AnimationId {
        self.spawn("to", &target.into(), None, vars)
    }

    /// Tween from `from` to `vars.style`; the `from` pose is applied immediately.
    pub fn from_to(&mut self, target: impl Into<Target>, from: StyleMap, vars: TweenVars) -> AnimationId {
        self.spawn("fromTo", &target.into(), Some(&from), vars)
    }

    /// Apply a pose at once. Running tweens stop animating the same properties.
    pub fn set(&mut self, target: impl Into<Target>, style: StyleMap) {
        let props: Vec<_> = style.props().collect();
        for id in self.resolve(&target.into()) {
            if let Some(el) = self.scene.get_mut(id) {
                for (prop, value) in style.iter() {
                    let v = el.resolve(prop, value);
                    el.write(prop, v);
                    self.changes.record(id, prop, v);
                }
            }
            self.engine.overwrite(id, &props, None);
        }
    }

    /// Drop every tween animating the target's elements.
    pub fn kill_tweens_of(&mut self, target: impl Into<Target>) {
        for id in self.resolve(&target.into()) {
            for trigger in self.engine.kill_tweens_of(id) {
                if let Some(entry) = self.triggers.get_mut(trigger) {
                    entry.animation = None;
                }
            }
        }
    }

    pub(crate) fn spawn(
        &mut self,
        label: &str,
        target: &Target,
        from: Option<&StyleMap>,
        vars: TweenVars,
    ) -> AnimationId {
        let id = self.ids.alloc_animation();
        let targets = self.resolve(target);
        if targets.is_empty() {
            return id;
        }
        let timing = vars.timing();
        let tweens = self.build_tweens(&targets, from, &vars.style, 0.0, timing);
        let scope = self.scopes.current();
        let paused = vars.paused.unwrap_or(false);
        self.engine
            .insert(Animation::new(id, label, scope, tweens, paused));
        id
    }

    /// One tween per target, target `i` offset by `i × stagger`.
    pub(crate) fn build_tweens(
        &mut self,
        targets: &[ElementId],
        from: Option<&StyleMap>,
        style: &StyleMap,
        base: f32,
        timing: Timing,
    ) -> Vec<Tween> {
        let mut out = Vec::with_capacity(targets.len());
        for (i, id) in targets.iter().enumerate() {
            let offset = (base + timing.delay + i as f32 * timing.stagger).max(0.0);
            let Some(el) = self.scene.get_mut(*id) else {
                continue;
            };
            let tween = match from {
                Some(from) => Tween::from_to(el, from, style.clone(), offset, timing, &mut self.changes),
                None => Tween::to(*id, style.clone(), offset, timing),
            };
            out.push(tween);
        }
        out
    }

    // --- animation controls -------------------------------------------------

    pub fn animation(&self, id: AnimationId) -> Option<&Animation> {
        self.engine.get(id)
    }

    pub fn play(&mut self, id: AnimationId) {
        self.engine.play(id);
    }

    pub fn pause(&mut self, id: AnimationId) {
        self.engine.pause(id);
    }

    pub fn resume(&mut self, id: AnimationId) {
        self.engine.resume(id);
    }

    pub fn reverse(&mut self, id: AnimationId) {
        self.engine.reverse(id);
    }

    pub fn restart(&mut self, id: AnimationId) {
        self.engine.restart(id, &mut self.scene, &mut self.changes);
    }

    pub fn reset(&mut self, id: AnimationId) {
        self.engine.reset(id, &mut self.scene, &mut self.changes);
    }

    pub fn complete(&mut self, id: AnimationId) {
        self.engine
            .complete(id, &mut self.scene, &mut self.changes, &mut self.events);
    }

    /// Jump to a progress in [0,1].
    pub fn seek(&mut self, id: AnimationId, progress: f32) {
        self.engine
            .seek_progress(id, progress, &mut self.scene, &mut self.changes);
    }

    /// Kill an animation and the trigger driving it.
    pub fn kill(&mut self, id: AnimationId) -> bool {
        let Some(anim) = self.engine.kill(id) else {
            return false;
        };
        if let Some(trigger) = anim.trigger {
            self.kill_trigger(trigger);
        }
        true
    }

    // --- triggers -----------------------------------------------------------

    pub fn active_trigger_count(&self) -> usize {
        self.triggers.active_count()
    }

    pub fn trigger_ids(&self) -> Vec<TriggerId> {
        self.triggers.ids()
    }

    pub fn trigger_info(&self, id: TriggerId) -> Option<TriggerInfo> {
        let scroll = self.scene.viewport().scroll_y;
        self.triggers.get(id).map(|e| e.info(scroll))
    }

    pub fn trigger_of(&self, animation: AnimationId) -> Option<TriggerId> {
        self.engine.get(animation).and_then(|a| a.trigger)
    }

    /// Callback-only trigger. `None` when the trigger target matches nothing.
    pub fn create_trigger(&mut self, cfg: TriggerConfig, callbacks: TriggerCallbacks) -> Option<TriggerId> {
        let element = cfg
            .trigger
            .as_ref()
            .and_then(|t| self.resolve(t).first().copied())?;
        let id = self.register_trigger(element, cfg, None, None, callbacks);
        self.update_triggers(Some(&[id]));
        Some(id)
    }

    /// An explicit trigger target that matches nothing.
    pub(crate) fn trigger_unmatched(&self, cfg: &TriggerConfig) -> bool {
        cfg.trigger
            .as_ref()
            .is_some_and(|t| self.resolve(t).is_empty())
    }

    /// Handle with nothing behind it.
    pub(crate) fn empty_handle(&mut self) -> AnimationId {
        self.ids.alloc_animation()
    }

    /// Bind an animation to scroll. Without `cfg.trigger` the animation's first
    /// target is observed. Toggled animations wait paused for their first crossing.
    /// When the trigger target matches nothing the animation is killed instead of
    /// being left to play on its own.
    pub fn attach_trigger(&mut self, animation: AnimationId, cfg: TriggerConfig) -> Option<TriggerId> {
        self.attach_trigger_with(animation, cfg, TriggerCallbacks::new())
    }

    pub fn attach_trigger_with(
        &mut self,
        animation: AnimationId,
        cfg: TriggerConfig,
        callbacks: TriggerCallbacks,
    ) -> Option<TriggerId> {
        let first_target = self.engine.get(animation)?.targets().first().copied();
        let element = match cfg.trigger.as_ref() {
            Some(t) => self.resolve(t).first().copied(),
            None => first_target,
        };
        let Some(element) = element else {
            log::debug!("trigger for {:?} matched nothing; animation dropped", animation);
            self.kill(animation);
            return None;
        };
        let lag = cfg.scrub.lag();
        if let Some(previous) = self.trigger_of(animation) {
            self.kill_trigger(previous);
        }
        let id = self.register_trigger(element, cfg, Some(animation), None, callbacks);
        if let Some(anim) = self.engine.get_mut(animation) {
            anim.trigger = Some(id);
            anim.scrub = lag.map(|lag| ScrubState { lag, target: 0.0 });
        }
        self.engine.pause(animation);
        self.update_triggers(Some(&[id]));
        self.sync_scrubs(Some(&[id]), true);
        Some(id)
    }

    /// Register without evaluating; the caller runs `update_triggers`.
    pub(crate) fn register_trigger(
        &mut self,
        element: ElementId,
        config: TriggerConfig,
        animation: Option<AnimationId>,
        batch: Option<BatchId>,
        callbacks: TriggerCallbacks,
    ) -> TriggerId {
        let id = self.ids.alloc_trigger();
        let entry = TriggerEntry {
            id,
            element,
            config,
            scope: self.scopes.current(),
            start: 0.0,
            end: 0.0,
            zone: Zone::Before,
            animation,
            batch,
            callbacks,
        };
        self.triggers.insert(entry, &self.scene);
        id
    }

    pub(crate) fn insert_batch(&mut self, batch_max: Option<usize>, callbacks: TriggerCallbacks) -> BatchId {
        let id = self.ids.alloc_batch();
        self.triggers.batches.push(BatchEntry {
            id,
            scope: self.scopes.current(),
            batch_max,
            callbacks,
        });
        id
    }

    pub fn kill_trigger(&mut self, id: TriggerId) -> bool {
        match self.triggers.remove(id) {
            Some(entry) => {
                self.detach(&entry);
                true
            }
            None => false,
        }
    }

    /// Kill every trigger and batch group. Animations stay where they are.
    pub fn kill_all_triggers(&mut self) -> usize {
        let gone = self.triggers.clear();
        for entry in &gone {
            self.detach(entry);
        }
        gone.len()
    }

    /// Undo a trigger's hold on its animation and element.
    fn detach(&mut self, entry: &TriggerEntry) {
        if entry.config.pin {
            if let Some(el) = self.scene.get_mut(entry.element) {
                el.set_pin_offset(0.0);
            }
        }
        let Some(aid) = entry.animation else {
            return;
        };
        if let Some(anim) = self.engine.get_mut(aid) {
            if anim.trigger == Some(entry.id) {
                anim.trigger = None;
                if anim.scrub.take().is_some() {
                    self.engine.pause(aid);
                }
            }
        }
    }

    /// Evaluate triggers at the current scroll offset and dispatch their crossings.
    pub(crate) fn update_triggers(&mut self, only: Option<&[TriggerId]>) {
        let fired = self.triggers.update(&mut self.scene, only);
        self.sync_scrubs(only, false);
        self.dispatch(fired);
    }

    /// Point scrubbed animations at their trigger's progress. Immediate scrubs,
    /// and every scrub when `jump` is set, seek straight there.
    fn sync_scrubs(&mut self, only: Option<&[TriggerId]>, jump: bool) {
        let scroll = self.scene.viewport().scroll_y;
        let mut seeks = Vec::new();
        for entry in self
            .triggers
            .entries
            .iter()
            .filter(|e| only.map_or(true, |ids| ids.contains(&e.id)))
        {
            let Some(aid) = entry.animation else {
                continue;
            };
            let Some(anim) = self.engine.get_mut(aid) else {
                continue;
            };
            let Some(scrub) = anim.scrub.as_mut() else {
                continue;
            };
            let p = entry.progress_at(scroll);
            scrub.target = p;
            if jump || scrub.lag <= 0.0 {
                seeks.push((aid, p));
            }
        }
        for (aid, p) in seeks {
            self.engine
                .seek_progress(aid, p, &mut self.scene, &mut self.changes);
        }
    }

    fn dispatch(&mut self, fired: Vec<Fired>) {
        let scroll = self.scene.viewport().scroll_y;
        let mut batched: Vec<(BatchId, Crossing, Vec<ElementId>)> = Vec::new();
        for Fired { trigger, crossing } in fired {
            self.events.push(MotionEvent::TriggerToggled {
                trigger,
                crossing,
                scroll,
            });
            // an earlier callback may have killed it
            let Some(entry) = self.triggers.get(trigger) else {
                continue;
            };
            let element = entry.element;
            let scope = entry.scope;
            let batch = entry.batch;
            let once = entry.config.once;
            let toggled = entry
                .animation
                .filter(|_| entry.config.scrub.lag().is_none())
                .map(|aid| (aid, entry.config.toggle_actions.for_crossing(crossing)));

            if let Some((aid, action)) = toggled {
                self.apply_toggle(aid, action);
            }
            match batch {
                Some(bid) => match batched
                    .iter_mut()
                    .find(|(b, c, _)| *b == bid && *c == crossing)
                {
                    Some((_, _, els)) => els.push(element),
                    None => batched.push((bid, crossing, vec![element])),
                },
                None => self.run_callback(CallbackOwner::Trigger(trigger), crossing, scope, &[element]),
            }
            if once && crossing == Crossing::Enter {
                self.kill_trigger(trigger);
            }
        }

        for (bid, crossing, mut elements) in batched {
            let Some(batch) = self.triggers.batches.iter().find(|b| b.id == bid) else {
                continue;
            };
            let scope = batch.scope;
            let max = batch.batch_max.filter(|m| *m > 0).unwrap_or(usize::MAX);
            self.scene.document_order(&mut elements);
            for chunk in elements.chunks(max) {
                self.run_callback(CallbackOwner::Batch(bid), crossing, scope, chunk);
            }
        }
    }

    fn apply_toggle(&mut self, id: AnimationId, action: ToggleAction) {
        match action {
            ToggleAction::Play => self.engine.play(id),
            ToggleAction::Pause => self.engine.pause(id),
            ToggleAction::Resume => self.engine.resume(id),
            ToggleAction::Reverse => self.engine.reverse(id),
            ToggleAction::Restart => self.engine.restart(id, &mut self.scene, &mut self.changes),
            ToggleAction::Reset => self.engine.reset(id, &mut self.scene, &mut self.changes),
            ToggleAction::Complete => {
                self.engine
                    .complete(id, &mut self.scene, &mut self.changes, &mut self.events)
            }
            ToggleAction::None => {}
        }
    }

    fn callback_slot(&mut self, owner: CallbackOwner, crossing: Crossing) -> Option<&mut Option<TriggerCallback>> {
        match owner {
            CallbackOwner::Trigger(id) => self.triggers.get_mut(id).map(|e| e.callbacks.slot(crossing)),
            CallbackOwner::Batch(id) => self.triggers.batch_mut(id).map(|b| b.callbacks.slot(crossing)),
        }
    }

    /// Run a crossing callback inside its registration scope. The callback is taken
    /// out for the call so it can use the context freely, then put back if its
    /// owner is still alive.
    fn run_callback(&mut self, owner: CallbackOwner, crossing: Crossing, scope: ScopeId, elements: &[ElementId]) {
        let Some(mut callback) = self.callback_slot(owner, crossing).and_then(Option::take) else {
            return;
        };
        self.scopes.enter(scope);
        callback(self, elements);
        self.scopes.close(scope);
        if let Some(slot) = self.callback_slot(owner, crossing) {
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Rect;
    use crate::value::Prop;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cx_with_block(top: f32) -> (MotionContext, ElementId) {
        let mut cx = MotionContext::default();
        let el = cx.add_element(
            ElementSpec::new("section")
                .class("block")
                .rect(Rect::new(0.0, top, 1280.0, 400.0)),
        );
        (cx, el)
    }

    #[test]
    fn unmatched_targets_do_nothing() {
        let mut cx = MotionContext::default();
        let id = cx.to(".ghost", TweenVars::new().prop(Prop::Opacity, 0.0));
        assert!(cx.animation(id).is_none());
        cx.set(".ghost", StyleMap::new().with(Prop::Y, 10.0));
        assert!(cx.create_trigger(TriggerConfig::on(".ghost"), TriggerCallbacks::new()).is_none());
        assert!(cx.tick(1.0).is_empty());
    }

    #[test]
    fn callbacks_run_once_per_crossing() {
        let (mut cx, _) = cx_with_block(2000.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let cbs = TriggerCallbacks::new()
            .on_enter({
                let log = Rc::clone(&log);
                move |_, _| log.borrow_mut().push(Crossing::Enter)
            })
            .on_leave_back(move |_, _| log.borrow_mut().push(Crossing::LeaveBack));
        cx.create_trigger(TriggerConfig::on(".block"), cbs).unwrap();

        cx.scroll_to(1500.0);
        cx.scroll_to(1600.0);
        cx.scroll_to(0.0);
        assert_eq!(*seen.borrow(), vec![Crossing::Enter, Crossing::LeaveBack]);
    }

    #[test]
    fn release_scope_drops_its_registrations() {
        let (mut cx, _) = cx_with_block(2000.0);
        let scope = cx.scoped("component", |cx| {
            cx.create_trigger(TriggerConfig::on(".block"), TriggerCallbacks::new());
            cx.to(".block", TweenVars::new().prop(Prop::Opacity, 0.5));
        });
        assert_eq!(cx.active_trigger_count(), 1);
        assert_eq!(cx.engine().len(), 1);
        assert_eq!(cx.release_scope(scope), 2);
        assert_eq!(cx.active_trigger_count(), 0);
        assert!(cx.engine().is_empty());
    }

    #[test]
    fn registrations_from_callbacks_join_the_trigger_scope() {
        let (mut cx, _) = cx_with_block(100.0);
        let scope = cx.scoped("page", |cx| {
            cx.create_trigger(
                TriggerConfig::on(".block"),
                TriggerCallbacks::new().on_enter(|cx, els| {
                    cx.to(els, TweenVars::new().prop(Prop::Y, 20.0));
                }),
            );
        });
        // the block is already in view, so enter ran at creation
        assert_eq!(cx.engine().len(), 1);
        cx.release_scope(scope);
        assert!(cx.engine().is_empty());
    }

    #[test]
    fn removing_an_element_kills_its_trigger() {
        let (mut cx, el) = cx_with_block(2000.0);
        cx.create_trigger(TriggerConfig::on(el), TriggerCallbacks::new());
        assert_eq!(cx.remove_element(el), 1);
        assert_eq!(cx.active_trigger_count(), 0);
    }
}
