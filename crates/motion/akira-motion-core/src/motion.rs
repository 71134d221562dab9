//! Motion nodes: elements bound to a variant table.
//!
//! A node animates between the states of its table on mount, on viewport entry
//! and, for `Press` nodes, on pointer input. A `StaggerGroup` plays a container
//! and its children with the container's child delays.

use std::sync::Arc;

use crate::context::MotionContext;
use crate::ids::{AnimationId, ElementId, TriggerId};
use crate::trigger::{Edge, ScrollEnd, ScrollPosition, TriggerCallbacks, TriggerConfig};
use crate::variants::{Press, VariantState, VariantTable};

#[derive(Debug)]
pub struct MotionNode<S: VariantState> {
    element: ElementId,
    table: Arc<VariantTable<S>>,
    state: Option<S>,
    animation: Option<AnimationId>,
    hovered: bool,
}

impl<S: VariantState> Clone for MotionNode<S> {
    fn clone(&self) -> Self {
        Self {
            element: self.element,
            table: Arc::clone(&self.table),
            state: self.state,
            animation: self.animation,
            hovered: self.hovered,
        }
    }
}

fn animate_element<S: VariantState>(
    cx: &mut MotionContext,
    element: ElementId,
    table: &VariantTable<S>,
    state: S,
    index: usize,
    extra_delay: f32,
) -> AnimationId {
    cx.to(element, table.get(state).tween_vars(index, extra_delay))
}

/// Viewport band used by `when_in_view`: any part of the element on screen.
fn in_view_config(element: ElementId, once: bool) -> TriggerConfig {
    TriggerConfig {
        trigger: Some(element.into()),
        start: ScrollPosition::new(Edge::Top, Edge::Bottom),
        end: Some(ScrollEnd::At(ScrollPosition::new(Edge::Bottom, Edge::Top))),
        once,
        ..TriggerConfig::default()
    }
}

impl<S: VariantState> MotionNode<S> {
    pub fn new(element: ElementId, table: Arc<VariantTable<S>>) -> Self {
        Self {
            element,
            table,
            state: None,
            animation: None,
            hovered: false,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn table(&self) -> &VariantTable<S> {
        &self.table
    }

    /// Last state requested through this node.
    pub fn state(&self) -> Option<S> {
        self.state
    }

    pub fn animation(&self) -> Option<AnimationId> {
        self.animation
    }

    /// Jump to `state` without a transition.
    pub fn set(&mut self, cx: &mut MotionContext, state: S) {
        cx.set(self.element, self.table.get(state).style.clone());
        self.state = Some(state);
    }

    pub fn animate(&mut self, cx: &mut MotionContext, state: S) -> AnimationId {
        self.animate_with(cx, state, 0, 0.0)
    }

    /// Animate with a custom index, for variants whose delay depends on it.
    pub fn animate_custom(&mut self, cx: &mut MotionContext, state: S, index: usize) -> AnimationId {
        self.animate_with(cx, state, index, 0.0)
    }

    pub(crate) fn animate_with(&mut self, cx: &mut MotionContext, state: S, index: usize, extra_delay: f32) -> AnimationId {
        let id = animate_element(cx, self.element, &self.table, state, index, extra_delay);
        self.state = Some(state);
        self.animation = Some(id);
        id
    }

    /// Start in `hidden` and animate to `visible` whenever the element scrolls into
    /// view; back to `hidden` when it leaves, unless `once`.
    pub fn when_in_view(&mut self, cx: &mut MotionContext, visible: S, hidden: S, once: bool) -> Option<TriggerId> {
        self.set(cx, hidden);
        let el = self.element;
        let show = |table: Arc<VariantTable<S>>| {
            move |cx: &mut MotionContext, _: &[ElementId]| {
                animate_element(cx, el, &table, visible, 0, 0.0);
            }
        };
        let hide = |table: Arc<VariantTable<S>>| {
            move |cx: &mut MotionContext, _: &[ElementId]| {
                animate_element(cx, el, &table, hidden, 0, 0.0);
            }
        };
        let mut callbacks = TriggerCallbacks::new()
            .on_enter(show(Arc::clone(&self.table)))
            .on_enter_back(show(Arc::clone(&self.table)));
        if !once {
            callbacks = callbacks
                .on_leave(hide(Arc::clone(&self.table)))
                .on_leave_back(hide(Arc::clone(&self.table)));
        }
        cx.create_trigger(in_view_config(el, once), callbacks)
    }
}

impl MotionNode<Press> {
    pub fn hover_start(&mut self, cx: &mut MotionContext) -> AnimationId {
        self.hovered = true;
        self.animate(cx, Press::Hover)
    }

    pub fn hover_end(&mut self, cx: &mut MotionContext) -> AnimationId {
        self.hovered = false;
        self.animate(cx, Press::Rest)
    }

    pub fn tap_start(&mut self, cx: &mut MotionContext) -> AnimationId {
        self.animate(cx, Press::Tap)
    }

    /// Release returns to hover while the pointer is still over the element.
    pub fn tap_end(&mut self, cx: &mut MotionContext) -> AnimationId {
        let state = if self.hovered { Press::Hover } else { Press::Rest };
        self.animate(cx, state)
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

/// Container plus children sharing one state type.
#[derive(Debug, Clone)]
pub struct StaggerGroup<S: VariantState> {
    container: MotionNode<S>,
    children: Vec<MotionNode<S>>,
}

type Members<S> = Vec<(ElementId, Arc<VariantTable<S>>)>;

fn play_group<S: VariantState>(
    cx: &mut MotionContext,
    container: &(ElementId, Arc<VariantTable<S>>),
    children: &[(ElementId, Arc<VariantTable<S>>)],
    state: S,
) -> Vec<AnimationId> {
    let mut ids = vec![animate_element(cx, container.0, &container.1, state, 0, 0.0)];
    let transition = container.1.get(state).transition.clone().unwrap_or_default();
    for (i, (el, table)) in children.iter().enumerate() {
        ids.push(animate_element(cx, *el, table, state, 0, transition.child_delay(i)));
    }
    ids
}

impl<S: VariantState> StaggerGroup<S> {
    pub fn new(container: MotionNode<S>, children: Vec<MotionNode<S>>) -> Self {
        Self { container, children }
    }

    pub fn container(&self) -> &MotionNode<S> {
        &self.container
    }

    pub fn children(&self) -> &[MotionNode<S>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [MotionNode<S>] {
        &mut self.children
    }

    fn members(&self) -> ((ElementId, Arc<VariantTable<S>>), Members<S>) {
        (
            (self.container.element, Arc::clone(&self.container.table)),
            self.children
                .iter()
                .map(|c| (c.element, Arc::clone(&c.table)))
                .collect(),
        )
    }

    pub fn set(&mut self, cx: &mut MotionContext, state: S) {
        self.container.set(cx, state);
        for child in &mut self.children {
            child.set(cx, state);
        }
    }

    /// Container first, then child `i` after `delay_children + i × stagger_children`
    /// of the container's target variant.
    pub fn animate(&mut self, cx: &mut MotionContext, state: S) -> Vec<AnimationId> {
        let (container, children) = self.members();
        let ids = play_group(cx, &container, &children, state);
        self.container.state = Some(state);
        self.container.animation = ids.first().copied();
        for (child, id) in self.children.iter_mut().zip(ids.iter().skip(1)) {
            child.state = Some(state);
            child.animation = Some(*id);
        }
        ids
    }

    /// Group version of `MotionNode::when_in_view`, observed on the container.
    pub fn when_in_view(&mut self, cx: &mut MotionContext, visible: S, hidden: S, once: bool) -> Option<TriggerId> {
        self.set(cx, hidden);
        let (container, children) = self.members();
        let el = container.0;
        let shared = Arc::new((container, children));
        let play = move |state: S| {
            let shared = Arc::clone(&shared);
            move |cx: &mut MotionContext, _: &[ElementId]| {
                play_group(cx, &shared.0, &shared.1, state);
            }
        };
        let mut callbacks = TriggerCallbacks::new()
            .on_enter(play(visible))
            .on_enter_back(play(visible));
        if !once {
            callbacks = callbacks.on_leave(play(hidden)).on_leave_back(play(hidden));
        }
        cx.create_trigger(in_view_config(el, once), callbacks)
    }
}
