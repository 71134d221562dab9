//! Scroll triggers: viewport-crossing observers over layout rects.
//!
//! A trigger has a start and an end scroll offset derived from its element's
//! box and two `"<element-edge> <viewport-edge>"` positions. Moving the scroll
//! offset across them yields the four crossings `Enter`, `Leave`, `EnterBack`
//! and `LeaveBack`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::MotionContext;
use crate::error::MotionError;
use crate::ids::{AnimationId, BatchId, ElementId, ScopeId, TriggerId};
use crate::scene::{Rect, Scene, Target, Viewport};

/// One side of a scroll position: an edge of the element or viewport.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Center,
    Bottom,
    Percent(f32),
    Px(f32),
}

impl Edge {
    /// Distance from the leading edge of a box of size `extent`.
    pub fn offset(self, extent: f32) -> f32 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => extent / 2.0,
            Edge::Bottom => extent,
            Edge::Percent(p) => extent * p / 100.0,
            Edge::Px(v) => v,
        }
    }
}

impl FromStr for Edge {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" | "left" => Ok(Edge::Top),
            "center" => Ok(Edge::Center),
            "bottom" | "right" => Ok(Edge::Bottom),
            _ => {
                if let Some(p) = s.strip_suffix('%') {
                    p.parse().map(Edge::Percent).map_err(|_| ())
                } else {
                    s.strip_suffix("px").unwrap_or(s).parse().map(Edge::Px).map_err(|_| ())
                }
            }
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Top => f.write_str("top"),
            Edge::Center => f.write_str("center"),
            Edge::Bottom => f.write_str("bottom"),
            Edge::Percent(p) => write!(f, "{p}%"),
            Edge::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// `"top 80%"`: the trigger fires when the element's top meets the line 80% down
/// the viewport.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScrollPosition {
    pub element: Edge,
    pub viewport: Edge,
}

impl ScrollPosition {
    pub const fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which the two edges meet.
    pub fn scroll_offset(&self, rect: &Rect, viewport_height: f32) -> f32 {
        rect.top() + self.element.offset(rect.height) - self.viewport.offset(viewport_height)
    }
}

impl FromStr for ScrollPosition {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MotionError::InvalidScrollPosition { input: s.to_string() };
        let parts: Vec<&str> = s.split_whitespace().collect();
        let (el, vp) = match parts.as_slice() {
            [one] => (*one, *one),
            [el, vp] => (*el, *vp),
            _ => return Err(invalid()),
        };
        Ok(Self {
            element: el.parse().map_err(|_| invalid())?,
            viewport: vp.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for ScrollPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl TryFrom<String> for ScrollPosition {
    type Error = MotionError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScrollPosition> for String {
    fn from(p: ScrollPosition) -> Self {
        p.to_string()
    }
}

/// End of a trigger: an absolute position or a distance past the start.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScrollEnd {
    At(ScrollPosition),
    /// `"+=600"` / `"+=600px"`
    Distance(f32),
    /// `"+=300vw"`: multiples of the viewport width, measured at refresh.
    ViewportWidths(f32),
}

impl FromStr for ScrollEnd {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let Some(rel) = t.strip_prefix("+=") else {
            return t.parse().map(ScrollEnd::At);
        };
        let invalid = || MotionError::InvalidScrollPosition { input: s.to_string() };
        if let Some(vw) = rel.strip_suffix("vw") {
            return vw.parse::<f32>().map(|n| ScrollEnd::ViewportWidths(n / 100.0)).map_err(|_| invalid());
        }
        rel.strip_suffix("px")
            .unwrap_or(rel)
            .parse()
            .map(ScrollEnd::Distance)
            .map_err(|_| invalid())
    }
}

impl fmt::Display for ScrollEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollEnd::At(p) => write!(f, "{p}"),
            ScrollEnd::Distance(d) => write!(f, "+={d}"),
            ScrollEnd::ViewportWidths(n) => write!(f, "+={}vw", n * 100.0),
        }
    }
}

impl TryFrom<String> for ScrollEnd {
    type Error = MotionError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScrollEnd> for String {
    fn from(e: ScrollEnd) -> Self {
        e.to_string()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crossing {
    Enter,
    Leave,
    EnterBack,
    LeaveBack,
}

/// What a crossing does to the trigger's animation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

impl FromStr for ToggleAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "play" => ToggleAction::Play,
            "pause" => ToggleAction::Pause,
            "resume" => ToggleAction::Resume,
            "reverse" => ToggleAction::Reverse,
            "restart" => ToggleAction::Restart,
            "reset" => ToggleAction::Reset,
            "complete" => ToggleAction::Complete,
            "none" => ToggleAction::None,
            _ => return Err(()),
        })
    }
}

impl ToggleAction {
    fn name(self) -> &'static str {
        match self {
            ToggleAction::Play => "play",
            ToggleAction::Pause => "pause",
            ToggleAction::Resume => "resume",
            ToggleAction::Reverse => "reverse",
            ToggleAction::Restart => "restart",
            ToggleAction::Reset => "reset",
            ToggleAction::Complete => "complete",
            ToggleAction::None => "none",
        }
    }
}

/// Actions for enter, leave, enter-back and leave-back, in that order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::None,
        }
    }
}

impl ToggleActions {
    /// `"play none none reverse"`: play on enter, reverse on leave-back.
    pub const PLAY_REVERSE_ON_LEAVE_BACK: ToggleActions = ToggleActions {
        on_enter: ToggleAction::Play,
        on_leave: ToggleAction::None,
        on_enter_back: ToggleAction::None,
        on_leave_back: ToggleAction::Reverse,
    };

    pub fn for_crossing(&self, crossing: Crossing) -> ToggleAction {
        match crossing {
            Crossing::Enter => self.on_enter,
            Crossing::Leave => self.on_leave,
            Crossing::EnterBack => self.on_enter_back,
            Crossing::LeaveBack => self.on_leave_back,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MotionError::InvalidToggleActions { input: s.to_string() };
        let words = s
            .split_whitespace()
            .map(|w| w.parse::<ToggleAction>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match words.as_slice() {
            [a, b, c, d] => Ok(Self {
                on_enter: *a,
                on_leave: *b,
                on_enter_back: *c,
                on_leave_back: *d,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter.name(),
            self.on_leave.name(),
            self.on_enter_back.name(),
            self.on_leave_back.name()
        )
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = MotionError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ToggleActions> for String {
    fn from(t: ToggleActions) -> Self {
        t.to_string()
    }
}

/// How a trigger drives its animation's progress.
/// JSON: `false`, `true`, or a lag in seconds.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Scrub {
    #[default]
    Off,
    /// Progress equals scroll progress.
    Immediate,
    /// Progress catches up with scroll progress over this many seconds.
    Smooth(f32),
}

impl From<serde_json::Value> for Scrub {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Bool(true) => Scrub::Immediate,
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(s) if s > 0.0 => Scrub::Smooth(s as f32),
                _ => Scrub::Off,
            },
            _ => Scrub::Off,
        }
    }
}

impl From<Scrub> for serde_json::Value {
    fn from(s: Scrub) -> Self {
        match s {
            Scrub::Off => serde_json::Value::Bool(false),
            Scrub::Immediate => serde_json::Value::Bool(true),
            Scrub::Smooth(lag) => serde_json::json!(lag),
        }
    }
}

impl Scrub {
    pub(crate) fn lag(self) -> Option<f32> {
        match self {
            Scrub::Off => None,
            Scrub::Immediate => Some(0.0),
            Scrub::Smooth(lag) => Some(lag),
        }
    }
}

pub const DEFAULT_START: ScrollPosition = ScrollPosition::new(Edge::Top, Edge::Bottom);
pub const DEFAULT_END: ScrollPosition = ScrollPosition::new(Edge::Bottom, Edge::Top);

/// Pure-data trigger description. `trigger: None` means "the animated element".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TriggerConfig {
    pub trigger: Option<Target>,
    pub start: ScrollPosition,
    pub end: Option<ScrollEnd>,
    pub toggle_actions: ToggleActions,
    pub scrub: Scrub,
    pub pin: bool,
    pub snap: Option<f32>,
    /// Kill the trigger after its first enter.
    pub once: bool,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            trigger: None,
            start: DEFAULT_START,
            end: None,
            toggle_actions: ToggleActions::default(),
            scrub: Scrub::Off,
            pin: false,
            snap: None,
            once: false,
        }
    }
}

impl TriggerConfig {
    pub fn on(target: impl Into<Target>) -> Self {
        Self {
            trigger: Some(target.into()),
            ..Self::default()
        }
    }
}

/// Field-wise overrides for a `TriggerConfig`, the way callers pass extra
/// trigger options to the helpers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TriggerPatch {
    pub trigger: Option<Target>,
    pub start: Option<ScrollPosition>,
    pub end: Option<ScrollEnd>,
    pub toggle_actions: Option<ToggleActions>,
    pub scrub: Option<Scrub>,
    pub pin: Option<bool>,
    pub snap: Option<f32>,
    pub once: Option<bool>,
}

impl TriggerPatch {
    pub fn apply(self, mut cfg: TriggerConfig) -> TriggerConfig {
        if let Some(t) = self.trigger {
            cfg.trigger = Some(t);
        }
        if let Some(s) = self.start {
            cfg.start = s;
        }
        if let Some(e) = self.end {
            cfg.end = Some(e);
        }
        if let Some(t) = self.toggle_actions {
            cfg.toggle_actions = t;
        }
        if let Some(s) = self.scrub {
            cfg.scrub = s;
        }
        if let Some(p) = self.pin {
            cfg.pin = p;
        }
        if let Some(s) = self.snap {
            cfg.snap = Some(s);
        }
        if let Some(o) = self.once {
            cfg.once = o;
        }
        cfg
    }
}

/// Crossing callback. Receives the context and the crossing elements in document order.
pub type TriggerCallback = Box<dyn FnMut(&mut MotionContext, &[ElementId])>;

#[derive(Default)]
pub struct TriggerCallbacks {
    pub on_enter: Option<TriggerCallback>,
    pub on_leave: Option<TriggerCallback>,
    pub on_enter_back: Option<TriggerCallback>,
    pub on_leave_back: Option<TriggerCallback>,
}

impl fmt::Debug for TriggerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerCallbacks")
            .field("on_enter", &self.on_enter.is_some())
            .field("on_leave", &self.on_leave.is_some())
            .field("on_enter_back", &self.on_enter_back.is_some())
            .field("on_leave_back", &self.on_leave_back.is_some())
            .finish()
    }
}

impl TriggerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter(mut self, f: impl FnMut(&mut MotionContext, &[ElementId]) + 'static) -> Self {
        self.on_enter = Some(Box::new(f));
        self
    }

    pub fn on_leave(mut self, f: impl FnMut(&mut MotionContext, &[ElementId]) + 'static) -> Self {
        self.on_leave = Some(Box::new(f));
        self
    }

    pub fn on_enter_back(mut self, f: impl FnMut(&mut MotionContext, &[ElementId]) + 'static) -> Self {
        self.on_enter_back = Some(Box::new(f));
        self
    }

    pub fn on_leave_back(mut self, f: impl FnMut(&mut MotionContext, &[ElementId]) + 'static) -> Self {
        self.on_leave_back = Some(Box::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_enter.is_none()
            && self.on_leave.is_none()
            && self.on_enter_back.is_none()
            && self.on_leave_back.is_none()
    }

    pub(crate) fn slot(&mut self, crossing: Crossing) -> &mut Option<TriggerCallback> {
        match crossing {
            Crossing::Enter => &mut self.on_enter,
            Crossing::Leave => &mut self.on_leave,
            Crossing::EnterBack => &mut self.on_enter_back,
            Crossing::LeaveBack => &mut self.on_leave_back,
        }
    }

    /// Slots set in `self` replace those of `defaults`.
    pub fn merged_over(self, defaults: TriggerCallbacks) -> TriggerCallbacks {
        TriggerCallbacks {
            on_enter: self.on_enter.or(defaults.on_enter),
            on_leave: self.on_leave.or(defaults.on_leave),
            on_enter_back: self.on_enter_back.or(defaults.on_enter_back),
            on_leave_back: self.on_leave_back.or(defaults.on_leave_back),
        }
    }
}

/// Where the scroll offset sits relative to a trigger's range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Zone {
    Before,
    Active,
    After,
}

/// Crossings produced by moving from one zone to another.
fn crossings(from: Zone, to: Zone) -> &'static [Crossing] {
    match (from, to) {
        (Zone::Before, Zone::Active) => &[Crossing::Enter],
        (Zone::Before, Zone::After) => &[Crossing::Enter, Crossing::Leave],
        (Zone::Active, Zone::After) => &[Crossing::Leave],
        (Zone::After, Zone::Active) => &[Crossing::EnterBack],
        (Zone::After, Zone::Before) => &[Crossing::EnterBack, Crossing::LeaveBack],
        (Zone::Active, Zone::Before) => &[Crossing::LeaveBack],
        _ => &[],
    }
}

#[derive(Debug)]
pub(crate) struct TriggerEntry {
    pub id: TriggerId,
    pub element: ElementId,
    pub config: TriggerConfig,
    pub scope: ScopeId,
    pub start: f32,
    pub end: f32,
    pub zone: Zone,
    pub animation: Option<AnimationId>,
    pub batch: Option<BatchId>,
    pub callbacks: TriggerCallbacks,
}

impl TriggerEntry {
    /// Recompute start/end from layout; the element box is read untransformed.
    fn measure(&mut self, scene: &Scene) {
        let Some(el) = scene.get(self.element) else {
            return;
        };
        let vp = scene.viewport();
        self.start = self.config.start.scroll_offset(&el.rect, vp.height);
        self.end = match self.config.end.unwrap_or(ScrollEnd::At(DEFAULT_END)) {
            ScrollEnd::At(pos) => pos.scroll_offset(&el.rect, vp.height),
            ScrollEnd::Distance(d) => self.start + d,
            ScrollEnd::ViewportWidths(n) => self.start + n * vp.width,
        };
    }

    fn zone_at(&self, scroll: f32) -> Zone {
        if scroll < self.start {
            Zone::Before
        } else if scroll >= self.end {
            Zone::After
        } else {
            Zone::Active
        }
    }

    pub fn progress_at(&self, scroll: f32) -> f32 {
        if self.end > self.start {
            ((scroll - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
        } else if scroll >= self.start {
            1.0
        } else {
            0.0
        }
    }

    pub fn info(&self, scroll: f32) -> TriggerInfo {
        TriggerInfo {
            id: self.id,
            element: self.element,
            start: self.start,
            end: self.end,
            progress: self.progress_at(scroll),
            is_active: self.zone == Zone::Active,
            pin: self.config.pin,
            snap: self.config.snap,
            animation: self.animation,
        }
    }

    /// Pinned elements travel with the scroll while their range is active.
    fn pin_offset_at(&self, scroll: f32) -> f32 {
        match self.zone_at(scroll) {
            Zone::Before => 0.0,
            Zone::Active => scroll - self.start,
            Zone::After => (self.end - self.start).max(0.0),
        }
    }
}

/// Measured state of a live trigger.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TriggerInfo {
    pub id: TriggerId,
    pub element: ElementId,
    pub start: f32,
    pub end: f32,
    pub progress: f32,
    pub is_active: bool,
    pub pin: bool,
    pub snap: Option<f32>,
    pub animation: Option<AnimationId>,
}

/// Crossing produced by a scroll update, before dispatch.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Fired {
    pub trigger: TriggerId,
    pub crossing: Crossing,
}

#[derive(Debug)]
pub(crate) struct BatchEntry {
    pub id: BatchId,
    pub scope: ScopeId,
    pub batch_max: Option<usize>,
    pub callbacks: TriggerCallbacks,
}

/// Registry of live triggers and batch groups.
#[derive(Debug, Default)]
pub struct TriggerRegistry {
    pub(crate) entries: Vec<TriggerEntry>,
    pub(crate) batches: Vec<BatchEntry>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live triggers.
    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    pub fn ids(&self) -> Vec<TriggerId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub(crate) fn get(&self, id: TriggerId) -> Option<&TriggerEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: TriggerId) -> Option<&mut TriggerEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn batch_mut(&mut self, id: BatchId) -> Option<&mut BatchEntry> {
        self.batches.iter_mut().find(|b| b.id == id)
    }

    /// Register a measured trigger sitting before its range; the caller evaluates it.
    pub(crate) fn insert(&mut self, mut entry: TriggerEntry, scene: &Scene) {
        entry.measure(scene);
        entry.zone = Zone::Before;
        self.entries.push(entry);
    }

    pub(crate) fn remove(&mut self, id: TriggerId) -> Option<TriggerEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub(crate) fn remove_scopes(&mut self, scopes: &[ScopeId]) -> Vec<TriggerEntry> {
        let (gone, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| scopes.contains(&e.scope));
        self.entries = keep;
        self.batches.retain(|b| !scopes.contains(&b.scope));
        gone
    }

    pub(crate) fn clear(&mut self) -> Vec<TriggerEntry> {
        self.batches.clear();
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn refresh(&mut self, scene: &Scene) {
        for e in &mut self.entries {
            e.measure(scene);
        }
    }

    /// Move every trigger (or just those in `only`) to the current scroll offset,
    /// updating pins and returning the crossings in registration order.
    pub(crate) fn update(&mut self, scene: &mut Scene, only: Option<&[TriggerId]>) -> Vec<Fired> {
        let vp: Viewport = *scene.viewport();
        let mut fired = Vec::new();
        for e in self
            .entries
            .iter_mut()
            .filter(|e| only.map_or(true, |ids| ids.contains(&e.id)))
        {
            let next = e.zone_at(vp.scroll_y);
            for c in crossings(e.zone, next) {
                log::trace!("trigger {:?} {:?} at scroll {}", e.id, c, vp.scroll_y);
                fired.push(Fired {
                    trigger: e.id,
                    crossing: *c,
                });
            }
            e.zone = next;
            if e.config.pin {
                let offset = e.pin_offset_at(vp.scroll_y);
                if let Some(el) = scene.get_mut(e.element) {
                    el.set_pin_offset(offset);
                }
            }
        }
        fired
    }

    /// Scroll offset the first active snapping trigger wants to settle on.
    pub(crate) fn snap_target(&self, scroll: f32) -> Option<f32> {
        self.entries.iter().find_map(|e| {
            let step = e.config.snap?;
            if step <= 0.0 || e.end <= e.start || e.zone_at(scroll) != Zone::Active {
                return None;
            }
            let p = e.progress_at(scroll);
            let snapped = ((p / step).round() * step).clamp(0.0, 1.0);
            Some(e.start + snapped * (e.end - e.start))
        })
    }
}
