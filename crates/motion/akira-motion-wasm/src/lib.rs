use js_sys::Array;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use akira_motion_core::animations::{self, RevealOptions};
use akira_motion_core::scroll::{self, BatchConfig};
use akira_motion_core::trigger::DEFAULT_START;
use akira_motion_core::{
    catalog, create_timeline, AnimationId, Config, ElementId, ElementSpec, MotionContext,
    Placement, ScopeId, ScrollEnd, ScrollPosition, StyleMap, Target, TimelineVars, TriggerConfig,
    TriggerId, TriggerPatch, TweenVars,
};

/// Major version of the JS-facing surface.
pub const ABI_VERSION: u32 = 1;

#[wasm_bindgen]
pub struct AkiraMotion {
    core: MotionContext,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Batch options from JS. Callbacks stay on the Rust side; JS observes the
/// `TriggerToggled` events instead.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BatchOptions {
    start: Option<ScrollPosition>,
    end: Option<ScrollEnd>,
    batch_max: Option<usize>,
    once: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineStep {
    target: Target,
    #[serde(default)]
    from: Option<StyleMap>,
    #[serde(default)]
    vars: TweenVars,
    #[serde(default)]
    at: Placement,
}

impl AkiraMotion {
    /// Decode an optional argument. Missing values take the default; malformed
    /// ones do too, with a warning in the next outputs.
    fn arg<T: DeserializeOwned + Default>(&mut self, what: &str, value: JsValue) -> T {
        if jsvalue_is_undefined_or_null(&value) {
            return T::default();
        }
        match swb::from_value(value) {
            Ok(v) => v,
            Err(e) => {
                self.core.warn(format!("{what} ignored: {e}"));
                T::default()
            }
        }
    }

    /// Decode a target. Anything unreadable becomes a selector that matches nothing.
    fn target(&mut self, value: JsValue) -> Target {
        match swb::from_value::<Target>(value) {
            Ok(t) => t,
            Err(e) => {
                self.core.warn(format!("target ignored: {e}"));
                Target::Elements(Vec::new())
            }
        }
    }

    fn to_js<T: Serialize>(&self, value: &T) -> Result<JsValue, JsError> {
        to_plain_js(value, "outputs")
    }
}

/// Serialize maps as plain objects so JS sees `{ ... }` rather than `Map`.
fn to_plain_js<T: Serialize>(value: &T, what: &str) -> Result<JsValue, JsError> {
    value
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

#[wasm_bindgen]
impl AkiraMotion {
    /// Create a context. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new AkiraMotion({ viewport_width: 390, viewport_height: 844 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AkiraMotion, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(AkiraMotion {
            core: MotionContext::new(cfg),
        })
    }

    // --- layout and input --------------------------------------------------

    /// Register an element: `{ tag, id?, classes?, rect?, parent? }`. Returns its id.
    #[wasm_bindgen(js_name = add_element)]
    pub fn add_element(&mut self, spec: JsValue) -> u32 {
        let spec: ElementSpec = self.arg("element", spec);
        self.core.add_element(spec).0
    }

    /// Remove an element and its descendants. Returns how many were removed.
    #[wasm_bindgen(js_name = remove_element)]
    pub fn remove_element(&mut self, id: u32) -> u32 {
        self.core.remove_element(ElementId(id)) as u32
    }

    #[wasm_bindgen(js_name = scroll_to)]
    pub fn scroll_to(&mut self, y: f32) {
        self.core.scroll_to(y);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.core.resize(width, height);
    }

    pub fn refresh(&mut self) {
        scroll::refresh(&mut self.core);
    }

    /// Snap the scroll position if a snapping trigger is active. Returns the new position.
    #[wasm_bindgen(js_name = settle_scroll)]
    pub fn settle_scroll(&mut self) -> Option<f32> {
        self.core.settle_scroll()
    }

    /// Advance by dt seconds. Returns `{ changes, events }`.
    pub fn tick(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let out = self.core.tick(dt);
        self.to_js(&out)
    }

    /// Drain pending changes and events without advancing time.
    pub fn flush(&mut self) -> Result<JsValue, JsError> {
        let out = self.core.flush();
        self.to_js(&out)
    }

    // --- primitives ----------------------------------------------------------

    pub fn to(&mut self, target: JsValue, vars: JsValue) -> u32 {
        let target = self.target(target);
        let vars: TweenVars = self.arg("vars", vars);
        self.core.to(target, vars).0
    }

    #[wasm_bindgen(js_name = from_to)]
    pub fn from_to(&mut self, target: JsValue, from: JsValue, vars: JsValue) -> u32 {
        let target = self.target(target);
        let from: StyleMap = self.arg("from", from);
        let vars: TweenVars = self.arg("vars", vars);
        self.core.from_to(target, from, vars).0
    }

    pub fn set(&mut self, target: JsValue, style: JsValue) {
        let target = self.target(target);
        let style: StyleMap = self.arg("style", style);
        self.core.set(target, style);
    }

    /// Build a timeline from `[{ target, from?, vars?, at? }]`.
    pub fn timeline(&mut self, vars: JsValue, steps: JsValue) -> u32 {
        let vars: TimelineVars = self.arg("timeline vars", vars);
        let steps: Vec<TimelineStep> = self.arg("timeline steps", steps);
        let mut builder = create_timeline(vars);
        for step in steps {
            builder = match step.from {
                Some(from) => builder.from_to(step.target, from, step.vars, step.at),
                None => builder.to(step.target, step.vars, step.at),
            };
        }
        builder.build(&mut self.core).0
    }

    // --- named animations ------------------------------------------------------

    /// Run a named entrance/exit (`fadeIn`, `slideInUp`, `staggerIn`, ...).
    /// Unknown names return undefined.
    pub fn animate(&mut self, name: &str, target: JsValue, vars: JsValue) -> Option<u32> {
        type Op = fn(&mut MotionContext, Target, TweenVars) -> AnimationId;
        let op: Op = match name {
            "fadeIn" => animations::fade_in,
            "fadeOut" => animations::fade_out,
            "slideInUp" => animations::slide_in_up,
            "slideInDown" => animations::slide_in_down,
            "slideInLeft" => animations::slide_in_left,
            "slideInRight" => animations::slide_in_right,
            "scaleIn" => animations::scale_in,
            "scaleOut" => animations::scale_out,
            "rotateIn" => animations::rotate_in,
            "staggerIn" => animations::stagger_in,
            other => {
                self.core.warn(format!("unknown animation '{other}'"));
                return None;
            }
        };
        let target = self.target(target);
        let vars: TweenVars = self.arg("vars", vars);
        Some(op(&mut self.core, target, vars).0)
    }

    pub fn parallax(&mut self, target: JsValue, speed: f32, vars: JsValue) -> u32 {
        let target = self.target(target);
        let vars: TweenVars = self.arg("vars", vars);
        animations::parallax(&mut self.core, target, speed, vars).0
    }

    #[wasm_bindgen(js_name = scroll_reveal)]
    pub fn scroll_reveal(&mut self, target: JsValue, options: JsValue) -> u32 {
        let target = self.target(target);
        let options: RevealOptions = self.arg("reveal options", options);
        animations::scroll_reveal(&mut self.core, target, options).0
    }

    #[wasm_bindgen(js_name = pin_element)]
    pub fn pin_element(&mut self, target: JsValue, options: JsValue) -> Option<u32> {
        let target = self.target(target);
        let patch: TriggerPatch = self.arg("pin options", options);
        animations::pin_element(&mut self.core, target, patch).map(|t| t.0)
    }

    #[wasm_bindgen(js_name = horizontal_scroll)]
    pub fn horizontal_scroll(&mut self, container: JsValue, items: JsValue, options: JsValue) -> u32 {
        let container = self.target(container);
        let items = self.target(items);
        let patch: TriggerPatch = self.arg("horizontal scroll options", options);
        animations::horizontal_scroll(&mut self.core, container, items, patch).0
    }

    /// Animate toward one state of a catalog table, e.g. `("button", "hover")`.
    #[wasm_bindgen(js_name = animate_variant)]
    pub fn animate_variant(&mut self, target: JsValue, table: &str, state: &str) -> Option<u32> {
        let Some(variant) = catalog::lookup(table, state) else {
            self.core.warn(format!("unknown variant {table}.{state}"));
            return None;
        };
        let target = self.target(target);
        Some(self.core.to(target, variant.tween_vars(0, 0.0)).0)
    }

    // --- playback --------------------------------------------------------------

    pub fn play(&mut self, id: u32) {
        self.core.play(AnimationId(id));
    }

    pub fn pause(&mut self, id: u32) {
        self.core.pause(AnimationId(id));
    }

    pub fn resume(&mut self, id: u32) {
        self.core.resume(AnimationId(id));
    }

    pub fn reverse(&mut self, id: u32) {
        self.core.reverse(AnimationId(id));
    }

    pub fn restart(&mut self, id: u32) {
        self.core.restart(AnimationId(id));
    }

    pub fn seek(&mut self, id: u32, progress: f32) {
        self.core.seek(AnimationId(id), progress);
    }

    pub fn kill(&mut self, id: u32) -> bool {
        self.core.kill(AnimationId(id))
    }

    // --- triggers ----------------------------------------------------------------

    /// Observe-only trigger; crossings arrive as `TriggerToggled` events.
    #[wasm_bindgen(js_name = create_trigger)]
    pub fn create_trigger(&mut self, config: JsValue) -> Option<u32> {
        let cfg: TriggerConfig = self.arg("trigger config", config);
        self.core.create_trigger(cfg, Default::default()).map(|t| t.0)
    }

    /// Batch with the default entrance/exit callbacks.
    pub fn batch(&mut self, target: JsValue, options: JsValue) -> Option<u32> {
        let target = self.target(target);
        let opts: BatchOptions = self.arg("batch options", options);
        let mut config = BatchConfig::new()
            .start(opts.start.unwrap_or(DEFAULT_START))
            .once(opts.once);
        if let Some(end) = opts.end {
            config = config.end(end);
        }
        if let Some(max) = opts.batch_max {
            config = config.batch_max(max);
        }
        scroll::batch(&mut self.core, target, config).map(|b| b.0)
    }

    #[wasm_bindgen(js_name = trigger_info)]
    pub fn trigger_info(&self, id: u32) -> Result<JsValue, JsError> {
        match self.core.trigger_info(TriggerId(id)) {
            Some(info) => self.to_js(&info),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = trigger_ids)]
    pub fn trigger_ids(&self) -> Array {
        self.core
            .trigger_ids()
            .into_iter()
            .map(|t| JsValue::from(t.0))
            .collect()
    }

    #[wasm_bindgen(js_name = active_trigger_count)]
    pub fn active_trigger_count(&self) -> u32 {
        self.core.active_trigger_count() as u32
    }

    #[wasm_bindgen(js_name = kill_trigger)]
    pub fn kill_trigger(&mut self, id: u32) -> bool {
        self.core.kill_trigger(TriggerId(id))
    }

    /// Kill every trigger. Returns how many there were.
    #[wasm_bindgen(js_name = kill_all)]
    pub fn kill_all(&mut self) -> u32 {
        scroll::kill_all(&mut self.core) as u32
    }

    // --- scopes --------------------------------------------------------------------

    /// Open a scope; registrations until `end_scope` belong to it.
    #[wasm_bindgen(js_name = begin_scope)]
    pub fn begin_scope(&mut self, label: String) -> u32 {
        self.core.begin_scope(label).0
    }

    #[wasm_bindgen(js_name = end_scope)]
    pub fn end_scope(&mut self, id: u32) {
        self.core.end_scope(ScopeId(id));
    }

    /// Kill everything registered in the scope. Returns the number of registrations.
    #[wasm_bindgen(js_name = release_scope)]
    pub fn release_scope(&mut self, id: u32) -> u32 {
        self.core.release_scope(ScopeId(id)) as u32
    }
}

/// Variant table by catalog name as `{ state: { ...style, transition? } }`.
#[wasm_bindgen]
pub fn variants(name: &str) -> Result<JsValue, JsError> {
    match catalog::table_json(name) {
        Some(json) => to_plain_js(&json, "variants"),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Same table as `variants`, as a JSON string for hosts that cache it.
#[wasm_bindgen(js_name = variants_json)]
pub fn variants_json(name: &str) -> Option<String> {
    catalog::table_json(name).and_then(|json| serde_json::to_string(&json).ok())
}

#[wasm_bindgen(js_name = variant_names)]
pub fn variant_names() -> Array {
    catalog::NAMES.iter().map(|n| JsValue::from_str(n)).collect()
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    ABI_VERSION
}
