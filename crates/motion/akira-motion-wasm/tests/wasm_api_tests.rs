#![cfg(target_arch = "wasm32")]
use akira_motion_wasm::{abi_version, variant_names, variants, variants_json, AkiraMotion};
use js_sys::{Array, Reflect, JSON};
use serde_json::json;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js(value: serde_json::Value) -> JsValue {
    JSON::parse(&value.to_string()).unwrap()
}

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(key)).unwrap()
}

fn card_page() -> AkiraMotion {
    let mut m = AkiraMotion::new(JsValue::UNDEFINED).unwrap();
    for i in 0..3 {
        m.add_element(js(json!({
            "tag": "div",
            "classes": ["card"],
            "rect": { "x": 0, "y": 1000 + i * 300, "width": 300, "height": 200 }
        })));
    }
    m
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults_and_config() {
    assert!(AkiraMotion::new(JsValue::NULL).is_ok());
    assert!(AkiraMotion::new(js(json!({ "viewport_width": 390 }))).is_ok());
    assert!(AkiraMotion::new(JsValue::from_str("wide")).is_err());
}

#[wasm_bindgen_test]
fn fade_in_reports_changes() {
    let mut m = card_page();
    let id = m.animate("fadeIn", JsValue::from_str(".card"), JsValue::UNDEFINED);
    assert!(id.is_some());
    let out = m.tick(0.6).unwrap();
    let changes = Array::from(&get(&out, "changes"));
    assert!(changes.length() >= 3);
    let first = changes.get(0);
    assert_eq!(get(&first, "prop").as_string().as_deref(), Some("opacity"));
}

#[wasm_bindgen_test]
fn unknown_animation_warns() {
    let mut m = card_page();
    assert!(m.animate("wobble", JsValue::from_str(".card"), JsValue::UNDEFINED).is_none());
    let out = m.flush().unwrap();
    let events = Array::from(&get(&out, "events"));
    assert_eq!(events.length(), 1);
}

#[wasm_bindgen_test]
fn malformed_vars_fall_back_to_defaults() {
    let mut m = card_page();
    m.animate("fadeIn", JsValue::from_str(".card"), JsValue::from_f64(3.0))
        .unwrap();
    let out = m.tick(1.0).unwrap();
    assert!(Array::from(&get(&out, "changes")).length() > 0);
    assert!(Array::from(&get(&out, "events")).length() > 0);
}

#[wasm_bindgen_test]
fn unknown_ease_keeps_duration() {
    let mut m = card_page();
    m.to(
        JsValue::from_str(".card"),
        js(json!({ "opacity": 0, "duration": 2, "ease": "bogus" })),
    );
    let out = m.tick(1.0).unwrap();
    let changes = Array::from(&get(&out, "changes"));
    assert!(changes.length() >= 3);
    // still mid-flight: the two-second duration survived the bad ease
    let value = get(&changes.get(0), "value").as_f64().unwrap();
    assert!(value > 0.0 && value < 1.0, "opacity {value}");
}

#[wasm_bindgen_test]
fn batch_and_scope_teardown() {
    let mut m = card_page();
    let before = m.active_trigger_count();
    let scope = m.begin_scope("cards".into());
    assert!(m.batch(JsValue::from_str(".card"), js(json!({ "batchMax": 2 }))).is_some());
    m.end_scope(scope);
    assert_eq!(m.active_trigger_count(), before + 3);
    assert_eq!(m.trigger_ids().length(), 3);

    m.scroll_to(900.0);
    let out = m.flush().unwrap();
    assert!(Array::from(&get(&out, "events")).length() >= 3);

    m.release_scope(scope);
    assert_eq!(m.active_trigger_count(), before);
}

#[wasm_bindgen_test]
fn horizontal_scroll_exposes_trigger_info() {
    let mut m = AkiraMotion::new(JsValue::UNDEFINED).unwrap();
    let gallery = m.add_element(js(json!({ "tag": "section", "id": "gallery" })));
    for _ in 0..4 {
        m.add_element(js(json!({ "tag": "div", "classes": ["panel"], "parent": gallery })));
    }
    m.horizontal_scroll(
        JsValue::from_str("#gallery"),
        JsValue::from_str(".panel"),
        JsValue::UNDEFINED,
    );
    let id = m.trigger_ids().get(0).as_f64().unwrap() as u32;
    let info = m.trigger_info(id).unwrap();
    let start = get(&info, "start").as_f64().unwrap();
    let end = get(&info, "end").as_f64().unwrap();
    assert_eq!(end - start, 3.0 * 1280.0);
    assert_eq!(m.kill_all(), 1);
    assert!(m.trigger_info(id).unwrap().is_undefined());
}

#[wasm_bindgen_test]
fn variant_tables_are_plain_objects() {
    let names = variant_names();
    assert!(names.length() > 10);
    let table = variants("button").unwrap();
    assert!(get(&get(&table, "hover"), "scale").as_f64().is_some());
    assert!(variants("nope").unwrap().is_undefined());

    let text = variants_json("button").unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(parsed["hover"]["scale"].is_number());
    assert!(variants_json("nope").is_none());
}

#[wasm_bindgen_test]
fn timeline_steps_chain() {
    let mut m = card_page();
    let id = m.timeline(
        JsValue::UNDEFINED,
        js(json!([
            { "target": ".card", "vars": { "opacity": 0.5, "duration": 0.5 } },
            { "target": ".card", "vars": { "y": 20, "duration": 0.5 }, "at": { "relative": -0.25 } }
        ])),
    );
    m.seek(id, 1.0);
    let out = m.flush().unwrap();
    assert!(Array::from(&get(&out, "changes")).length() > 0);
}
