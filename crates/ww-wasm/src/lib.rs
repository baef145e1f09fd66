//! WebAssembly bindings for WebWatch
//!
//! Every extension context (background, options, popup) calls these instead
//! of carrying its own matching code. Nothing is kept between calls: the
//! caller passes the rule array it just fetched.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use ww_core::{display, policy, HostCase, Matcher, Rule};

fn matcher_for(ignore_host_case: bool) -> Matcher {
    if ignore_host_case {
        Matcher::with_host_case(HostCase::IgnoreAscii)
    } else {
        Matcher::new()
    }
}

/// Read a JS array of `{url, reason?}` objects. Entries without a string
/// `url` are skipped.
fn rules_from_js(rules: &JsValue) -> Vec<Rule> {
    if !Array::is_array(rules) {
        web_sys::console::warn_1(&"webwatch: rules is not an array, treating as empty".into());
        return Vec::new();
    }

    let rules_array = Array::from(rules);
    let mut out = Vec::with_capacity(rules_array.length() as usize);

    for (idx, entry) in rules_array.iter().enumerate() {
        let pattern = Reflect::get(&entry, &"url".into())
            .ok()
            .and_then(|value| value.as_string());
        let pattern = match pattern {
            Some(pattern) => pattern,
            None => {
                web_sys::console::warn_1(&format!("webwatch: skipping rule #{} without a url", idx).into());
                continue;
            }
        };
        let reason = Reflect::get(&entry, &"reason".into())
            .ok()
            .and_then(|value| value.as_string());

        out.push(Rule { pattern, reason });
    }

    out
}

fn set(target: &Object, key: &str, value: &JsValue) {
    let _ = Reflect::set(target, &key.into(), value);
}

#[wasm_bindgen]
pub fn evaluate(url: &str, rules: JsValue, ignore_host_case: bool) -> JsValue {
    let rules = rules_from_js(&rules);
    let decision = matcher_for(ignore_host_case).evaluate(url, &rules);

    let js_result = Object::new();
    set(&js_result, "blocked", &JsValue::from(decision.is_blocked()));
    if let Some(reason) = decision.reason() {
        set(&js_result, "reason", &JsValue::from_str(reason));
    }
    js_result.into()
}

#[wasm_bindgen]
pub fn explain(url: &str, rules: JsValue, ignore_host_case: bool) -> JsValue {
    let rules = rules_from_js(&rules);

    let js_result = Object::new();
    match matcher_for(ignore_host_case).find_match(url, &rules) {
        Some(found) => {
            set(&js_result, "blocked", &JsValue::from(true));
            if let Some(reason) = &found.rule.reason {
                set(&js_result, "reason", &JsValue::from_str(reason));
            }
            set(&js_result, "ruleIndex", &JsValue::from(found.index as u32));
            set(&js_result, "pattern", &JsValue::from_str(&found.rule.pattern));
            set(&js_result, "kind", &JsValue::from_str(found.kind.as_str()));
        }
        None => set(&js_result, "blocked", &JsValue::from(false)),
    }
    js_result.into()
}

#[wasm_bindgen]
pub fn is_listed(entry: &str, rules: JsValue, ignore_host_case: bool) -> bool {
    let rules = rules_from_js(&rules);
    matcher_for(ignore_host_case).is_listed(entry, &rules)
}

#[wasm_bindgen]
pub fn should_track_url(url: &str, track_local: bool) -> bool {
    policy::should_track_url(url, track_local)
}

#[wasm_bindgen]
pub fn is_internal_page(url: &str) -> bool {
    policy::is_internal_page(url)
}

#[wasm_bindgen]
pub fn is_notice_page(url: &str) -> bool {
    policy::is_notice_page(url)
}

#[wasm_bindgen]
pub fn notice_url(
    notice_page: &str,
    blocked_url: &str,
    reason: Option<String>,
    referrer: Option<String>,
) -> Result<String, JsValue> {
    policy::notice_url(notice_page, blocked_url, reason.as_deref(), referrer.as_deref())
        .map(String::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn display_pattern(pattern: &str) -> String {
    display::display_pattern(pattern).to_string()
}

#[wasm_bindgen]
pub fn display_reason(reason: Option<String>) -> String {
    display::display_reason(reason.as_deref()).to_string()
}
