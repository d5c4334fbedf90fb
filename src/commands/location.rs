//! Address Bar
//!
//! Reads of the current location and in-place address replacement.

use wasm_bindgen::JsValue;

fn location() -> Option<web_sys::Location> {
    web_sys::window().map(|w| w.location())
}

pub fn current_path() -> String {
    location().and_then(|l| l.pathname().ok()).unwrap_or_else(|| "/".to_string())
}

/// Query string including its leading `?`, empty when there is none
pub fn current_query() -> String {
    location().and_then(|l| l.search().ok()).unwrap_or_default()
}

pub fn current_origin() -> String {
    location().and_then(|l| l.origin().ok()).unwrap_or_default()
}

/// Swap the address without navigating or adding a history entry
pub fn replace_address(address: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let history = window.history().map_err(|e| format!("{:?}", e))?;
    history
        .replace_state_with_url(&JsValue::NULL, "", Some(address))
        .map_err(|e| format!("{:?}", e))
}
