/// Tab Warden - Chrome Extension for Tab Cleanup and On-Device Text Classification
/// Built with Rust + WASM + Yew

pub mod classify;
pub mod config;
pub mod host;
pub mod operations;
pub mod orchestrator;
pub mod tab_data;
pub mod ui;

use wasm_bindgen::prelude::*;

use tab_data::TabInfo;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export core lifecycle functions for JavaScript access
#[wasm_bindgen]
pub fn duplicate_tab_ids(tabs: JsValue) -> Result<JsValue, JsValue> {
    let tabs: Vec<TabInfo> = serde_wasm_bindgen::from_value(tabs)
        .map_err(|e| JsValue::from_str(&format!("invalid tab snapshot: {e}")))?;
    let ids = operations::find_duplicates(&tabs);
    serde_wasm_bindgen::to_value(&ids).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn stale_tab_ids(tabs: JsValue, now_millis: f64, threshold_millis: f64) -> Result<JsValue, JsValue> {
    let tabs: Vec<TabInfo> = serde_wasm_bindgen::from_value(tabs)
        .map_err(|e| JsValue::from_str(&format!("invalid tab snapshot: {e}")))?;
    let ids = operations::find_stale(&tabs, now_millis, threshold_millis);
    serde_wasm_bindgen::to_value(&ids).map_err(|e| JsValue::from_str(&e.to_string()))
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
