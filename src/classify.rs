/// Messaging glue for the in-browser inference worker.
///
/// The worker owns the model; this side only exchanges typed messages with
/// it: a classify request goes out, streamed generation updates come back.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Messages the popup sends to the background worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PopupMessage {
    Classify { id: Uuid, text: String },
    Interrupt { id: Uuid },
}

impl PopupMessage {
    pub fn classify(text: &str) -> PopupMessage {
        PopupMessage::Classify {
            id: Uuid::new_v4(),
            text: text.to_string(),
        }
    }
}

/// Messages the worker posts back while loading the model and generating,
/// tagged by `status` exactly as the worker emits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ClassifyUpdate {
    /// Generation is about to begin.
    Start,
    /// One streamed chunk of generated text.
    Update {
        output: String,
        #[serde(default)]
        tps: Option<f64>,
        #[serde(default)]
        num_tokens: u32,
    },
    /// Generation finished; `output` holds the decoded batch.
    Complete {
        #[serde(default)]
        output: Vec<String>,
    },
    /// Model download progress for one file.
    Progress {
        #[serde(default)]
        file: String,
        #[serde(default)]
        progress: f64,
        #[serde(default)]
        loaded: f64,
        #[serde(default)]
        total: f64,
    },
    /// Worker statuses this UI does not render (initiate, done, ...).
    #[serde(other)]
    Other,
}

/// Cancellation handle for an in-flight classify request.
///
/// Cloned into the update path and checked at each suspension point, so a
/// superseded request stops delivering updates the moment a newer one
/// cancels it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(js_name = sendClassify)]
    fn send_classify_js(message: JsValue, on_update: &js_sys::Function) -> js_sys::Promise;
}

/// Send `text` to the worker and stream generation updates into `on_update`.
///
/// Resolves with the worker's final response, or `None` when the request was
/// cancelled before completion. Updates arriving after cancellation are
/// dropped without reaching `on_update`.
pub async fn run_classify(
    text: &str,
    token: &CancelToken,
    on_update: impl Fn(ClassifyUpdate) + 'static,
) -> Result<Option<serde_json::Value>, String> {
    let request = PopupMessage::classify(text);
    let request_js = serde_wasm_bindgen::to_value(&request)
        .map_err(|e| format!("Failed to serialize request: {e}"))?;

    let update_token = token.clone();
    let update_cb = Closure::wrap(Box::new(move |update_js: JsValue| {
        if update_token.is_cancelled() {
            return;
        }
        match serde_wasm_bindgen::from_value::<ClassifyUpdate>(update_js) {
            Ok(update) => on_update(update),
            Err(e) => log::warn!("unparseable worker update: {e}"),
        }
    }) as Box<dyn Fn(JsValue)>);

    let response = JsFuture::from(send_classify_js(
        request_js,
        update_cb.as_ref().unchecked_ref(),
    ))
    .await
    .map_err(|e| format!("Classification failed: {e:?}"))?;

    if token.is_cancelled() {
        return Ok(None);
    }

    let value = serde_wasm_bindgen::from_value(response)
        .map_err(|e| format!("Failed to parse response: {e}"))?;
    Ok(Some(value))
}
