/// Host boundary: typed errors, the TabHost seam, and the chrome.tabs bridge.

use async_trait::async_trait;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::config::WardenConfig;
use crate::tab_data::TabInfo;

/// Failures at the browser-API boundary. Surfaced to the user as status
/// text by the orchestrator; never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("tab query failed: {0}")]
    Unavailable(String),

    #[error("tab close rejected: {0}")]
    CloseRejected(String),

    #[error("{op} timed out")]
    Timeout { op: &'static str },
}

/// The browser's tab registry, as this extension is allowed to see it.
///
/// The host owns every tab; implementations only read snapshots and issue
/// close-by-id requests. `?Send` because wasm futures stay on the one
/// browser thread.
#[async_trait(?Send)]
pub trait TabHost {
    /// Every currently open tab, unfiltered, in host-defined order.
    async fn query_all_tabs(&self) -> Result<Vec<TabInfo>, HostError>;

    /// Close all given tabs in a single batched request.
    async fn remove_tabs(&self, ids: &[i32]) -> Result<(), HostError>;

    /// Current wall-clock time in milliseconds since the epoch.
    fn now_millis(&self) -> f64;
}

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(js_name = queryAllTabs)]
    fn query_all_tabs_js() -> js_sys::Promise;

    #[wasm_bindgen(js_name = removeTabs)]
    fn remove_tabs_js(tab_ids: JsValue) -> js_sys::Promise;
}

const TIMEOUT_SENTINEL: &str = "__tab_warden_timeout__";

/// Await a host promise, racing it against a setTimeout rejection so a hung
/// host call fails the action instead of hanging it forever.
async fn await_with_timeout(
    promise: js_sys::Promise,
    millis: i32,
    op: &'static str,
    reject_as: fn(String) -> HostError,
) -> Result<JsValue, HostError> {
    let timeout = js_sys::Promise::new(&mut |_resolve, reject| {
        let Some(window) = web_sys::window() else {
            return;
        };
        let cb = Closure::once_into_js(move || {
            let _ = reject.call1(&JsValue::UNDEFINED, &JsValue::from_str(TIMEOUT_SENTINEL));
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), millis);
    });

    let race = js_sys::Promise::race(&js_sys::Array::of2(&promise, &timeout));
    JsFuture::from(race).await.map_err(|err| {
        if err.as_string().as_deref() == Some(TIMEOUT_SENTINEL) {
            HostError::Timeout { op }
        } else {
            reject_as(format!("{err:?}"))
        }
    })
}

/// TabHost backed by the chrome.tabs API through the popup.js bridge.
pub struct ChromeHost {
    timeout_millis: i32,
}

impl ChromeHost {
    pub fn new(config: &WardenConfig) -> ChromeHost {
        ChromeHost {
            timeout_millis: config.host_timeout_millis,
        }
    }
}

#[async_trait(?Send)]
impl TabHost for ChromeHost {
    async fn query_all_tabs(&self) -> Result<Vec<TabInfo>, HostError> {
        let tabs_js = await_with_timeout(
            query_all_tabs_js(),
            self.timeout_millis,
            "tab query",
            HostError::Unavailable,
        )
        .await?;

        serde_wasm_bindgen::from_value(tabs_js)
            .map_err(|e| HostError::Unavailable(format!("failed to parse tab snapshot: {e}")))
    }

    async fn remove_tabs(&self, ids: &[i32]) -> Result<(), HostError> {
        let ids_js = serde_wasm_bindgen::to_value(ids)
            .map_err(|e| HostError::CloseRejected(format!("failed to serialize tab ids: {e}")))?;

        await_with_timeout(
            remove_tabs_js(ids_js),
            self.timeout_millis,
            "tab close",
            HostError::CloseRejected,
        )
        .await?;

        Ok(())
    }

    fn now_millis(&self) -> f64 {
        js_sys::Date::now()
    }
}
