/// Popup UI for the Tab Warden extension

use patternfly_yew::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::classify::{run_classify, CancelToken, ClassifyUpdate};
use crate::config::WardenConfig;
use crate::host::ChromeHost;
use crate::orchestrator::TabActions;

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Busy(String),
    Status(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Idle);
    let output = use_state(String::new);
    // Token of the in-flight classify request; replaced (and cancelled) on new input.
    let active_token = use_mut_ref(|| None::<CancelToken>);

    let actions: Rc<TabActions<ChromeHost>> = use_memo((), |_| {
        let config = WardenConfig::default();
        TabActions::new(ChromeHost::new(&config), config)
    });

    // Remove duplicate tabs handler
    let on_remove_duplicates = {
        let state = state.clone();
        let actions = actions.clone();

        Callback::from(move |_| {
            let state = state.clone();
            let actions = actions.clone();

            state.set(AppState::Busy("Removing duplicate tabs...".to_string()));

            spawn_local(async move {
                let status = actions.remove_duplicates().await;
                state.set(AppState::Status(status));
            });
        })
    };

    // Close old tabs handler
    let on_close_stale = {
        let state = state.clone();
        let actions = actions.clone();

        Callback::from(move |_| {
            let state = state.clone();
            let actions = actions.clone();

            state.set(AppState::Busy("Closing old tabs...".to_string()));

            spawn_local(async move {
                let status = actions.close_stale_tabs().await;
                state.set(AppState::Status(status));
            });
        })
    };

    // Classify-on-input handler: forwards the text to the worker and streams
    // generated tokens into the output box.
    let on_input = {
        let output = output.clone();
        let active_token = active_token.clone();

        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let text = input.value();

            // A newer request supersedes any generation still streaming.
            if let Some(previous) = active_token.borrow_mut().take() {
                previous.cancel();
            }
            if text.is_empty() {
                output.set(String::new());
                return;
            }

            let token = CancelToken::new();
            *active_token.borrow_mut() = Some(token.clone());

            let output = output.clone();
            spawn_local(async move {
                // Accumulate streamed chunks here; the state handle only ever
                // sees the full text so far.
                let streamed = Rc::new(RefCell::new(String::new()));
                let stream_output = output.clone();
                let acc = streamed.clone();
                let result = run_classify(&text, &token, move |update| match update {
                    ClassifyUpdate::Start => {
                        acc.borrow_mut().clear();
                        stream_output.set(String::new());
                    }
                    ClassifyUpdate::Update { output: chunk, .. } => {
                        acc.borrow_mut().push_str(&chunk);
                        stream_output.set(acc.borrow().clone());
                    }
                    ClassifyUpdate::Progress { file, progress, .. } => {
                        stream_output.set(format!("Loading model: {file} ({progress:.0}%)"));
                    }
                    ClassifyUpdate::Complete { .. } | ClassifyUpdate::Other => {}
                })
                .await;

                match result {
                    // Superseded by newer input; leave the output alone.
                    Ok(None) => {}
                    Ok(Some(response)) => {
                        let pretty = serde_json::to_string_pretty(&response)
                            .unwrap_or_else(|_| response.to_string());
                        output.set(pretty);
                    }
                    Err(e) => output.set(e),
                }
            });
        })
    };

    let is_busy = matches!(*state, AppState::Busy(_));

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Warden"}</h1>

            <div class="flex-column-gap">
                <Button onclick={on_remove_duplicates} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Remove Duplicate Tabs"}
                </Button>
                <Button onclick={on_close_stale} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Close Old Tabs"}
                </Button>
            </div>

            // Status display
            {match &*state {
                AppState::Busy(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Status(msg) => html! {
                    <p class="status-text">{msg}</p>
                },
                AppState::Idle => html! {}
            }}

            <div class="classify-section">
                <input
                    id="text"
                    type="text"
                    placeholder="Type text to classify"
                    oninput={on_input}
                />
                <pre id="output" class="classify-output">{(*output).clone()}</pre>
            </div>

            <p class="footer-popup">
                {"Tab Warden v0.1.0"}
            </p>
        </div>
    }
}
