//! Upload panel - send one document to the backend

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

use super::{LoadingSpinner, ProgressBar};
use crate::api::{upload_file, ApiError};
use crate::state::AppState;
use crate::types::{failure_alert, format_size, SelectedFile, UploadTracker};

#[component]
pub fn UploadPanel() -> impl IntoView {
    let state = expect_context::<AppState>();

    let tracker = RwSignal::new(UploadTracker::default());
    // The browser handle is not Send, so it lives beside the tracker
    let file = RwSignal::new_local(None::<web_sys::File>);
    let input_ref = NodeRef::<leptos::html::Input>::new();

    let on_file_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        if let Some(picked) = input.files().and_then(|files| files.get(0)) {
            tracker.update(|t| {
                t.select(SelectedFile {
                    name: picked.name(),
                    size: picked.size() as u64,
                })
            });
            file.set(Some(picked));
        }
    };

    let on_upload = move |_| {
        let Some(picked) = file.get_untracked() else {
            return;
        };
        if !tracker.try_update(|t| t.begin()).unwrap_or(false) {
            return;
        }

        let state = state.clone();
        spawn_local(async move {
            let result = match state.bearer_token().await {
                Ok(token) => {
                    upload_file(&state.env, &token, &picked, move |loaded, total| {
                        tracker.update(|t| t.record_progress(loaded, total));
                    })
                    .await
                }
                Err(e) => Err(ApiError::from(e)),
            };

            match result {
                Ok(receipt) => {
                    tracing::info!(file = %receipt.filename, size = receipt.size, "Upload response: {}", receipt.message);
                    tracker.update(|t| t.complete(receipt));
                    file.set(None);
                    clear_file_input(input_ref);
                }
                Err(e) => {
                    tracing::error!("Upload failed: {}", e);
                    let message = e.to_string();
                    // Record the failure before the modal blocks rendering
                    let alert = tracker
                        .try_update(|t| t.fail(message.clone()))
                        .unwrap_or_else(|| failure_alert(&message));
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(&alert);
                    }
                }
            }
        });
    };

    let is_uploading = move || tracker.with(|t| t.is_uploading);

    view! {
        <div class="upload-container">
            <h3>"Upload Document"</h3>
            <p class="hint">"PDF files up to 10MB"</p>

            <label class="file-picker">
                <input
                    type="file"
                    accept=".pdf,application/pdf"
                    node_ref=input_ref
                    on:change=on_file_change
                    disabled=is_uploading
                />
                <span class="btn btn-secondary">"Choose File"</span>
            </label>

            {move || tracker.with(|t| t.selected.clone()).map(|f| view! {
                <div class="file-info">
                    <span class="file-name">{f.name}</span>
                    <span class="file-size">{format_size(f.size)}</span>
                </div>
            })}

            <button
                class="btn btn-primary"
                on:click=on_upload
                disabled=move || !tracker.with(|t| t.can_upload())
            >
                <Show when=is_uploading>
                    <LoadingSpinner />
                </Show>
                {move || if is_uploading() { "Uploading..." } else { "Upload" }}
            </button>

            <Show when=is_uploading>
                <ProgressBar value=Signal::derive(move || tracker.with(|t| t.progress)) />
            </Show>

            {move || tracker.with(|t| t.error.clone()).map(|err| view! {
                <div class="error-message">{err}</div>
            })}

            {move || tracker.with(|t| t.receipt.clone()).map(|r| view! {
                <div class="upload-result">
                    <p class="result-message">{r.message}</p>
                    <dl>
                        <dt>"File"</dt>
                        <dd>{r.filename}</dd>
                        <dt>"Size"</dt>
                        <dd>{format_size(r.size)}</dd>
                        {r.gcs_uri.map(|uri| view! {
                            <dt>"Stored at"</dt>
                            <dd class="mono">{uri}</dd>
                        })}
                    </dl>
                </div>
            })}
        </div>
    }
}

/// Reset the picker so the same file can be chosen again.
///
/// Uploads finish in a detached task, possibly after the panel has unmounted
/// and its node ref has been disposed; then there is nothing to reset.
fn clear_file_input(input_ref: NodeRef<leptos::html::Input>) {
    if let Some(el) = input_ref.try_get_untracked().flatten() {
        el.set_value("");
    }
}
