//! Chat panel - conversation with the document assistant

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions};

use super::{ChatInput, ChatMessage};
use crate::api::{send_chat, ApiError};
use crate::state::AppState;
use crate::types::ChatLog;

#[component]
pub fn ChatPanel() -> impl IntoView {
    let state = expect_context::<AppState>();

    let log = RwSignal::new(ChatLog::default());
    let input = RwSignal::new(String::new());
    let messages_end_ref = NodeRef::<leptos::html::Div>::new();

    // Keep the newest message in view
    Effect::new(move |_| {
        log.track();
        if let Some(el) = messages_end_ref.get() {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            el.scroll_into_view_with_scroll_into_view_options(&options);
        }
    });

    let send_message = move || {
        let text = input.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        input.set(String::new());

        let Some(pending_id) = log.try_update(|l| l.begin_exchange(text.clone())) else {
            return;
        };

        let state = state.clone();
        spawn_local(async move {
            let reply = match state.bearer_token().await {
                Ok(token) => send_chat(&state.env, &token, &text).await,
                Err(e) => Err(ApiError::from(e)),
            };

            match reply {
                Ok(resp) => log.update(|l| l.resolve(&pending_id, resp.response)),
                Err(e) => {
                    tracing::error!("Chat error: {}", e);
                    log.update(|l| l.fail(&pending_id));
                }
            }
        });
    };

    view! {
        <div class="chat-container">
            <h3>"AI Assistant"</h3>

            <div class="messages">
                {move || {
                    log.get()
                        .messages
                        .into_iter()
                        .map(|msg| view! { <ChatMessage message=msg /> })
                        .collect::<Vec<_>>()
                }}
                <div node_ref=messages_end_ref></div>
            </div>

            <ChatInput value=input on_submit=send_message />
        </div>
    }
}
