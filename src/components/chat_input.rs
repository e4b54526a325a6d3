//! Chat input component

use leptos::prelude::*;

/// Single-line chat input; Enter or the send button submits
#[component]
pub fn ChatInput(
    /// Current input value
    value: RwSignal<String>,
    /// Called when user submits
    on_submit: impl Fn() + 'static + Clone,
    /// Placeholder text
    #[prop(default = "Ask a question...")]
    placeholder: &'static str,
) -> impl IntoView {
    let is_blank = Signal::derive(move || value.with(|v| v.trim().is_empty()));

    let on_keydown = {
        let on_submit = on_submit.clone();
        move |ev: web_sys::KeyboardEvent| {
            if ev.key() == "Enter" && !is_blank.get_untracked() {
                ev.prevent_default();
                on_submit();
            }
        }
    };

    let on_button_click = move |_| {
        if !is_blank.get_untracked() {
            on_submit();
        }
    };

    view! {
        <div class="input-area">
            <input
                type="text"
                class="input chat-input"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                on:keydown=on_keydown
                placeholder=placeholder
            />
            <button
                on:click=on_button_click
                disabled=move || is_blank.get()
                class="icon-button send-button"
                title="Send"
            >
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    class="icon"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                >
                    <line x1="22" y1="2" x2="11" y2="13"></line>
                    <polygon points="22 2 15 22 11 13 2 9 22 2"></polygon>
                </svg>
            </button>
        </div>
    }
}
