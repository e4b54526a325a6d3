//! Header component

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use crate::state::AppState;

/// Application toolbar with the signed-in user and sign-out
#[component]
pub fn Header() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let session = state.session;

    let on_logout = move |_| {
        state.sign_out();
        navigate("/login", Default::default());
    };

    view! {
        <header class="toolbar">
            <a href="/home" class="toolbar-title">"Secure RAG Demo"</a>
            <span class="spacer"></span>
            <span class="toolbar-user">
                {move || session.with(|s| s.as_ref().map(|s| s.email.clone()).unwrap_or_default())}
            </span>
            <button on:click=on_logout class="icon-button" title="Logout">
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
                    <path d="M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4"></path>
                    <polyline points="16 17 21 12 16 7"></polyline>
                    <line x1="21" y1="12" x2="9" y2="12"></line>
                </svg>
            </button>
        </header>
    }
}
