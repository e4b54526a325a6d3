//! Login page

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use crate::auth::sign_in_with_password;
use crate::components::LoadingSpinner;
use crate::state::AppState;

/// Login page
#[component]
pub fn LoginPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let session = state.session;

    // Form state
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let is_loading = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    // Handle form submission
    let state_for_submit = state.clone();
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_loading.get_untracked() {
            return;
        }

        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let state = state_for_submit.clone();
        let navigate = navigate.clone();

        spawn_local(async move {
            is_loading.set(true);
            error.set(None);

            let result = sign_in_with_password(&state.env, &email_val, &password_val).await;

            is_loading.set(false);

            match result {
                Ok(session) => {
                    state.sign_in(session);
                    password.set(String::new());
                    navigate("/home", Default::default());
                }
                Err(e) => {
                    tracing::error!("Login failed: {}", e);
                    error.set(Some(e.user_message().to_string()));
                }
            }
        });
    };

    let can_submit = move || {
        !email.with(String::is_empty) && !password.with(String::is_empty) && !is_loading.get()
    };

    let signed_in_email = move || session.with(|s| s.as_ref().map(|s| s.email.clone()));

    view! {
        <div class="login-container">
            <div class="login-card">
                <div class="login-header">
                    <h1 class="login-title">"Secure RAG Demo"</h1>
                    <p class="login-subtitle">"Login to continue"</p>
                </div>

                {move || {
                    if let Some(user_email) = signed_in_email() {
                        let state = state.clone();
                        view! {
                            <div class="welcome">
                                <p>{format!("Welcome, {}!", user_email)}</p>
                                <a href="/home" class="btn btn-primary">"Continue"</a>
                                <button class="btn btn-warn" on:click=move |_| state.sign_out()>
                                    "Logout"
                                </button>
                            </div>
                        }.into_any()
                    } else {
                        view! {
                            <form on:submit=on_submit.clone() class="login-form">
                                <div class="input-group">
                                    <label class="input-label">"Email"</label>
                                    <input
                                        type="email"
                                        name="email"
                                        prop:value=move || email.get()
                                        on:input=move |ev| email.set(event_target_value(&ev))
                                        required=true
                                        class="input"
                                    />
                                </div>

                                <div class="input-group">
                                    <label class="input-label">"Password"</label>
                                    <input
                                        type="password"
                                        name="password"
                                        prop:value=move || password.get()
                                        on:input=move |ev| password.set(event_target_value(&ev))
                                        required=true
                                        class="input"
                                    />
                                </div>

                                {move || error.get().map(|msg| view! {
                                    <div class="error-message">{msg}</div>
                                })}

                                <button type="submit" disabled=move || !can_submit() class="btn btn-primary">
                                    <Show when=move || is_loading.get()>
                                        <LoadingSpinner />
                                    </Show>
                                    "Login"
                                </button>
                            </form>
                        }.into_any()
                    }
                }}
            </div>
        </div>
    }
}
