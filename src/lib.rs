//! Secure RAG Demo - Leptos web client
//!
//! Signs users in against Firebase Auth, uploads documents to the RAG backend
//! and chats with the assistant about them.

pub mod api;
pub mod auth;
pub mod components;
pub mod config;
pub mod pages;
pub mod state;
pub mod transfer;
pub mod types;

use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::{
    components::{Redirect, Route, Router, Routes},
    path,
};

use auth::RequireAuth;
use config::Environment;
use pages::{home::HomePage, login::LoginPage, upload::UploadPage};
use state::AppState;

/// Main application component
#[component]
pub fn App(env: Environment) -> impl IntoView {
    provide_meta_context();

    // Initialize global state
    let app_state = AppState::new(env);
    provide_context(app_state);

    view! {
        <Title text="Secure RAG Demo" />
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/") view=|| view! { <Redirect path="/home" /> } />
                    <Route path=path!("/login") view=LoginPage />
                    <Route
                        path=path!("/home")
                        view=|| view! { <RequireAuth><HomePage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/upload")
                        view=|| view! { <RequireAuth><UploadPage /></RequireAuth> }
                    />
                </Routes>
            </main>
        </Router>
    }
}

/// Shown instead of the app when the embedded environment is invalid
#[component]
pub fn ConfigErrorPage(message: String) -> impl IntoView {
    view! {
        <div class="centered">
            <div class="card">
                <h1>"Configuration error"</h1>
                <p class="error-message">{message}</p>
            </div>
        </div>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="centered">
            <div class="not-found">
                <h1>"404"</h1>
                <p>"Page not found"</p>
                <a href="/home" class="btn btn-primary">"Go Home"</a>
            </div>
        </div>
    }
}
