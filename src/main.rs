use leptos::prelude::*;
use secure_rag_ui::{config::Environment, App, ConfigErrorPage};

fn main() {
    // Initialize panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize tracing for logging
    tracing_wasm::set_as_global_default();

    match Environment::load() {
        Ok(env) => {
            tracing::info!(api_url = %env.api_url, production = env.production, "Starting Secure RAG client");
            mount_to_body(move || view! { <App env=env.clone() /> });
        }
        Err(e) => {
            tracing::error!("Invalid environment: {}", e);
            let message = e.to_string();
            mount_to_body(move || view! { <ConfigErrorPage message=message.clone() /> });
        }
    }
}
