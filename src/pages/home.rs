//! Home page - upload and chat side by side

use leptos::prelude::*;
use crate::components::{ChatPanel, Header, UploadPanel};

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home-container">
            <Header />

            <div class="content">
                <section class="panel upload-panel">
                    <UploadPanel />
                </section>
                <section class="panel chat-panel">
                    <ChatPanel />
                </section>
            </div>
        </div>
    }
}
