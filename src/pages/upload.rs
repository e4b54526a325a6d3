//! Standalone upload page

use leptos::prelude::*;
use crate::components::{Header, UploadPanel};

#[component]
pub fn UploadPage() -> impl IntoView {
    view! {
        <div class="home-container">
            <Header />

            <div class="content single">
                <section class="panel">
                    <UploadPanel />
                </section>
            </div>
        </div>
    }
}
