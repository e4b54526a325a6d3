//! Loading and progress indicators

use leptos::prelude::*;

/// Animated loading dots
#[component]
pub fn LoadingDots() -> impl IntoView {
    view! {
        <span class="loading-dots">
            <span class="dot dot-bounce-1"></span>
            <span class="dot dot-bounce-2"></span>
            <span class="dot dot-bounce-3"></span>
        </span>
    }
}

/// Spinner loading indicator
#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <svg
            class="spinner spinner-sm"
            xmlns="http://www.w3.org/2000/svg"
            fill="none"
            viewBox="0 0 24 24"
        >
            <circle
                class="spinner-track"
                cx="12"
                cy="12"
                r="10"
                stroke="currentColor"
                stroke-width="4"
            ></circle>
            <path
                class="spinner-head"
                fill="currentColor"
                d="M4 12a8 8 0 018-8V0C5.373 0 0 5.373 0 12h4zm2 5.291A7.962 7.962 0 014 12H0c0 3.042 1.135 5.824 3 7.938l3-2.647z"
            ></path>
        </svg>
    }
}

/// Determinate progress bar, `value` in percent
#[component]
pub fn ProgressBar(#[prop(into)] value: Signal<u8>) -> impl IntoView {
    view! {
        <div class="progress">
            <div class="progress-track">
                <div class="progress-fill" style:width=move || format!("{}%", value.get())></div>
            </div>
            <span class="progress-label">{move || format!("{}%", value.get())}</span>
        </div>
    }
}
