//! Chat message component

use leptos::prelude::*;
use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

use super::LoadingDots;
use crate::types::{Message, MessageRole};

/// Render a single chat bubble
#[component]
pub fn ChatMessage(message: Message) -> impl IntoView {
    let is_user = message.role == MessageRole::User;
    let time = message
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M")
        .to_string();

    // Replies are Markdown; user text and placeholders render as typed
    let body = if is_user || message.pending {
        view! { <span class="plain">{message.content.clone()}</span> }.into_any()
    } else {
        let html = render_markdown(&message.content);
        view! { <div class="markdown" inner_html=html></div> }.into_any()
    };

    view! {
        <div class=if is_user { "message user" } else { "message bot" }>
            <div class="bubble">
                {body}
                {message.pending.then(|| view! { <LoadingDots /> })}
            </div>
            <span class="timestamp">{time}</span>
        </div>
    }
}

/// Link schemes allowed to stay clickable in replies
const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Convert Markdown to HTML.
///
/// Raw HTML in the source is escaped, not passed through. Links with any
/// scheme other than http, https or mailto keep only their text, and images
/// render as their alt text so replies never load remote resources.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    // Links cannot nest, so one flag tracks a dropped link's end tag
    let mut dropped_link = false;
    let parser = Parser::new_ext(source, options).filter_map(move |event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::Start(Tag::Link { ref dest_url, .. }) if !is_safe_url(dest_url) => {
            dropped_link = true;
            None
        }
        Event::End(TagEnd::Link) if dropped_link => {
            dropped_link = false;
            None
        }
        Event::Start(Tag::Image { .. }) | Event::End(TagEnd::Image) => None,
        other => Some(other),
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Relative links and the allowed schemes pass; everything else is rejected.
///
/// Browsers ignore ASCII whitespace and control characters inside a scheme,
/// so those are stripped before it is read.
fn is_safe_url(url: &str) -> bool {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect();

    match cleaned.find(|c| matches!(c, ':' | '/' | '?' | '#')) {
        Some(idx) if cleaned[idx..].starts_with(':') => {
            let scheme = cleaned[..idx].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}
