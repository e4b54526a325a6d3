//! Route guard for pages that need a signed-in user

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use super::Session;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(&'static str),
}

/// Decide whether a guarded route may render
pub fn guard(session: Option<&Session>) -> GuardOutcome {
    match session {
        Some(_) => GuardOutcome::Allow,
        None => GuardOutcome::Redirect(LOGIN_PATH),
    }
}

/// Renders children only while signed in; otherwise sends the user to login
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let session = state.session;

    Effect::new(move |_| {
        if let GuardOutcome::Redirect(path) = session.with(|s| guard(s.as_ref())) {
            tracing::debug!("No session, redirecting to {}", path);
            navigate(path, Default::default());
        }
    });

    view! {
        <Show when=move || session.with(|s| guard(s.as_ref()) == GuardOutcome::Allow)>
            {children()}
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_redirects_to_login() {
        assert_eq!(guard(None), GuardOutcome::Redirect("/login"));
    }

    #[test]
    fn signed_in_is_allowed() {
        let session = Session {
            id_token: "id".into(),
            refresh_token: "r".into(),
            local_id: "uid".into(),
            email: "a@b.c".into(),
            expires_at: chrono::Utc::now(),
        };
        // An expired token still counts; it is refreshed on the next API call
        assert_eq!(guard(Some(&session)), GuardOutcome::Allow);
    }
}
