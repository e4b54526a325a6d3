//! Global application state

use std::sync::Arc;

use gloo_storage::{LocalStorage, Storage};
use leptos::prelude::*;

use crate::auth::{refresh_session, token_source, AuthError, Session, TokenSource};
use crate::config::Environment;

const STORAGE_KEY_SESSION: &str = "secure_rag_session";

/// Global application state
#[derive(Clone)]
pub struct AppState {
    /// Environment loaded at startup
    pub env: Arc<Environment>,
    /// Current identity session; `None` when signed out
    pub session: RwSignal<Option<Session>>,
}

impl AppState {
    pub fn new(env: Environment) -> Self {
        Self {
            env: Arc::new(env),
            session: RwSignal::new(Self::load_from_storage()),
        }
    }

    fn load_from_storage() -> Option<Session> {
        LocalStorage::get(STORAGE_KEY_SESSION).ok()
    }

    /// Store a freshly issued session
    pub fn sign_in(&self, session: Session) {
        if let Err(e) = LocalStorage::set(STORAGE_KEY_SESSION, &session) {
            tracing::warn!("Failed to persist session: {}", e);
        }
        self.session.set(Some(session));
    }

    pub fn sign_out(&self) {
        LocalStorage::delete(STORAGE_KEY_SESSION);
        self.session.set(None);
        tracing::info!("Signed out");
    }

    /// Token for the `Authorization: Bearer` header on backend calls.
    ///
    /// A configured static token wins. Otherwise the session's ID token is
    /// used, refreshed first if it is about to expire. When the provider
    /// rejects the refresh the user is signed out.
    pub async fn bearer_token(&self) -> Result<String, AuthError> {
        let session = self.session.get_untracked();

        match token_source(&self.env, session.as_ref(), chrono::Utc::now()) {
            TokenSource::Static(token) | TokenSource::Current(token) => Ok(token),
            TokenSource::SignedOut => Err(AuthError::SignedOut),
            TokenSource::Refresh(stale) => match refresh_session(&self.env, &stale).await {
                Ok(fresh) => {
                    let token = fresh.id_token.clone();
                    self.sign_in(fresh);
                    Ok(token)
                }
                Err(e) => {
                    if e.ends_session() {
                        tracing::warn!("Session refresh rejected: {}", e);
                        self.sign_out();
                    } else {
                        tracing::warn!("Session refresh failed: {}", e);
                    }
                    Err(e)
                }
            },
        }
    }
}
