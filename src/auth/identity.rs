//! Firebase Auth REST calls

use chrono::{DateTime, Utc};
use gloo_net::http::{Request, Response};
use serde::{Deserialize, Serialize};

use super::{expiry_from, AuthError, AuthErrorCode, Session};
use crate::config::Environment;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// `accounts:signInWithPassword` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub local_id: String,
    #[serde(default)]
    pub email: String,
}

/// Secure Token `token` response (snake_case, unlike sign-in)
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl SignInResponse {
    pub(crate) fn into_session(self, now: DateTime<Utc>) -> Result<Session, AuthError> {
        Ok(Session {
            expires_at: expiry_from(&self.expires_in, now)?,
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            local_id: self.local_id,
            email: self.email,
        })
    }
}

impl RefreshResponse {
    /// Carry the user's identity over from the session being refreshed
    pub(crate) fn into_session(self, previous: &Session, now: DateTime<Utc>) -> Result<Session, AuthError> {
        Ok(Session {
            expires_at: expiry_from(&self.expires_in, now)?,
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            local_id: self.user_id,
            email: previous.email.clone(),
        })
    }
}

/// Decode a Firebase error body into a provider code
pub(crate) fn provider_error(status: u16, body: &str) -> AuthError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => AuthError::Provider(AuthErrorCode::from_rest_message(&env.error.message)),
        Err(_) => AuthError::Network(format!("Request failed with status {}", status)),
    }
}

async fn read_response<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, AuthError> {
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(provider_error(status, &body));
    }

    resp.json::<T>()
        .await
        .map_err(|e| AuthError::Decode(e.to_string()))
}

/// Sign in with email and password
pub async fn sign_in_with_password(
    env: &Environment,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let body = SignInRequest {
        email,
        password,
        return_secure_token: true,
    };

    let resp = Request::post(&env.sign_in_url())
        .json(&body)
        .map_err(|e| AuthError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| AuthError::Network(e.to_string()))?;

    let session = read_response::<SignInResponse>(resp)
        .await?
        .into_session(Utc::now())?;

    tracing::info!(uid = %session.local_id, "Signed in");
    Ok(session)
}

/// Exchange the refresh token for a new ID token
pub async fn refresh_session(env: &Environment, session: &Session) -> Result<Session, AuthError> {
    let form = format!(
        "grant_type=refresh_token&refresh_token={}",
        String::from(js_sys::encode_uri_component(&session.refresh_token))
    );

    let resp = Request::post(&env.refresh_url())
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(form)
        .map_err(|e| AuthError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| AuthError::Network(e.to_string()))?;

    let refreshed = read_response::<RefreshResponse>(resp)
        .await?
        .into_session(session, Utc::now())?;

    tracing::debug!(uid = %refreshed.local_id, "Refreshed ID token");
    Ok(refreshed)
}
