//! Firebase email/password authentication
//!
//! Sign-in goes through the Identity Toolkit REST API; the resulting
//! [`Session`] is kept in [`crate::state::AppState`] as an observable signal
//! and persisted across reloads.

pub mod guard;
pub mod identity;

pub use guard::{guard, GuardOutcome, RequireAuth};
pub use identity::{refresh_session, sign_in_with_password};

use chrono::{DateTime, Duration, Utc};

use crate::config::Environment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Refresh ID tokens this long before they actually expire
const EXPIRY_SKEW_SECS: i64 = 60;

/// Message shown for any failure without a specific mapping
pub const DEFAULT_LOGIN_ERROR: &str = "Login failed. Please try again.";

/// Provider error codes the login view knows how to explain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    InvalidEmail,
    UserDisabled,
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    Other(String),
}

impl AuthErrorCode {
    /// Map an `auth/...` SDK-style code
    pub fn from_sdk_code(code: &str) -> Self {
        match code {
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/user-disabled" => Self::UserDisabled,
            "auth/user-not-found" => Self::UserNotFound,
            "auth/wrong-password" => Self::WrongPassword,
            "auth/invalid-credential" => Self::InvalidCredential,
            other => Self::Other(other.to_string()),
        }
    }

    /// Map a REST error message such as `INVALID_PASSWORD` or
    /// `TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled...`
    pub fn from_rest_message(message: &str) -> Self {
        let key = message.split(" : ").next().unwrap_or(message).trim();
        match key {
            "INVALID_EMAIL" => Self::InvalidEmail,
            "USER_DISABLED" => Self::UserDisabled,
            "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => Self::UserNotFound,
            "INVALID_PASSWORD" => Self::WrongPassword,
            "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => Self::InvalidCredential,
            other => Self::Other(other.to_string()),
        }
    }

    /// SDK-style code, used in logs
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidEmail => "auth/invalid-email",
            Self::UserDisabled => "auth/user-disabled",
            Self::UserNotFound => "auth/user-not-found",
            Self::WrongPassword => "auth/wrong-password",
            Self::InvalidCredential => "auth/invalid-credential",
            Self::Other(code) => code,
        }
    }

    /// Text shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "Invalid email format.",
            Self::UserDisabled => "This user has been disabled.",
            Self::UserNotFound => "User not found.",
            Self::WrongPassword => "Incorrect password.",
            Self::InvalidCredential => "Invalid credentials.",
            Self::Other(_) => DEFAULT_LOGIN_ERROR,
        }
    }
}

impl std::fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Identity provider rejected the request: {0}")]
    Provider(AuthErrorCode),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse identity response: {0}")]
    Decode(String),

    #[error("Not signed in")]
    SignedOut,
}

impl AuthError {
    /// Whether this failure means the stored session can no longer be used.
    ///
    /// Only the provider's verdict ends a session; transport errors leave it
    /// in place for the next attempt.
    pub fn ends_session(&self) -> bool {
        matches!(self, AuthError::Provider(_))
    }

    /// Text for the login form
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::Provider(code) => code.message(),
            _ => DEFAULT_LOGIN_ERROR,
        }
    }
}

/// A signed-in user's credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id_token: String,
    pub refresh_token: String,
    pub local_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the ID token should be refreshed before use
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECS) >= self.expires_at
    }
}

/// Where the bearer token for a backend call comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TokenSource {
    /// `api_token` from the environment
    Static(String),
    /// The session's ID token, still valid
    Current(String),
    /// The session's ID token is about to expire and must be refreshed first
    Refresh(Session),
    SignedOut,
}

/// Pick the bearer token source. A configured static token wins over any session.
pub fn token_source(env: &Environment, session: Option<&Session>, now: DateTime<Utc>) -> TokenSource {
    if let Some(token) = &env.api_token {
        return TokenSource::Static(token.clone());
    }
    match session {
        None => TokenSource::SignedOut,
        Some(s) if s.needs_refresh(now) => TokenSource::Refresh(s.clone()),
        Some(s) => TokenSource::Current(s.id_token.clone()),
    }
}

/// Parse Firebase's stringly `expiresIn` ("3600") into an absolute instant
pub(crate) fn expiry_from(expires_in: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, AuthError> {
    let secs: i64 = expires_in
        .trim()
        .parse()
        .map_err(|_| AuthError::Decode(format!("invalid expiresIn: {}", expires_in)))?;
    Ok(now + Duration::seconds(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("auth/invalid-email", "Invalid email format.")]
    #[case("auth/user-disabled", "This user has been disabled.")]
    #[case("auth/user-not-found", "User not found.")]
    #[case("auth/wrong-password", "Incorrect password.")]
    #[case("auth/invalid-credential", "Invalid credentials.")]
    #[case("auth/too-many-requests", DEFAULT_LOGIN_ERROR)]
    #[case("", DEFAULT_LOGIN_ERROR)]
    fn sdk_codes_map_to_messages(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(AuthErrorCode::from_sdk_code(code).message(), expected);
    }

    #[rstest]
    #[case("INVALID_EMAIL", AuthErrorCode::InvalidEmail)]
    #[case("USER_DISABLED", AuthErrorCode::UserDisabled)]
    #[case("EMAIL_NOT_FOUND", AuthErrorCode::UserNotFound)]
    #[case("INVALID_PASSWORD", AuthErrorCode::WrongPassword)]
    #[case("INVALID_LOGIN_CREDENTIALS", AuthErrorCode::InvalidCredential)]
    #[case(
        "TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled",
        AuthErrorCode::Other("TOO_MANY_ATTEMPTS_TRY_LATER".to_string())
    )]
    fn rest_messages_map_to_codes(#[case] message: &str, #[case] expected: AuthErrorCode) {
        assert_eq!(AuthErrorCode::from_rest_message(message), expected);
    }

    #[test]
    fn rest_and_sdk_codes_agree() {
        let rest = AuthErrorCode::from_rest_message("INVALID_PASSWORD");
        assert_eq!(rest.code(), "auth/wrong-password");
        assert_eq!(AuthErrorCode::from_sdk_code(rest.code()), rest);
    }

    #[test]
    fn non_provider_failures_use_default_message() {
        assert_eq!(
            AuthError::Network("offline".into()).user_message(),
            DEFAULT_LOGIN_ERROR
        );
        assert_eq!(
            AuthError::Provider(AuthErrorCode::UserDisabled).user_message(),
            "This user has been disabled."
        );
    }

    fn environment(api_token: Option<&str>) -> Environment {
        let token_line = api_token
            .map(|t| format!("api_token = \"{}\"\n", t))
            .unwrap_or_default();
        let raw = format!(
            "{}api_url = \"http://localhost:8000\"\n[firebase]\napi_key = \"k\"\n",
            token_line
        );
        Environment::from_toml_str(&raw).unwrap()
    }

    fn session_expiring_in(now: DateTime<Utc>, secs: i64) -> Session {
        Session {
            id_token: "id-token".into(),
            refresh_token: "refresh".into(),
            local_id: "uid".into(),
            email: "a@b.c".into(),
            expires_at: now + Duration::seconds(secs),
        }
    }

    fn source_kind(source: &TokenSource) -> &'static str {
        match source {
            TokenSource::Static(_) => "static",
            TokenSource::Current(_) => "current",
            TokenSource::Refresh(_) => "refresh",
            TokenSource::SignedOut => "signed_out",
        }
    }

    #[rstest]
    #[case(Some("dev-token"), None, "static")]
    #[case(Some("dev-token"), Some(3600), "static")]
    #[case(Some("dev-token"), Some(-60), "static")]
    #[case(None, None, "signed_out")]
    #[case(None, Some(3600), "current")]
    #[case(None, Some(30), "refresh")]
    #[case(None, Some(-60), "refresh")]
    fn bearer_token_source(
        #[case] api_token: Option<&str>,
        #[case] expires_in: Option<i64>,
        #[case] expected: &str,
    ) {
        let now = Utc::now();
        let session = expires_in.map(|secs| session_expiring_in(now, secs));
        let source = token_source(&environment(api_token), session.as_ref(), now);
        assert_eq!(source_kind(&source), expected);
    }

    #[test]
    fn token_sources_carry_the_right_token() {
        let now = Utc::now();
        let session = session_expiring_in(now, 3600);

        assert_eq!(
            token_source(&environment(Some("dev-token")), Some(&session), now),
            TokenSource::Static("dev-token".to_string())
        );
        assert_eq!(
            token_source(&environment(None), Some(&session), now),
            TokenSource::Current("id-token".to_string())
        );

        let expiring = session_expiring_in(now, 10);
        assert_eq!(
            token_source(&environment(None), Some(&expiring), now),
            TokenSource::Refresh(expiring.clone())
        );
    }

    #[rstest]
    #[case(AuthError::Provider(AuthErrorCode::UserDisabled), true)]
    #[case(AuthError::Provider(AuthErrorCode::Other("TOKEN_EXPIRED".to_string())), true)]
    #[case(AuthError::Network("offline".to_string()), false)]
    #[case(AuthError::Decode("bad body".to_string()), false)]
    #[case(AuthError::SignedOut, false)]
    fn only_provider_rejections_end_the_session(#[case] err: AuthError, #[case] ends: bool) {
        assert_eq!(err.ends_session(), ends);
    }

    #[test]
    fn session_refreshes_inside_skew_window() {
        let now = Utc::now();
        let session = Session {
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            local_id: "uid".into(),
            email: "a@b.c".into(),
            expires_at: now + Duration::seconds(3600),
        };
        assert!(!session.needs_refresh(now));
        assert!(session.needs_refresh(now + Duration::seconds(3550)));
        assert!(session.needs_refresh(now + Duration::seconds(4000)));
    }

    #[test]
    fn expiry_parses_seconds() {
        let now = Utc::now();
        assert_eq!(expiry_from("3600", now).unwrap(), now + Duration::seconds(3600));
        assert!(matches!(expiry_from("soon", now), Err(AuthError::Decode(_))));
    }
}
