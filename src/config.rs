//! Environment configuration
//!
//! The client reads a single `environment.toml`, embedded at compile time,
//! describing the backend API and the Firebase project used for sign-in.
//! The record is loaded once at startup and never mutated afterwards.

use serde::Deserialize;
use thiserror::Error;

/// Environment file shipped with the build
const EMBEDDED_ENVIRONMENT: &str = include_str!("../environment.toml");

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse environment: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

/// Root environment record
#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub production: bool,

    /// Backend base URL, without a trailing slash
    pub api_url: String,

    /// Static bearer token for the backend. When unset the signed-in user's
    /// ID token is sent instead.
    #[serde(default)]
    pub api_token: Option<String>,

    pub firebase: FirebaseConfig,
}

/// Firebase project settings
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    pub api_key: String,

    #[serde(default)]
    pub auth_domain: String,

    #[serde(default)]
    pub project_id: String,

    #[serde(default)]
    pub storage_bucket: String,

    #[serde(default)]
    pub messaging_sender_id: String,

    #[serde(default)]
    pub app_id: String,

    /// Identity Toolkit REST base (sign-in)
    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    /// Secure Token REST base (ID token refresh)
    #[serde(default = "default_secure_token_url")]
    pub secure_token_url: String,
}

fn default_identity_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_secure_token_url() -> String {
    "https://securetoken.googleapis.com/v1".to_string()
}

impl Environment {
    /// Load the environment embedded in the binary
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_toml_str(EMBEDDED_ENVIRONMENT)
    }

    /// Parse and validate an environment from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let mut env: Environment = toml::from_str(raw)?;

        env.api_url = env.api_url.trim().trim_end_matches('/').to_string();
        if env.api_url.is_empty() {
            return Err(ConfigError::Missing("api_url"));
        }
        if env.firebase.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("firebase.api_key"));
        }

        // An empty token in the file means "not configured"
        env.api_token = env
            .api_token
            .take()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let fb = &mut env.firebase;
        fb.identity_url = fb.identity_url.trim_end_matches('/').to_string();
        fb.secure_token_url = fb.secure_token_url.trim_end_matches('/').to_string();

        Ok(env)
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.api_url)
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.api_url)
    }

    pub fn sign_in_url(&self) -> String {
        format!(
            "{}/accounts:signInWithPassword?key={}",
            self.firebase.identity_url, self.firebase.api_key
        )
    }

    pub fn refresh_url(&self) -> String {
        format!(
            "{}/token?key={}",
            self.firebase.secure_token_url, self.firebase.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        production = false
        api_url = "http://localhost:8000/"

        [firebase]
        api_key = "test-key"
        auth_domain = "secure-rag-demo.firebaseapp.com"
        project_id = "secure-rag-demo"
    "#;

    #[test]
    fn parses_sample_and_applies_defaults() {
        let env = Environment::from_toml_str(SAMPLE).unwrap();
        assert!(!env.production);
        assert_eq!(env.api_url, "http://localhost:8000");
        assert_eq!(env.api_token, None);
        assert_eq!(
            env.firebase.identity_url,
            "https://identitytoolkit.googleapis.com/v1"
        );
        assert_eq!(env.firebase.project_id, "secure-rag-demo");
        assert_eq!(env.firebase.app_id, "");
    }

    #[test]
    fn builds_endpoint_urls() {
        let env = Environment::from_toml_str(SAMPLE).unwrap();
        assert_eq!(env.chat_url(), "http://localhost:8000/chat");
        assert_eq!(env.upload_url(), "http://localhost:8000/upload");
        assert_eq!(
            env.sign_in_url(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=test-key"
        );
        assert_eq!(
            env.refresh_url(),
            "https://securetoken.googleapis.com/v1/token?key=test-key"
        );
    }

    #[test]
    fn blank_api_token_is_treated_as_unset() {
        let raw = format!("api_token = \"  \"\n{}", SAMPLE);
        let env = Environment::from_toml_str(&raw).unwrap();
        assert_eq!(env.api_token, None);
    }

    #[test]
    fn rejects_empty_api_url() {
        let raw = r#"
            api_url = " "
            [firebase]
            api_key = "k"
        "#;
        let err = Environment::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("api_url")));
    }

    #[test]
    fn rejects_missing_firebase_section() {
        let err = Environment::from_toml_str("api_url = \"http://x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_empty_api_key() {
        let raw = r#"
            api_url = "http://x"
            [firebase]
            api_key = ""
        "#;
        let err = Environment::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("firebase.api_key")));
    }
}
