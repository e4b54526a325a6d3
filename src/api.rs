//! API client for communicating with the RAG backend

use gloo_net::http::Request;
use serde_json::Value;
use thiserror::Error;

use crate::auth::AuthError;
use crate::config::Environment;
use crate::types::{ChatRequest, ChatResponse};

pub use crate::transfer::upload_file;

/// Backend call errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{detail}")]
    Http { status: u16, detail: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Http {
            status,
            detail: error_detail(status, body),
        }
    }
}

/// Extract a readable message from an error body.
///
/// The backend answers errors with `{"detail": "..."}`; request validation
/// failures carry a list of `{"msg": ...}` objects instead.
pub fn error_detail(status: u16, body: &str) -> String {
    let fallback = || format!("Request failed with status {}", status);

    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    match json.get("detail").or_else(|| json.get("error")) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                fallback()
            } else {
                msgs.join("; ")
            }
        }
        _ => fallback(),
    }
}

/// POST JSON with a bearer token
pub async fn post_with_auth<T, R>(url: &str, body: &T, token: &str) -> Result<R, ApiError>
where
    T: serde::Serialize,
    R: serde::de::DeserializeOwned,
{
    let req = Request::post(url)
        .header("Authorization", &format!("Bearer {}", token))
        .json(body)
        .map_err(|e| ApiError::Decode(format!("Failed to serialize request: {}", e)))?;

    let resp = req
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::from_response(status, &body));
    }

    resp.json::<R>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Send a chat message
pub async fn send_chat(env: &Environment, token: &str, message: &str) -> Result<ChatResponse, ApiError> {
    let body = ChatRequest {
        message: message.to_string(),
    };
    let resp: ChatResponse = post_with_auth(&env.chat_url(), &body, token).await?;

    if let Some(context) = &resp.context {
        tracing::debug!(passages = context.len(), "Chat response received");
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_used_verbatim() {
        let body = r#"{"detail":"File too large (max 10MB)"}"#;
        assert_eq!(error_detail(413, body), "File too large (max 10MB)");
    }

    #[test]
    fn validation_errors_are_joined() {
        let body = r#"{"detail":[
            {"loc":["body","message"],"msg":"field required","type":"value_error.missing"},
            {"loc":["body"],"msg":"invalid json","type":"value_error"}
        ]}"#;
        assert_eq!(error_detail(422, body), "field required; invalid json");
    }

    #[test]
    fn non_json_bodies_report_status() {
        assert_eq!(
            error_detail(502, "Bad Gateway"),
            "Request failed with status 502"
        );
        assert_eq!(error_detail(500, "{}"), "Request failed with status 500");
    }

    #[test]
    fn http_error_displays_detail() {
        let err = ApiError::from_response(401, r#"{"detail":"Invalid authentication credentials"}"#);
        assert_eq!(err.to_string(), "Invalid authentication credentials");
    }

    #[test]
    fn chat_request_shape() {
        let json = serde_json::to_value(ChatRequest {
            message: "hi".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "message": "hi" }));
    }

    #[test]
    fn chat_response_context_is_optional() {
        let resp: ChatResponse = serde_json::from_str(r#"{"response":"42"}"#).unwrap();
        assert_eq!(resp.response, "42");
        assert!(resp.context.is_none());
    }
}
