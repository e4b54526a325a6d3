//! API types matching the backend, plus view-local state models

use serde::{Deserialize, Serialize};

/// Greeting shown before the first exchange
pub const CHAT_GREETING: &str = "Hello! Upload a document to start chatting.";

/// Placeholder text while a reply is awaited
pub const CHAT_PLACEHOLDER: &str = "Thinking...";

/// Text shown in place of a reply that failed
pub const CHAT_FAILURE: &str = "Sorry, I encountered an error. Please try again.";

/// Chat request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Chat response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    /// Retrieved passages, returned by the backend for debugging
    #[serde(default)]
    pub context: Option<Vec<String>>,
}

/// Upload acknowledgment
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub size: u64,
    pub message: String,
    #[serde(default)]
    pub gcs_uri: Option<String>,
}

/// Message in the chat log
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Assistant placeholder still waiting for the backend
    pub pending: bool,
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content.into(), false)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content.into(), false)
    }

    pub fn placeholder() -> Self {
        Self::new(MessageRole::Assistant, CHAT_PLACEHOLDER.to_string(), true)
    }

    fn new(role: MessageRole, content: String, pending: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            timestamp: chrono::Utc::now(),
            pending,
        }
    }
}

/// Ordered in-memory chat history
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLog {
    pub messages: Vec<Message>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self {
            messages: vec![Message::assistant(CHAT_GREETING)],
        }
    }
}

impl ChatLog {
    /// Append the user's message and an assistant placeholder.
    ///
    /// Returns the placeholder id, used to resolve it once the backend answers.
    pub fn begin_exchange(&mut self, text: impl Into<String>) -> String {
        self.messages.push(Message::user(text));
        let placeholder = Message::placeholder();
        let id = placeholder.id.clone();
        self.messages.push(placeholder);
        id
    }

    /// Replace a placeholder's text with the reply
    pub fn resolve(&mut self, id: &str, reply: impl Into<String>) {
        if let Some(msg) = self.messages.iter_mut().find(|m| m.id == id) {
            msg.content = reply.into();
            msg.pending = false;
        }
    }

    /// Replace a placeholder's text with the failure notice
    pub fn fail(&mut self, id: &str) {
        self.resolve(id, CHAT_FAILURE);
    }
}

/// Name and size of the file picked for upload
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
}

/// Upload panel state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadTracker {
    pub selected: Option<SelectedFile>,
    pub is_uploading: bool,
    /// Percent of bytes sent, 0..=100
    pub progress: u8,
    pub receipt: Option<UploadReceipt>,
    pub error: Option<String>,
}

impl UploadTracker {
    pub fn select(&mut self, file: SelectedFile) {
        self.selected = Some(file);
        self.progress = 0;
        self.receipt = None;
        self.error = None;
    }

    /// Enter the uploading state. Returns false when there is nothing to send
    /// or a transfer is already running.
    pub fn begin(&mut self) -> bool {
        if self.selected.is_none() || self.is_uploading {
            return false;
        }
        self.is_uploading = true;
        self.progress = 0;
        self.receipt = None;
        self.error = None;
        true
    }

    /// Record a browser progress event. Events without a known total are ignored.
    pub fn record_progress(&mut self, loaded: f64, total: f64) {
        if let Some(pct) = progress_percent(loaded, total) {
            self.progress = pct;
        }
    }

    pub fn complete(&mut self, receipt: UploadReceipt) {
        self.is_uploading = false;
        self.receipt = Some(receipt);
        self.selected = None;
        self.progress = 0;
    }

    /// Leave the uploading state, keeping the selection so the user can
    /// retry. Returns the text for the browser alert.
    pub fn fail(&mut self, message: impl Into<String>) -> String {
        let message = message.into();
        let alert = failure_alert(&message);
        self.is_uploading = false;
        self.error = Some(message);
        alert
    }

    pub fn can_upload(&self) -> bool {
        self.selected.is_some() && !self.is_uploading
    }
}

/// Alert text for a failed upload
pub fn failure_alert(message: &str) -> String {
    format!("Upload failed: {}", message)
}

/// Percentage of `loaded` over `total`, rounded, or `None` without a total
pub fn progress_percent(loaded: f64, total: f64) -> Option<u8> {
    if total.is_nan() || total <= 0.0 {
        return None;
    }
    let pct = (100.0 * loaded / total).round().clamp(0.0, 100.0);
    Some(pct as u8)
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
