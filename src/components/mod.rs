//! Reusable UI components

pub mod chat_input;
pub mod chat_message;
pub mod chat_panel;
pub mod header;
pub mod loading;
pub mod upload_panel;

pub use chat_input::ChatInput;
pub use chat_message::ChatMessage;
pub use chat_panel::ChatPanel;
pub use header::Header;
pub use loading::{LoadingDots, LoadingSpinner, ProgressBar};
pub use upload_panel::UploadPanel;
