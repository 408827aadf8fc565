//! Upstream text-generation gateway.
//!
//! The classifier only sees [`GenerativeModel`]; the production
//! implementation is [`GeminiClient`], tests plug in canned responses.

use async_trait::async_trait;

mod gemini;

pub use gemini::GeminiClient;

pub const JSON_MIME_TYPE: &str = "application/json";

/// Per-call generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Output format constraint, when the provider supports one.
    pub response_mime_type: Option<String>,
}

impl GenerationConfig {
    pub fn json() -> Self {
        Self {
            response_mime_type: Some(JSON_MIME_TYPE.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("model returned no text{}", empty_suffix(.block_reason, .finish_reason))]
    EmptyResponse {
        block_reason: Option<String>,
        finish_reason: Option<String>,
    },
    #[error("unexpected model response envelope: {0}")]
    Envelope(#[source] serde_json::Error),
}

/// A prompt block takes precedence over the candidate's finish reason.
fn empty_suffix(block_reason: &Option<String>, finish_reason: &Option<String>) -> String {
    match (block_reason, finish_reason) {
        (Some(reason), _) => format!(" (blocked: {reason})"),
        (None, Some(reason)) => format!(" (finish reason: {reason})"),
        (None, None) => String::new(),
    }
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier, used for logging.
    fn model_name(&self) -> &str;

    /// Runs one generation call and returns the raw text.
    async fn generate(&self, prompt: &str, config: &GenerationConfig)
        -> Result<String, ModelError>;
}
