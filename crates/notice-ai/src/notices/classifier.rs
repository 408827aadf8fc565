use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::domain::{ClassificationResult, NoticeSubmission};
use super::prompt::build_classification_prompt;
use crate::model::{GenerationConfig, GenerativeModel};

pub const VALIDATION_MESSAGE: &str = "title and content are required";
pub const UPSTREAM_FORMAT_MESSAGE: &str = "Model did not return valid JSON";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,
    #[error("{}", UPSTREAM_FORMAT_MESSAGE)]
    UpstreamFormat,
    /// Raw text of the underlying failure, relayed to the caller as-is.
    #[error("{0}")]
    Upstream(String),
}

impl ClassifyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ClassifyError::Validation => StatusCode::BAD_REQUEST,
            ClassifyError::UpstreamFormat | ClassifyError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// `{ "success": false, "error": ... }`
    pub fn envelope(&self) -> Value {
        json!({ "success": false, "error": self.to_string() })
    }
}

/// Success envelope for a classified notice.
pub fn analysis_envelope(analysis: &ClassificationResult) -> Value {
    json!({ "success": true, "analysis": analysis })
}

/// Sends notices to the upstream model and parses the JSON it returns.
///
/// Every call is a fresh upstream request. The parsed output is relayed
/// without checking `category` or `importance` against the allowed values.
pub struct NoticeClassifier<M: ?Sized> {
    model: Arc<M>,
    generation: GenerationConfig,
}

impl<M: ?Sized> Clone for NoticeClassifier<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            generation: self.generation.clone(),
        }
    }
}

impl<M> NoticeClassifier<M>
where
    M: GenerativeModel + ?Sized,
{
    pub fn new(model: Arc<M>) -> Self {
        Self {
            model,
            generation: GenerationConfig::json(),
        }
    }

    pub async fn classify(
        &self,
        submission: &NoticeSubmission,
    ) -> Result<ClassificationResult, ClassifyError> {
        let prompt = build_classification_prompt(submission);
        info!(
            model = self.model.model_name(),
            title_len = submission.title.len(),
            content_len = submission.content.len(),
            "classifying notice"
        );

        let raw = self
            .model
            .generate(&prompt, &self.generation)
            .await
            .map_err(|err| {
                warn!(error = %err, "model call failed");
                ClassifyError::Upstream(err.to_string())
            })?;

        let analysis: Value = serde_json::from_str(&raw).map_err(|err| {
            warn!(error = %err, raw_len = raw.len(), "model returned non-JSON text");
            ClassifyError::UpstreamFormat
        })?;

        info!("notice classified");
        Ok(analysis)
    }

    /// Validates a raw request body and classifies it.
    pub async fn classify_body(&self, body: &[u8]) -> Result<ClassificationResult, ClassifyError> {
        let submission = NoticeSubmission::from_body(body).ok_or(ClassifyError::Validation)?;
        self.classify(&submission).await
    }
}
