//! Classification Gateway
//!
//! Mediates every request to the external vision model:
//!
//! ```text
//! image bytes ──► prompt + inline image ──► VisionModel ──► raw text
//!                                                              │
//!                      Classification ◄── strict parse ◄───────┘
//! ```
//!
//! The gateway never touches the record store; persisting the result is
//! the caller's job.

pub mod gemini;
pub mod parse;
pub mod prompt;

use std::sync::Arc;
use thiserror::Error;

use crate::models::Classification;

pub use gemini::GeminiClient;
pub use parse::parse_classification;
pub use prompt::{classification_prompt, SCHEMA_VERSION};

/// Longest slice of a raw model response kept for diagnostics
const RAW_SNIPPET_LEN: usize = 500;

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("classification service unreachable: {0}")]
    Network(String),

    #[error("classification service timed out after {0}s")]
    Timeout(u64),

    #[error("classification service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("classification response rejected: {reason}")]
    InvalidResponse { reason: String, raw: String },
}

impl ClassificationError {
    pub fn invalid(reason: impl Into<String>, raw: &str) -> Self {
        ClassificationError::InvalidResponse {
            reason: reason.into(),
            raw: snippet(raw),
        }
    }
}

pub(crate) fn snippet(text: &str) -> String {
    text.chars().take(RAW_SNIPPET_LEN).collect()
}

/// Opaque image+prompt → text oracle
#[async_trait::async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, ClassificationError>;
}

pub struct ClassificationGateway {
    model: Arc<dyn VisionModel>,
    prompt: String,
}

impl ClassificationGateway {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self {
            model,
            prompt: classification_prompt(),
        }
    }

    /// Classify one image. Fails without a partial result on any
    /// transport or schema problem.
    pub async fn classify(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<Classification, ClassificationError> {
        tracing::debug!("Classifying {} byte image ({})", image.len(), mime_type);

        let text = self.model.generate(image, mime_type, &self.prompt).await?;

        match parse_classification(&text) {
            Ok(classification) => {
                tracing::info!(
                    "Classified waste as {} ({:.2})",
                    classification.category,
                    classification.confidence
                );
                Ok(classification)
            }
            Err(e) => {
                if let ClassificationError::InvalidResponse { raw, reason } = &e {
                    tracing::warn!("Rejected classifier output ({}): {}", reason, raw);
                }
                Err(e)
            }
        }
    }
}
