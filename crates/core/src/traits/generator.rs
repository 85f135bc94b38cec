use async_trait::async_trait;
use thiserror::Error;

use crate::HistoryEntry;

/// Errors from the external reply generator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Generation timed out")]
    Timeout,

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GeneratorError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, GeneratorError::Network(_) | GeneratorError::Timeout)
    }
}

impl From<GeneratorError> for crate::Error {
    fn from(err: GeneratorError) -> Self {
        crate::Error::Generator(err.to_string())
    }
}

/// Conversational text generator
///
/// Treated as an opaque function from prompt and history to reply text.
/// Retries and safety-block handling belong to the caller.
#[async_trait]
pub trait ReplyGenerator: Send + Sync + 'static {
    async fn generate(
        &self,
        prompt: &str,
        history: &[HistoryEntry],
    ) -> Result<String, GeneratorError>;

    /// Name for logging
    fn name(&self) -> &str {
        "generator"
    }
}
