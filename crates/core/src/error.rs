//! Error types shared across the workspace

use thiserror::Error;

/// Core error type
///
/// Every kind is recoverable by the caller: a missing catalog falls back to
/// the typed path, malformed lines are skipped, and generator failures end in
/// a template reply.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed catalog line: {0}")]
    MalformedLine(String),

    #[error("Generator error: {0}")]
    Generator(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for the NotFound kind, which callers answer with a fallback path
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result alias using the core error
pub type Result<T> = std::result::Result<T, Error>;
