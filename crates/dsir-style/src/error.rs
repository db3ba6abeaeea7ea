//! Error types for style canonicalization and interning

/// Errors that can occur while encoding or interning a style record
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// Canonical encoding failed
    #[error("canonical encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}
