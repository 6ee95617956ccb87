//! Error types for analysis operations.

use thiserror::Error;

/// Errors that can occur while calling the upstream analysis service.
///
/// Content-shape problems are never errors: the normalizer degrades to a
/// best-effort, possibly empty result instead.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The upstream service returned a non-success HTTP status.
    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },
}
