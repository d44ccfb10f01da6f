//! Chat service error types.

use thiserror::Error;

/// Chat service errors.
#[derive(Debug, Error)]
pub enum AiError {
    /// Missing API key for the completion provider.
    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),

    /// Provider error (from rig-core or the API).
    #[error("Provider error: {0}")]
    Provider(String),

    /// The completion call exceeded the configured timeout.
    #[error("Completion timed out")]
    Timeout,
}
