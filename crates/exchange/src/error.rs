//! Error types shared by the exchange adapters.

use thiserror::Error;

/// Errors that can occur while talking to a signed exchange API.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The credential set required for signing is absent or incomplete.
    /// Raised before any request is built.
    #[error("Missing {0} API credentials")]
    MissingCredentials(&'static str),

    /// The exchange rejected the signed request (bad key, signature,
    /// passphrase or IP restriction).
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The exchange rate limited the request.
    #[error("Rate limited: {0}")]
    RateLimited(&'static str),

    /// The request to the exchange timed out.
    #[error("Timeout: {0}")]
    Timeout(&'static str),

    /// The request failed for another reason: connect error or a
    /// non-success status outside the credential classes above.
    #[error("API request failed: {0}")]
    ApiRequestFailed(String),

    /// The exchange answered with a payload that does not match the
    /// declared field set.
    #[error("Invalid response: {0}")]
    InvalidApiResponse(String),
}

impl From<serde_json::Error> for ExchangeError {
    fn from(e: serde_json::Error) -> Self {
        ExchangeError::InvalidApiResponse(e.to_string())
    }
}
