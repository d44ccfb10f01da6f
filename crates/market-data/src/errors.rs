//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while talking to the market data upstream.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested coin was not found by the provider.
    #[error("Coin not found: {0}")]
    NotFound(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: CoinGecko")]
    RateLimited,

    /// The request to the provider timed out.
    #[error("Timeout: CoinGecko")]
    Timeout,

    /// Any other provider failure: connect error, non-success status,
    /// or a payload that does not match the declared field set.
    #[error("Provider error: CoinGecko - {0}")]
    Provider(String),
}
