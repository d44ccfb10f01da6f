//! CoinGecko market data adapter.
//!
//! Read-only coin lookup, trending list and global market snapshot,
//! reshaped into this service's own response vocabulary. No credentials
//! are required; the upstream being unreachable surfaces as a typed
//! error instead of a crash.

pub mod coingecko;
pub mod errors;
pub mod models;

pub use coingecko::{CoinGeckoProvider, DEFAULT_COINGECKO_URL};
pub use errors::MarketDataError;
pub use models::{CoinData, GlobalMarketData, TrendingCoin};
