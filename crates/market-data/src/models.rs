//! Normalized market data shapes returned to callers.
//!
//! These are the provider-agnostic views of the upstream payloads. Each
//! field set is declared explicitly so upstream drift fails loudly in
//! tests instead of silently producing partial objects.

use serde::{Deserialize, Serialize};

/// Price and market data for one coin, in the requested quote currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinData {
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub market_cap_rank: Option<u32>,
}

/// One entry of the trending list, in upstream order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    pub score: Option<i32>,
}

/// Global cryptocurrency market snapshot (USD aggregates).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalMarketData {
    pub active_cryptocurrencies: Option<u64>,
    pub markets: Option<u64>,
    pub total_market_cap_usd: f64,
    pub total_volume_usd: f64,
    pub btc_dominance: f64,
    pub market_cap_change_percentage_24h_usd: Option<f64>,
}
