//! CoinGecko market data provider implementation.
//!
//! This module provides market data from the CoinGecko v3 API:
//! - Coin lookup via the /coins/{id} endpoint
//! - Trending coins via /search/trending
//! - Global market snapshot via /global
//!
//! No API key is required for any of these endpoints.

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{CoinData, GlobalMarketData, TrendingCoin};

/// Default CoinGecko v3 API base URL.
pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

const PROVIDER_ID: &str = "COINGECKO";

/// CoinGecko market data provider.
///
/// Read-only; all operations work without credentials.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

// ============================================================================
// Response structures for the CoinGecko API
// ============================================================================

/// /coins/{id} response, reduced to the fields we reshape.
#[derive(Debug, Deserialize)]
struct CoinResponse {
    name: String,
    symbol: String,
    market_data: CoinMarketData,
}

#[derive(Debug, Deserialize)]
struct CoinMarketData {
    current_price: HashMap<String, f64>,
    market_cap: HashMap<String, f64>,
    total_volume: HashMap<String, f64>,
    high_24h: HashMap<String, f64>,
    low_24h: HashMap<String, f64>,
    market_cap_rank: Option<u32>,
}

impl CoinResponse {
    /// Reshape into [`CoinData`] for one quote currency.
    ///
    /// A missing quote currency key means the upstream payload drifted
    /// from the declared field set and is reported as a provider error.
    fn normalize(self, vs_currency: &str) -> Result<CoinData, MarketDataError> {
        let pick = |map: &HashMap<String, f64>, field: &str| {
            map.get(vs_currency).copied().ok_or_else(|| {
                MarketDataError::Provider(format!(
                    "missing {} for quote currency {}",
                    field, vs_currency
                ))
            })
        };

        Ok(CoinData {
            current_price: pick(&self.market_data.current_price, "current_price")?,
            market_cap: pick(&self.market_data.market_cap, "market_cap")?,
            volume_24h: pick(&self.market_data.total_volume, "total_volume")?,
            high_24h: pick(&self.market_data.high_24h, "high_24h")?,
            low_24h: pick(&self.market_data.low_24h, "low_24h")?,
            market_cap_rank: self.market_data.market_cap_rank,
            name: self.name,
            symbol: self.symbol,
        })
    }
}

/// /search/trending response.
#[derive(Debug, Deserialize)]
struct TrendingResponse {
    coins: Vec<TrendingEntry>,
}

#[derive(Debug, Deserialize)]
struct TrendingEntry {
    item: TrendingItem,
}

#[derive(Debug, Deserialize)]
struct TrendingItem {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    market_cap_rank: Option<u32>,
    #[serde(default)]
    score: Option<i32>,
}

impl TrendingResponse {
    /// Reshape into normalized entries, preserving upstream order.
    fn normalize(self) -> Vec<TrendingCoin> {
        self.coins
            .into_iter()
            .map(|entry| TrendingCoin {
                id: entry.item.id,
                name: entry.item.name,
                symbol: entry.item.symbol,
                market_cap_rank: entry.item.market_cap_rank,
                score: entry.item.score,
            })
            .collect()
    }
}

/// /global response envelope.
#[derive(Debug, Deserialize)]
struct GlobalResponse {
    data: GlobalData,
}

#[derive(Debug, Deserialize)]
struct GlobalData {
    #[serde(default)]
    active_cryptocurrencies: Option<u64>,
    #[serde(default)]
    markets: Option<u64>,
    total_market_cap: HashMap<String, f64>,
    total_volume: HashMap<String, f64>,
    market_cap_percentage: HashMap<String, f64>,
    #[serde(default)]
    market_cap_change_percentage_24h_usd: Option<f64>,
}

impl GlobalResponse {
    fn normalize(self) -> Result<GlobalMarketData, MarketDataError> {
        let usd = |map: &HashMap<String, f64>, field: &str| {
            map.get("usd").copied().ok_or_else(|| {
                MarketDataError::Provider(format!("missing usd entry in {}", field))
            })
        };

        Ok(GlobalMarketData {
            total_market_cap_usd: usd(&self.data.total_market_cap, "total_market_cap")?,
            total_volume_usd: usd(&self.data.total_volume, "total_volume")?,
            btc_dominance: self
                .data
                .market_cap_percentage
                .get("btc")
                .copied()
                .ok_or_else(|| {
                    MarketDataError::Provider("missing btc entry in market_cap_percentage".into())
                })?,
            active_cryptocurrencies: self.data.active_cryptocurrencies,
            markets: self.data.markets,
            market_cap_change_percentage_24h_usd: self.data.market_cap_change_percentage_24h_usd,
        })
    }
}

// ============================================================================
// CoinGeckoProvider implementation
// ============================================================================

impl CoinGeckoProvider {
    /// Create a provider against the public CoinGecko API.
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_COINGECKO_URL, timeout)
    }

    /// Create a provider against a specific base URL (used by tests).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Make a GET request and classify transport-level failures.
    async fn fetch(&self, path: &str) -> Result<String, MarketDataError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} request: {}", PROVIDER_ID, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout
            } else {
                MarketDataError::Provider(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(MarketDataError::Provider(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::Provider(e.to_string()))
    }

    /// Get live price and market data for a specific cryptocurrency.
    pub async fn get_coin_data(
        &self,
        coin_id: &str,
        vs_currency: &str,
    ) -> Result<CoinData, MarketDataError> {
        let text = self
            .fetch(&format!("/coins/{}", coin_id))
            .await
            .map_err(|e| match e {
                MarketDataError::NotFound(_) => MarketDataError::NotFound(coin_id.to_string()),
                other => other,
            })?;

        let response: CoinResponse = serde_json::from_str(&text)
            .map_err(|e| MarketDataError::Provider(format!("failed to parse response: {}", e)))?;

        response.normalize(vs_currency)
    }

    /// Get the trending coins list, in upstream order.
    pub async fn get_trending_coins(&self) -> Result<Vec<TrendingCoin>, MarketDataError> {
        let text = self.fetch("/search/trending").await?;

        let response: TrendingResponse = serde_json::from_str(&text)
            .map_err(|e| MarketDataError::Provider(format!("failed to parse response: {}", e)))?;

        let coins = response.normalize();
        debug!("{}: fetched {} trending coins", PROVIDER_ID, coins.len());
        Ok(coins)
    }

    /// Get the global cryptocurrency market snapshot.
    pub async fn get_global_data(&self) -> Result<GlobalMarketData, MarketDataError> {
        let text = self.fetch("/global").await?;

        let response: GlobalResponse = serde_json::from_str(&text)
            .map_err(|e| MarketDataError::Provider(format!("failed to parse response: {}", e)))?;

        response.normalize()
    }
}

// ============================================================================
// Tests
// ============================================================================
