use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use cryptodash_ai::{ChatConfig, ChatService, CryptoAssistant};
use cryptodash_exchange::{BinanceClient, KuCoinClient};
use cryptodash_market_data::CoinGeckoProvider;

pub struct AppState {
    pub market_data: CoinGeckoProvider,
    pub kucoin: KuCoinClient,
    pub binance: BinanceClient,
    pub assistant: Arc<dyn CryptoAssistant>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> Arc<AppState> {
    let market_data =
        CoinGeckoProvider::with_base_url(&config.coingecko_url, config.upstream_timeout);
    let kucoin = KuCoinClient::with_base_url(
        config.kucoin_credentials.clone(),
        &config.kucoin_url,
        config.upstream_timeout,
    );
    let binance = BinanceClient::with_base_url(
        config.binance_credentials.clone(),
        &config.binance_url,
        config.upstream_timeout,
    );
    let assistant = Arc::new(ChatService::new(
        config.openai_api_key.clone(),
        ChatConfig {
            timeout: config.upstream_timeout,
            ..ChatConfig::default()
        },
    ));

    Arc::new(AppState {
        market_data,
        kucoin,
        binance,
        assistant,
    })
}
