use std::{net::SocketAddr, time::Duration};

use cryptodash_exchange::{
    BinanceCredentials, KuCoinCredentials, DEFAULT_BINANCE_URL, DEFAULT_KUCOIN_URL,
};
use cryptodash_market_data::DEFAULT_COINGECKO_URL;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Per-call timeout for upstream provider requests.
    pub upstream_timeout: Duration,
    pub coingecko_url: String,
    pub kucoin_url: String,
    pub binance_url: String,
    pub kucoin_credentials: KuCoinCredentials,
    pub binance_credentials: BinanceCredentials,
    pub openai_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("CD_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid CD_LISTEN_ADDR");
        let cors_allow = std::env::var("CD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let request_timeout_ms: u64 = std::env::var("CD_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let upstream_timeout_ms: u64 = std::env::var("CD_UPSTREAM_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".into())
            .parse()
            .unwrap_or(10000);

        let coingecko_url =
            std::env::var("COINGECKO_API_URL").unwrap_or_else(|_| DEFAULT_COINGECKO_URL.into());
        let kucoin_url =
            std::env::var("KUCOIN_API_URL").unwrap_or_else(|_| DEFAULT_KUCOIN_URL.into());
        let binance_url =
            std::env::var("BINANCE_API_URL").unwrap_or_else(|_| DEFAULT_BINANCE_URL.into());

        let kucoin_credentials = KuCoinCredentials {
            api_key: std::env::var("KUCOIN_API_KEY").unwrap_or_default(),
            api_secret: std::env::var("KUCOIN_API_SECRET").unwrap_or_default(),
            api_passphrase: std::env::var("KUCOIN_API_PASSPHRASE").unwrap_or_default(),
        };
        let binance_credentials = BinanceCredentials {
            api_key: std::env::var("BINANCE_API_KEY").unwrap_or_default(),
            api_secret: std::env::var("BINANCE_API_SECRET").unwrap_or_default(),
        };
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(request_timeout_ms),
            upstream_timeout: Duration::from_millis(upstream_timeout_ms),
            coingecko_url,
            kucoin_url,
            binance_url,
            kucoin_credentials,
            binance_credentials,
            openai_api_key,
        }
    }
}
