//! Crypto dashboard HTTP gateway.
//!
//! Thin backend that forwards requests to CoinGecko, KuCoin, Binance
//! and an OpenAI-compatible chat model, reshaping the responses into a
//! uniform JSON contract.

pub mod api;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{build_state, init_tracing, AppState};
