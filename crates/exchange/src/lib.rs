//! Signed exchange API adapters (KuCoin and Binance).
//!
//! Each client is constructed with an immutable credential set and hides
//! one exchange's signing scheme, URL shape and response envelope behind
//! a small set of read-only operations. Missing credentials fail before
//! any request is built; a signed call is never attempted without them.

pub mod binance;
pub mod error;
pub mod kucoin;

pub use binance::{
    BinanceBalance, BinanceClient, BinanceCredentials, BinanceTransaction, DEFAULT_BINANCE_URL,
};
pub use error::ExchangeError;
pub use kucoin::{
    KuCoinAccount, KuCoinClient, KuCoinCredentials, KuCoinKeyInfo, DEFAULT_KUCOIN_URL,
};
