mod binance;
mod chatbot;
mod coingecko;
mod kucoin;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::main_lib::AppState;

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn readyz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/coingecko/coin/{coin_id}", get(coingecko::get_coin))
        .route("/coingecko/trending", get(coingecko::get_trending))
        .route("/coingecko/global", get(coingecko::get_global))
        .route("/kucoin/accounts", get(kucoin::get_accounts))
        .route("/kucoin/key-info", get(kucoin::get_key_info))
        .route("/binance/balance", get(binance::get_balances))
        .route("/binance/deposits", get(binance::get_deposits))
        .route("/binance/withdrawals", get(binance::get_withdrawals))
        .route("/chatbot", post(chatbot::chat))
        .route("/chatbot/", post(chatbot::chat));

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
