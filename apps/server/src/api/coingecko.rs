//! CoinGecko market data routes.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::main_lib::AppState;
use cryptodash_market_data::{CoinData, GlobalMarketData, TrendingCoin};

fn default_vs_currency() -> String {
    "usd".to_string()
}

#[derive(Deserialize)]
pub struct CoinQuery {
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
}

pub async fn get_coin(
    Path(coin_id): Path<String>,
    Query(query): Query<CoinQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CoinData>> {
    let coin = state
        .market_data
        .get_coin_data(&coin_id, &query.vs_currency)
        .await?;
    Ok(Json(coin))
}

#[derive(Serialize)]
pub struct TrendingBody {
    pub coins: Vec<TrendingCoin>,
}

pub async fn get_trending(State(state): State<Arc<AppState>>) -> ApiResult<Json<TrendingBody>> {
    let coins = state.market_data.get_trending_coins().await?;
    Ok(Json(TrendingBody { coins }))
}

pub async fn get_global(State(state): State<Arc<AppState>>) -> ApiResult<Json<GlobalMarketData>> {
    let global = state.market_data.get_global_data().await?;
    Ok(Json(global))
}
