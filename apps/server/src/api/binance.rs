//! Binance account routes.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::error::ApiResult;
use crate::main_lib::AppState;
use cryptodash_exchange::{BinanceBalance, BinanceTransaction};

pub async fn get_balances(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<BinanceBalance>>> {
    let balances = state.binance.get_account_balances().await?;
    Ok(Json(balances))
}

pub async fn get_deposits(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<BinanceTransaction>>> {
    let deposits = state.binance.get_deposit_history().await?;
    Ok(Json(deposits))
}

pub async fn get_withdrawals(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<BinanceTransaction>>> {
    let withdrawals = state.binance.get_withdrawal_history().await?;
    Ok(Json(withdrawals))
}
