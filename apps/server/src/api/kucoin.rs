//! KuCoin account routes.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::main_lib::AppState;
use cryptodash_exchange::{KuCoinAccount, KuCoinKeyInfo};

#[derive(Deserialize)]
pub struct AccountsQuery {
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

pub async fn get_accounts(
    Query(query): Query<AccountsQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<KuCoinAccount>>> {
    let accounts = state
        .kucoin
        .get_accounts(query.currency.as_deref(), query.account_type.as_deref())
        .await?;
    Ok(Json(accounts))
}

pub async fn get_key_info(State(state): State<Arc<AppState>>) -> ApiResult<Json<KuCoinKeyInfo>> {
    let info = state.kucoin.get_key_info().await?;
    Ok(Json(info))
}
