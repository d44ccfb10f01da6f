use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use cryptodash_exchange::ExchangeError;
use cryptodash_market_data::MarketDataError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    MarketData(#[from] MarketDataError),
    #[error("{0}")]
    Exchange(#[from] ExchangeError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MarketData(e) => match e {
                MarketDataError::NotFound(_) => StatusCode::NOT_FOUND,
                MarketDataError::RateLimited => StatusCode::SERVICE_UNAVAILABLE,
                MarketDataError::Timeout | MarketDataError::Provider(_) => StatusCode::BAD_GATEWAY,
            },
            ApiError::Exchange(e) => match e {
                ExchangeError::MissingCredentials(_) | ExchangeError::Unauthorized(_) => {
                    StatusCode::UNAUTHORIZED
                }
                ExchangeError::RateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
                ExchangeError::Timeout(_)
                | ExchangeError::ApiRequestFailed(_)
                | ExchangeError::InvalidApiResponse(_) => StatusCode::BAD_GATEWAY,
            },
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
