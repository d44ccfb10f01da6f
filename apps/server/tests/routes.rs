use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cryptodash_exchange::{BinanceCredentials, KuCoinCredentials};
use cryptodash_server::{api::app_router, build_state, config::Config};

/// Config pointing every upstream at `upstream_url`, with no exchange
/// credentials and no OpenAI key.
fn test_config(upstream_url: &str) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
        upstream_timeout: Duration::from_secs(2),
        coingecko_url: upstream_url.to_string(),
        kucoin_url: upstream_url.to_string(),
        binance_url: upstream_url.to_string(),
        kucoin_credentials: KuCoinCredentials::default(),
        binance_credentials: BinanceCredentials::default(),
        openai_api_key: None,
    }
}

fn router_for(config: &Config) -> axum::Router {
    app_router(build_state(config), config)
}

async fn get(app: axum::Router, uri: &str) -> (u16, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn healthz_answers_ok() {
    let app = router_for(&test_config("http://127.0.0.1:9"));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn coin_route_reshapes_the_upstream_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/bitcoin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "bitcoin",
            "name": "Bitcoin",
            "symbol": "btc",
            "market_data": {
                "current_price": {"usd": 67512.0},
                "market_cap": {"usd": 1331234567890.0},
                "total_volume": {"usd": 28123456789.0},
                "high_24h": {"usd": 68450.0},
                "low_24h": {"usd": 66120.0},
                "market_cap_rank": 1
            }
        })))
        .mount(&server)
        .await;

    let app = router_for(&test_config(&server.uri()));
    let (status, body) = get(app, "/api/v1/coingecko/coin/bitcoin").await;

    assert_eq!(status, 200);
    assert_eq!(body["name"], "Bitcoin");
    assert_eq!(body["current_price"], 67512.0);
    assert_eq!(body["volume_24h"], 28123456789.0);
    assert_eq!(body["market_cap_rank"], 1);
}

#[tokio::test]
async fn unknown_coin_maps_to_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/not-a-coin"))
        .respond_with(ResponseTemplate::new(404).set_body_string("coin not found"))
        .mount(&server)
        .await;

    let app = router_for(&test_config(&server.uri()));
    let (status, body) = get(app, "/api/v1/coingecko/coin/not-a-coin").await;

    assert_eq!(status, 404);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn trending_route_wraps_the_coins_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "coins": [
                {"item": {"id": "pepe", "name": "Pepe", "symbol": "PEPE", "market_cap_rank": 38, "score": 0}},
                {"item": {"id": "solana", "name": "Solana", "symbol": "SOL", "market_cap_rank": 5, "score": 1}}
            ]
        })))
        .mount(&server)
        .await;

    let app = router_for(&test_config(&server.uri()));
    let (status, body) = get(app, "/api/v1/coingecko/trending").await;

    assert_eq!(status, 200);
    let coins = body["coins"].as_array().unwrap();
    assert_eq!(coins.len(), 2);
    assert_eq!(coins[0]["id"], "pepe");
    assert_eq!(coins[1]["symbol"], "SOL");
}

#[tokio::test]
async fn upstream_failure_maps_to_502() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/global"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let app = router_for(&test_config(&server.uri()));
    let (status, body) = get(app, "/api/v1/coingecko/global").await;

    assert_eq!(status, 502);
    assert_eq!(body["code"], 502);
}

#[tokio::test]
async fn missing_exchange_credentials_map_to_401_without_an_upstream_call() {
    let server = MockServer::start().await;
    // No mocks mounted: any forwarded request would 404 and surface as
    // a different status than the 401 asserted here.

    let app = router_for(&test_config(&server.uri()));
    let (status, body) = get(app.clone(), "/api/v1/kucoin/accounts").await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], 401);

    let (status, _) = get(app.clone(), "/api/v1/kucoin/key-info").await;
    assert_eq!(status, 401);

    let (status, _) = get(app.clone(), "/api/v1/binance/balance").await;
    assert_eq!(status, 401);

    let (status, _) = get(app, "/api/v1/binance/withdrawals").await;
    assert_eq!(status, 401);

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn binance_balance_route_forwards_signed_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "balances": [
                {"asset": "BTC", "free": "0.25", "locked": "0"},
                {"asset": "DOGE", "free": "0", "locked": "0"}
            ]
        })))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.binance_credentials = BinanceCredentials {
        api_key: "key".to_string(),
        api_secret: "secret".to_string(),
    };

    let app = router_for(&config);
    let (status, body) = get(app, "/api/v1/binance/balance").await;

    assert_eq!(status, 200);
    let balances = body.as_array().unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0]["asset"], "BTC");
    assert_eq!(balances[0]["free"], 0.25);
}

#[tokio::test]
async fn chatbot_without_key_answers_200_with_canned_reply() {
    let app = router_for(&test_config("http://127.0.0.1:9"));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/chatbot")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"message": "What is Bitcoin?"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["response"], cryptodash_ai::FALLBACK_NO_KEY);
}

#[tokio::test]
async fn chatbot_with_stalled_completion_still_answers_200() {
    // Key configured, but the upstream budget is too small for any
    // completion round trip. The route must absorb the failure into the
    // error reply rather than let the request timeout layer answer.
    let mut config = test_config("http://127.0.0.1:9");
    config.openai_api_key = Some("test-key".to_string());
    config.upstream_timeout = Duration::from_millis(1);

    let app = router_for(&config);
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/chatbot")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"message": "What is Bitcoin?"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["response"], cryptodash_ai::FALLBACK_ERROR);
}

#[tokio::test]
async fn chatbot_missing_message_field_is_rejected_with_422() {
    let app = router_for(&test_config("http://127.0.0.1:9"));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/chatbot")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"user_id": "alice"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 422);
}
