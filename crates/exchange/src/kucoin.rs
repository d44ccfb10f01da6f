//! KuCoin signed API adapter.
//!
//! Implements the v2 signing scheme: the passphrase itself is
//! HMAC-SHA256 signed with the API secret, and every request carries a
//! base64 signature over `timestamp + METHOD + path + body`. Signatures
//! are time-dependent and recomputed per call.

use hmac::{Hmac, Mac};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::ExchangeError;

type HmacSha256 = Hmac<Sha256>;

/// Default KuCoin REST API base URL.
pub const DEFAULT_KUCOIN_URL: &str = "https://api.kucoin.com";

const PROVIDER: &str = "KuCoin";

/// KuCoin envelope codes that indicate a credential problem.
const AUTH_ERROR_CODES: &[&str] = &["400003", "400004", "400005", "400006", "400007", "401000"];

/// Immutable KuCoin credential set, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct KuCoinCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub api_passphrase: String,
}

impl KuCoinCredentials {
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty() && !self.api_passphrase.is_empty()
    }
}

/// HMAC-SHA256 sign `plain` with `key`, base64 encoded.
fn sign(plain: &[u8], key: &[u8]) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ExchangeError::ApiRequestFailed(format!("invalid HMAC key: {}", e)))?;
    mac.update(plain);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Per-request signer for the v2 key scheme.
struct KcSigner {
    api_key: String,
    api_secret: String,
    /// Passphrase pre-signed with the secret, as required by key version 2.
    api_passphrase: String,
}

impl KcSigner {
    fn new(credentials: &KuCoinCredentials) -> Result<Self, ExchangeError> {
        let api_passphrase = sign(
            credentials.api_passphrase.as_bytes(),
            credentials.api_secret.as_bytes(),
        )?;
        Ok(Self {
            api_key: credentials.api_key.clone(),
            api_secret: credentials.api_secret.clone(),
            api_passphrase,
        })
    }

    /// Build the signed header set for one request payload
    /// (`METHOD + path_with_query + body`).
    fn headers(&self, payload: &str) -> Result<Vec<(&'static str, String)>, ExchangeError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ExchangeError::ApiRequestFailed(format!("timestamp error: {}", e)))?
            .as_millis()
            .to_string();
        let signature = sign(
            format!("{}{}", timestamp, payload).as_bytes(),
            self.api_secret.as_bytes(),
        )?;

        Ok(vec![
            ("KC-API-KEY", self.api_key.clone()),
            ("KC-API-PASSPHRASE", self.api_passphrase.clone()),
            ("KC-API-TIMESTAMP", timestamp),
            ("KC-API-SIGN", signature),
            ("KC-API-KEY-VERSION", "2".to_string()),
        ])
    }
}

// ============================================================================
// Response structures and normalized shapes
// ============================================================================

/// KuCoin wraps every payload in `{code, msg?, data?}`; `"200000"` is success.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct Envelope<T> {
    code: String,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    id: String,
    currency: String,
    #[serde(rename = "type")]
    account_type: String,
    balance: String,
    available: String,
    holds: String,
}

/// One KuCoin account with amounts parsed out of the upstream strings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KuCoinAccount {
    pub id: String,
    pub currency: String,
    pub account_type: String,
    pub balance: f64,
    pub available: f64,
    pub holds: f64,
}

impl From<RawAccount> for KuCoinAccount {
    fn from(raw: RawAccount) -> Self {
        KuCoinAccount {
            id: raw.id,
            currency: raw.currency,
            account_type: raw.account_type,
            balance: raw.balance.parse().unwrap_or(0.0),
            available: raw.available.parse().unwrap_or(0.0),
            holds: raw.holds.parse().unwrap_or(0.0),
        }
    }
}

/// Metadata about the API key in use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KuCoinKeyInfo {
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(alias = "apiKey")]
    pub api_key: String,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default, alias = "ipWhitelist")]
    pub ip_whitelist: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<i64>,
}

// ============================================================================
// KuCoinClient implementation
// ============================================================================

/// KuCoin API client for read-only account operations.
pub struct KuCoinClient {
    credentials: KuCoinCredentials,
    client: Client,
    base_url: String,
}

impl KuCoinClient {
    /// Create a client against the public KuCoin API.
    pub fn new(credentials: KuCoinCredentials, timeout: Duration) -> Self {
        Self::with_base_url(credentials, DEFAULT_KUCOIN_URL, timeout)
    }

    /// Create a client against a specific base URL (used by tests).
    pub fn with_base_url(
        credentials: KuCoinCredentials,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            credentials,
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn signer(&self) -> Result<KcSigner, ExchangeError> {
        if !self.credentials.is_complete() {
            return Err(ExchangeError::MissingCredentials(PROVIDER));
        }
        KcSigner::new(&self.credentials)
    }

    /// Send a signed GET for `raw_path` (path including any query string)
    /// and unwrap the response envelope.
    async fn signed_get<T: DeserializeOwned>(&self, raw_path: &str) -> Result<T, ExchangeError> {
        let signer = self.signer()?;
        let headers = signer.headers(&format!("GET{}", raw_path))?;

        let url = format!("{}{}", self.base_url, raw_path);
        debug!("{} request: GET {}", PROVIDER, raw_path);

        let mut request = self.client.get(&url).header("Content-Type", "application/json");
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ExchangeError::Timeout(PROVIDER)
            } else {
                ExchangeError::ApiRequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::ApiRequestFailed(e.to_string()))?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ExchangeError::Unauthorized(format!("HTTP {}: {}", status, body)));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ExchangeError::RateLimited(PROVIDER));
        }
        if !status.is_success() {
            return Err(ExchangeError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        if envelope.code == "200000" {
            envelope
                .data
                .ok_or_else(|| ExchangeError::InvalidApiResponse("missing data field".into()))
        } else {
            Err(envelope_error(&envelope.code, envelope.msg.as_deref()))
        }
    }

    /// Get all accounts, optionally filtered by currency and account type.
    pub async fn get_accounts(
        &self,
        currency: Option<&str>,
        account_type: Option<&str>,
    ) -> Result<Vec<KuCoinAccount>, ExchangeError> {
        let raw_path = accounts_path(currency, account_type);
        let raw: Vec<RawAccount> = self.signed_get(&raw_path).await?;
        Ok(raw.into_iter().map(KuCoinAccount::from).collect())
    }

    /// Get metadata about the API key in use.
    pub async fn get_key_info(&self) -> Result<KuCoinKeyInfo, ExchangeError> {
        self.signed_get("/api/v1/user/api-key").await
    }
}

/// Build the accounts path with optional filters. Values are
/// percent-encoded: the query string is part of the signed payload, so
/// a stray `&` or `=` in a value would alter what gets signed.
fn accounts_path(currency: Option<&str>, account_type: Option<&str>) -> String {
    let path = "/api/v1/accounts";

    let mut query = Vec::new();
    if let Some(currency) = currency {
        query.push(format!("currency={}", urlencoding::encode(currency)));
    }
    if let Some(account_type) = account_type {
        query.push(format!("type={}", urlencoding::encode(account_type)));
    }
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}

/// Classify a non-success envelope code.
fn envelope_error(code: &str, msg: Option<&str>) -> ExchangeError {
    let detail = format!("{}: {}", code, msg.unwrap_or("unknown error"));
    if AUTH_ERROR_CODES.contains(&code) {
        ExchangeError::Unauthorized(detail)
    } else {
        ExchangeError::ApiRequestFailed(detail)
    }
}

// ============================================================================
// Tests
// ============================================================================
