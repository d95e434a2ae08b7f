#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! TAAPI.io technical indicator provider.
//!
//! This crate implements [`IndicatorProvider`] for the
//! [TAAPI.io](https://taapi.io/) REST API. Moving averages are computed over
//! the exchange, symbol and interval in the provider's [`IndicatorSettings`]
//! (Binance `BTC/USDT` daily candles by default).
//!
//! # Usage
//!
//! ```rust,ignore
//! use market_taapi::TaapiProvider;
//! use market_core::IndicatorProvider;
//!
//! #[tokio::main]
//! async fn main() -> market_core::Result<()> {
//!     let provider = TaapiProvider::from_env()?;
//!     let ma200 = provider.moving_average(200).await?;
//!     println!("MA200: {ma200:.2}");
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use market_core::{DataError, DataProvider, IndicatorProvider, IndicatorSettings, Result};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Base URL for the TAAPI.io API.
const TAAPI_BASE_URL: &str = "https://api.taapi.io";

/// Environment variable holding the API secret.
pub const SECRET_ENV: &str = "TAAPI_SECRET";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider name recorded on every result.
const PROVIDER_NAME: &str = "taapi";

/// TAAPI.io indicator provider.
#[derive(Clone)]
pub struct TaapiProvider {
    client: Client,
    base_url: String,
    secret: String,
    settings: IndicatorSettings,
}

impl fmt::Debug for TaapiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaapiProvider")
            .field("base_url", &self.base_url)
            .field("secret", &"[REDACTED]")
            .field("settings", &self.settings)
            .finish()
    }
}

impl TaapiProvider {
    /// Create a new provider with the given secret and the default timeout.
    ///
    /// # Errors
    /// Returns [`DataError::MissingCredential`] if `secret` is empty, or
    /// [`DataError::Other`] if the HTTP client cannot be built.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        Self::with_timeout(secret, DEFAULT_TIMEOUT)
    }

    /// Create a new provider with a custom request timeout.
    ///
    /// # Errors
    /// See [`TaapiProvider::new`].
    pub fn with_timeout(secret: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Other(format!("Failed to build HTTP client: {e}")))?;
        Self::with_client(client, secret)
    }

    /// Create a new provider with a custom HTTP client.
    ///
    /// # Errors
    /// Returns [`DataError::MissingCredential`] if `secret` is empty.
    pub fn with_client(client: Client, secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(DataError::MissingCredential(SECRET_ENV.to_string()));
        }
        Ok(Self {
            client,
            base_url: TAAPI_BASE_URL.to_string(),
            secret,
            settings: IndicatorSettings::default(),
        })
    }

    /// Create a new provider from the `TAAPI_SECRET` environment variable.
    ///
    /// # Errors
    /// Returns [`DataError::MissingCredential`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var(SECRET_ENV)
            .map_err(|_| DataError::MissingCredential(SECRET_ENV.to_string()))?;
        Self::new(secret)
    }

    /// Compute indicators over a different market.
    #[must_use]
    pub fn with_settings(mut self, settings: IndicatorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Point the provider at a different API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Query parameters for an indicator request, secret excluded.
    fn indicator_params(&self, period: u32) -> Vec<(&'static str, String)> {
        vec![
            ("exchange", self.settings.exchange.clone()),
            ("symbol", self.settings.symbol.clone()),
            ("interval", self.settings.interval.clone()),
            ("period", period.to_string()),
        ]
    }
}

impl DataProvider for TaapiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "TAAPI.io - Technical analysis indicators for crypto markets"
    }
}

#[async_trait]
impl IndicatorProvider for TaapiProvider {
    fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    async fn moving_average(&self, period: u32) -> Result<f64> {
        if period == 0 {
            return Err(DataError::Other(
                "Moving average period must be positive".to_string(),
            ));
        }

        debug!(
            period,
            symbol = %self.settings.symbol,
            interval = %self.settings.interval,
            "TAAPI moving average request"
        );

        let response = self
            .client
            .get(format!("{}/ma", self.base_url))
            .query(&[("secret", self.secret.as_str())])
            .query(&self.indicator_params(period))
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DataError::from_http_status(
                PROVIDER_NAME,
                status.as_u16(),
                &text,
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        parse_value(&text)
    }
}

/// Indicator response: `{"value": 61034.25}`.
#[derive(Debug, Deserialize)]
struct IndicatorValue {
    value: f64,
}

fn parse_value(text: &str) -> Result<f64> {
    serde_json::from_str::<IndicatorValue>(text)
        .map(|v| v.value)
        .map_err(|e| DataError::Parse(format!("{e}: {text}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_provider_metadata() {
        let provider = TaapiProvider::new("test_secret").unwrap();
        assert_eq!(provider.name(), "taapi");
        assert!(!provider.description().is_empty());
        assert_eq!(provider.settings(), &IndicatorSettings::default());
    }

    #[test]
    fn test_indicator_params() {
        let provider = TaapiProvider::new("test_secret").unwrap();
        let params = provider.indicator_params(200);
        assert_eq!(
            params,
            vec![
                ("exchange", "binance".to_string()),
                ("symbol", "BTC/USDT".to_string()),
                ("interval", "1d".to_string()),
                ("period", "200".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_settings() {
        let settings = IndicatorSettings {
            exchange: "coinbase".to_string(),
            symbol: "BTC/USD".to_string(),
            interval: "4h".to_string(),
        };
        let provider = TaapiProvider::new("test_secret")
            .unwrap()
            .with_settings(settings.clone());
        assert_eq!(provider.settings(), &settings);
        assert_eq!(provider.indicator_params(50)[2], ("interval", "4h".to_string()));
    }

    #[test]
    fn test_missing_secret_rejected() {
        let err = TaapiProvider::new("").unwrap_err();
        assert!(matches!(err, DataError::MissingCredential(ref var) if var == "TAAPI_SECRET"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let provider = TaapiProvider::new("super_secret_token").unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("super_secret_token"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(r#"{"value": 61034.25}"#).unwrap(), 61034.25);
        assert!(matches!(
            parse_value(r#"{"error": "Invalid symbol"}"#),
            Err(DataError::Parse(_))
        ));
        assert!(matches!(parse_value("not json"), Err(DataError::Parse(_))));
    }

    #[tokio::test]
    async fn test_zero_period_rejected() {
        let provider = TaapiProvider::new("test_secret").unwrap();
        assert!(matches!(
            provider.moving_average(0).await,
            Err(DataError::Other(_))
        ));
    }

    #[tokio::test]
    async fn test_moving_average_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ma"))
            .and(query_param("secret", "test_secret"))
            .and(query_param("exchange", "binance"))
            .and(query_param("symbol", "BTC/USDT"))
            .and(query_param("interval", "1d"))
            .and(query_param("period", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 61034.25})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = TaapiProvider::new("test_secret")
            .unwrap()
            .with_base_url(server.uri());
        assert_eq!(provider.moving_average(200).await.unwrap(), 61034.25);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ma"))
            .and(query_param("period", "50"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ma"))
            .and(query_param("period", "200"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
            .mount(&server)
            .await;

        let provider = TaapiProvider::new("test_secret")
            .unwrap()
            .with_base_url(server.uri());
        assert!(matches!(
            provider.moving_average(50).await,
            Err(DataError::AuthenticationFailed(ref p)) if p == "taapi"
        ));
        assert!(matches!(
            provider.moving_average(200).await,
            Err(DataError::Network(ref msg)) if msg == "HTTP 500: backend down"
        ));
    }
}
