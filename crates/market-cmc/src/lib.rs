#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! CoinMarketCap data provider.
//!
//! This crate implements [`MarketCapProvider`] for the
//! [CoinMarketCap Pro](https://coinmarketcap.com/api/) API:
//!
//! - BTC spot price from `/v1/cryptocurrency/quotes/latest`
//! - Total and stablecoin market capitalization from `/v1/global-metrics/quotes/latest`
//!
//! # Usage
//!
//! ```rust,ignore
//! use market_cmc::CoinMarketCapProvider;
//! use market_core::MarketCapProvider;
//!
//! #[tokio::main]
//! async fn main() -> market_core::Result<()> {
//!     let provider = CoinMarketCapProvider::from_env()?;
//!     let price = provider.spot_price().await?;
//!     println!("BTC: ${price:.2}");
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use market_core::{DataError, DataProvider, MarketCapProvider, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Base URL for the CoinMarketCap Pro API.
const CMC_BASE_URL: &str = "https://pro-api.coinmarketcap.com";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "CMC_API_KEY";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider name recorded on every result.
const PROVIDER_NAME: &str = "coinmarketcap";

/// Quote currency for every request.
const CONVERT: &str = "USD";

/// CoinMarketCap data provider.
///
/// Provides access to:
/// - BTC spot price
/// - Total crypto market capitalization
/// - Total stablecoin market capitalization
#[derive(Clone)]
pub struct CoinMarketCapProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for CoinMarketCapProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinMarketCapProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl CoinMarketCapProvider {
    /// Create a new provider with the given API key and the default timeout.
    ///
    /// # Errors
    /// Returns [`DataError::MissingCredential`] if `api_key` is empty, or
    /// [`DataError::Other`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create a new provider with a custom request timeout.
    ///
    /// # Errors
    /// See [`CoinMarketCapProvider::new`].
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Other(format!("Failed to build HTTP client: {e}")))?;
        Self::with_client(client, api_key)
    }

    /// Create a new provider with a custom HTTP client.
    ///
    /// # Errors
    /// Returns [`DataError::MissingCredential`] if `api_key` is empty.
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DataError::MissingCredential(API_KEY_ENV.to_string()));
        }
        Ok(Self {
            client,
            base_url: CMC_BASE_URL.to_string(),
            api_key,
        })
    }

    /// Create a new provider from the `CMC_API_KEY` environment variable.
    ///
    /// # Errors
    /// Returns [`DataError::MissingCredential`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| DataError::MissingCredential(API_KEY_ENV.to_string()))?;
        Self::new(api_key)
    }

    /// Point the provider at a different API host (e.g. the sandbox).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the full URL for an endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make an authenticated GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("CoinMarketCap request: {}", path);

        let response = self
            .client
            .get(self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
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

        serde_json::from_str(&text).map_err(|e| DataError::Parse(format!("{e}: {text}")))
    }

    async fn global_quote(&self) -> Result<GlobalQuote> {
        let response: GlobalMetricsResponse = self
            .get("v1/global-metrics/quotes/latest", &[("convert", CONVERT)])
            .await?;
        response.into_quote()
    }
}

impl DataProvider for CoinMarketCapProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "CoinMarketCap - Cryptocurrency prices and global market metrics"
    }
}

#[async_trait]
impl MarketCapProvider for CoinMarketCapProvider {
    async fn spot_price(&self) -> Result<f64> {
        let response: QuotesLatestResponse = self
            .get(
                "v1/cryptocurrency/quotes/latest",
                &[("symbol", "BTC"), ("convert", CONVERT)],
            )
            .await?;
        response.price("BTC")
    }

    async fn total_market_cap(&self) -> Result<f64> {
        Ok(self.global_quote().await?.total_market_cap)
    }

    async fn stablecoin_market_cap(&self) -> Result<f64> {
        Ok(self.global_quote().await?.stablecoin_market_cap)
    }
}

// ============================================================================
// CoinMarketCap API Response Types
// ============================================================================

/// `/v1/cryptocurrency/quotes/latest` response, keyed by symbol.
#[derive(Debug, Deserialize)]
struct QuotesLatestResponse {
    data: HashMap<String, CmcCoin>,
}

impl QuotesLatestResponse {
    fn price(&self, symbol: &str) -> Result<f64> {
        self.data
            .get(symbol)
            .and_then(|coin| coin.quote.get(CONVERT))
            .map(|quote| quote.price)
            .ok_or_else(|| DataError::Parse(format!("No {CONVERT} quote for {symbol}")))
    }
}

#[derive(Debug, Deserialize)]
struct CmcCoin {
    quote: HashMap<String, CoinQuote>,
}

#[derive(Debug, Deserialize)]
struct CoinQuote {
    price: f64,
}

/// `/v1/global-metrics/quotes/latest` response.
#[derive(Debug, Deserialize)]
struct GlobalMetricsResponse {
    data: GlobalMetrics,
}

impl GlobalMetricsResponse {
    fn into_quote(mut self) -> Result<GlobalQuote> {
        self.data
            .quote
            .remove(CONVERT)
            .ok_or_else(|| DataError::Parse(format!("No {CONVERT} quote in global metrics")))
    }
}

#[derive(Debug, Deserialize)]
struct GlobalMetrics {
    quote: HashMap<String, GlobalQuote>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    total_market_cap: f64,
    stablecoin_market_cap: f64,
}
