//! Fetcher configuration, loaded from environment variables.

use std::time::Duration;

use market_cache::DEFAULT_TTL;
use market_core::{DataError, IndicatorSettings, Result};
use tracing::warn;

/// Environment variable holding the CoinMarketCap API key.
pub const CMC_API_KEY_ENV: &str = market_cmc::API_KEY_ENV;
/// Environment variable holding the TAAPI.io secret.
pub const TAAPI_SECRET_ENV: &str = market_taapi::SECRET_ENV;
/// Environment variable overriding the cache TTL, in seconds.
pub const CACHE_TTL_ENV: &str = "MARKET_CACHE_TTL_SECS";
/// Environment variable overriding the HTTP request timeout, in seconds.
pub const HTTP_TIMEOUT_ENV: &str = "MARKET_HTTP_TIMEOUT_SECS";

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Complete fetcher configuration.
#[derive(Clone)]
pub struct FetcherConfig {
    cmc_api_key: String,
    taapi_secret: String,
    /// How long a fetched value is served from cache.
    pub ttl: Duration,
    /// Per-request timeout for provider HTTP calls.
    pub request_timeout: Duration,
    /// Market the moving averages are computed over.
    pub indicator: IndicatorSettings,
}

impl std::fmt::Debug for FetcherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetcherConfig")
            .field("cmc_api_key", &"[REDACTED]")
            .field("taapi_secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .field("request_timeout", &self.request_timeout)
            .field("indicator", &self.indicator)
            .finish()
    }
}

impl FetcherConfig {
    /// Create a configuration with the given credentials and default settings.
    #[must_use]
    pub fn new(cmc_api_key: impl Into<String>, taapi_secret: impl Into<String>) -> Self {
        Self {
            cmc_api_key: cmc_api_key.into(),
            taapi_secret: taapi_secret.into(),
            ttl: DEFAULT_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            indicator: IndicatorSettings::default(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// `CMC_API_KEY` and `TAAPI_SECRET` are required. `MARKET_CACHE_TTL_SECS`,
    /// `MARKET_HTTP_TIMEOUT_SECS`, `TAAPI_EXCHANGE`, `TAAPI_SYMBOL` and
    /// `TAAPI_INTERVAL` are optional.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingCredential`] if a required variable is
    /// missing or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| DataError::MissingCredential(key.to_string()))
        };

        let mut config = Self::new(required(CMC_API_KEY_ENV)?, required(TAAPI_SECRET_ENV)?);

        config.ttl = parse_duration_secs(&lookup, CACHE_TTL_ENV, config.ttl);
        config.request_timeout =
            parse_duration_secs(&lookup, HTTP_TIMEOUT_ENV, config.request_timeout);

        if let Some(exchange) = lookup("TAAPI_EXCHANGE") {
            config.indicator.exchange = exchange;
        }
        if let Some(symbol) = lookup("TAAPI_SYMBOL") {
            config.indicator.symbol = symbol;
        }
        if let Some(interval) = lookup("TAAPI_INTERVAL") {
            config.indicator.interval = interval;
        }

        Ok(config)
    }

    /// The CoinMarketCap API key.
    #[must_use]
    pub fn cmc_api_key(&self) -> &str {
        &self.cmc_api_key
    }

    /// The TAAPI.io secret.
    #[must_use]
    pub fn taapi_secret(&self) -> &str {
        &self.taapi_secret
    }
}

/// Parse a positive whole number of seconds, falling back to `default` when
/// unset, invalid or zero.
fn parse_duration_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Duration {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => {
            warn!(key, "Duration must be positive, using default");
            default
        }
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => {
            warn!(key, value = %raw, "Invalid duration, using default");
            default
        }
    }
}
