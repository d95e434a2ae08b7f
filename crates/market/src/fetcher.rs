//! Cached fetch facade.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures::future::try_join_all;
use market_cache::MetricCache;
use market_core::{DataError, DataResult, DataType, Result};
use tracing::{debug, instrument};

use crate::config::FetcherConfig;
use crate::resolver::{ProviderResolver, SourceResolver};

/// Cache shared by every fetcher built with [`DataFetcher::from_env`].
fn process_cache(ttl: Duration) -> Arc<MetricCache> {
    static CACHE: OnceLock<Arc<MetricCache>> = OnceLock::new();
    Arc::clone(CACHE.get_or_init(|| Arc::new(MetricCache::with_ttl(ttl))))
}

/// Entry point for fetching market metrics.
///
/// A fetcher serves a cached value while it is younger than the cache TTL
/// and otherwise resolves a source, fetches, and stores the fresh value.
/// Provider errors are returned unchanged and never cached.
///
/// The cache is shared, not owned: every fetcher built over the same
/// `Arc<MetricCache>` (including clones of a fetcher) sees the same entries.
///
/// # Example
///
/// ```rust,ignore
/// use market::{DataFetcher, DataType};
///
/// #[tokio::main]
/// async fn main() -> market::Result<()> {
///     let fetcher = DataFetcher::from_env()?;
///
///     let price = fetcher.get(DataType::BtcPrice).await?;
///     println!("{}", price.to_json());
///
///     for (data_type, result) in fetcher.get_all().await? {
///         println!("{data_type}: {}", result.value());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DataFetcher {
    resolver: Arc<dyn SourceResolver>,
    cache: Arc<MetricCache>,
}

impl DataFetcher {
    /// Create a fetcher over an existing resolver and shared cache.
    #[must_use]
    pub fn new(resolver: Arc<dyn SourceResolver>, cache: Arc<MetricCache>) -> Self {
        Self { resolver, cache }
    }

    /// Create a fetcher with CoinMarketCap and TAAPI.io providers and a new
    /// cache using the configured TTL.
    ///
    /// The cache is private to this fetcher and its clones. Use
    /// [`DataFetcher::from_config_with_cache`] to share entries between
    /// independently built fetchers.
    ///
    /// # Errors
    /// Returns [`DataError::MissingCredential`](market_core::DataError::MissingCredential)
    /// if a credential is empty.
    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        Self::from_config_with_cache(config, Arc::new(MetricCache::with_ttl(config.ttl)))
    }

    /// Create a fetcher with CoinMarketCap and TAAPI.io providers over an
    /// existing cache.
    ///
    /// The cache keeps its own TTL; `config.ttl` is not applied to it.
    ///
    /// # Errors
    /// Returns [`DataError::MissingCredential`](market_core::DataError::MissingCredential)
    /// if a credential is empty.
    pub fn from_config_with_cache(
        config: &FetcherConfig,
        cache: Arc<MetricCache>,
    ) -> Result<Self> {
        let resolver = ProviderResolver::from_config(config)?;
        Ok(Self::new(Arc::new(resolver), cache))
    }

    /// Create a fetcher configured from environment variables.
    ///
    /// Every fetcher built this way shares one process-wide cache, created
    /// on first use with the TTL configured at that time.
    ///
    /// # Errors
    /// See [`FetcherConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        let config = FetcherConfig::from_env()?;
        let cache = process_cache(config.ttl);
        Self::from_config_with_cache(&config, cache)
    }

    /// The cache this fetcher reads and writes.
    #[must_use]
    pub fn cache(&self) -> &Arc<MetricCache> {
        &self.cache
    }

    /// Fetch `data_type`, serving the cached value while it is fresh.
    ///
    /// Data types the resolver does not support are rejected before the
    /// cache is read, so a seeded entry is never served for them.
    ///
    /// # Errors
    /// Returns the resolver's or provider's error unchanged.
    #[instrument(skip(self), fields(data_type = %data_type))]
    pub async fn get(&self, data_type: DataType) -> Result<DataResult> {
        if !self.resolver.supports(data_type) {
            return Err(DataError::UnsupportedDataType(data_type.to_string()));
        }
        self.cache
            .get_or_fetch(data_type, || self.fetch_from_source(data_type))
            .await
    }

    async fn fetch_from_source(&self, data_type: DataType) -> Result<DataResult> {
        let source = self.resolver.resolve(data_type)?;
        debug!("Fetching from source");
        source.fetch().await
    }

    /// Fetch a data type by its string identifier (e.g. `"ma200"`).
    ///
    /// # Errors
    /// Returns [`DataError::UnsupportedDataType`](market_core::DataError::UnsupportedDataType)
    /// for an unknown identifier, before the cache or any provider is touched.
    pub async fn get_by_name(&self, name: &str) -> Result<DataResult> {
        let data_type = name.parse::<DataType>()?;
        self.get(data_type).await
    }

    /// Fetch every data type.
    ///
    /// Keys are fetched concurrently; the map iterates in [`DataType::ALL`]
    /// order. Any failure fails the whole call.
    ///
    /// # Errors
    /// Returns the first error encountered.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<BTreeMap<DataType, DataResult>> {
        let results = try_join_all(DataType::ALL.into_iter().map(|data_type| self.get(data_type)))
            .await?;
        Ok(DataType::ALL.into_iter().zip(results).collect())
    }
}
