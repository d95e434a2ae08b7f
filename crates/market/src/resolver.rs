//! Mapping from data types to the sources that fetch them.

use std::fmt::Debug;
use std::sync::Arc;

use market_cmc::CoinMarketCapProvider;
use market_core::{DataType, IndicatorProvider, MarketCapProvider, Result, Source};
use market_taapi::TaapiProvider;
use tracing::debug;

use crate::config::FetcherConfig;
use crate::sources::{AggregateCapSource, CapKind, MovingAverageSource, PriceSource};

/// Picks the [`Source`] responsible for a data type.
pub trait SourceResolver: Send + Sync + Debug {
    /// Whether this resolver can build a source for `data_type`.
    ///
    /// Checked before the cache is read; an unsupported data type is
    /// rejected even when a cached entry exists for it.
    fn supports(&self, _data_type: DataType) -> bool {
        true
    }

    /// Builds the source for `data_type` with its parameters bound.
    ///
    /// # Errors
    /// Returns [`DataError::UnsupportedDataType`](market_core::DataError::UnsupportedDataType)
    /// if this resolver has no source for `data_type`.
    fn resolve(&self, data_type: DataType) -> Result<Box<dyn Source>>;
}

/// Candles averaged for [`DataType::Ma50`].
pub const MA50_PERIOD: u32 = 50;
/// Candles averaged for [`DataType::Ma200`].
pub const MA200_PERIOD: u32 = 200;

/// Moving-average period bound to a data type, if it is a moving average.
#[must_use]
pub const fn moving_average_period(data_type: DataType) -> Option<u32> {
    match data_type {
        DataType::Ma50 => Some(MA50_PERIOD),
        DataType::Ma200 => Some(MA200_PERIOD),
        DataType::BtcPrice | DataType::TotalMarketCap | DataType::StablecoinMarketCap => None,
    }
}

/// Resolver backed by a market cap provider and an indicator provider.
///
/// | Data type | Source | Provider |
/// |---|---|---|
/// | `btc_price` | [`PriceSource`] | market cap |
/// | `total_market_cap` | [`AggregateCapSource`] (total) | market cap |
/// | `stablecoin_market_cap` | [`AggregateCapSource`] (stablecoin) | market cap |
/// | `ma50` | [`MovingAverageSource`] (period 50) | indicator |
/// | `ma200` | [`MovingAverageSource`] (period 200) | indicator |
#[derive(Debug, Clone)]
pub struct ProviderResolver {
    market_cap: Arc<dyn MarketCapProvider>,
    indicators: Arc<dyn IndicatorProvider>,
}

impl ProviderResolver {
    /// Create a resolver over the given providers.
    #[must_use]
    pub fn new(
        market_cap: Arc<dyn MarketCapProvider>,
        indicators: Arc<dyn IndicatorProvider>,
    ) -> Self {
        Self {
            market_cap,
            indicators,
        }
    }

    /// Create a resolver using CoinMarketCap and TAAPI.io configured from `config`.
    ///
    /// # Errors
    /// Returns [`DataError::MissingCredential`](market_core::DataError::MissingCredential)
    /// if either credential is empty.
    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        let market_cap =
            CoinMarketCapProvider::with_timeout(config.cmc_api_key(), config.request_timeout)?;
        let indicators = TaapiProvider::with_timeout(config.taapi_secret(), config.request_timeout)?
            .with_settings(config.indicator.clone());

        Ok(Self::new(Arc::new(market_cap), Arc::new(indicators)))
    }

    fn moving_average(&self, data_type: DataType, period: u32) -> Box<dyn Source> {
        Box::new(MovingAverageSource::new(
            self.indicators.clone(),
            data_type,
            period,
        ))
    }
}

impl SourceResolver for ProviderResolver {
    fn resolve(&self, data_type: DataType) -> Result<Box<dyn Source>> {
        let source: Box<dyn Source> = match data_type {
            DataType::BtcPrice => Box::new(PriceSource::new(self.market_cap.clone())),
            DataType::TotalMarketCap => Box::new(AggregateCapSource::new(
                self.market_cap.clone(),
                CapKind::Total,
            )),
            DataType::StablecoinMarketCap => Box::new(AggregateCapSource::new(
                self.market_cap.clone(),
                CapKind::Stablecoin,
            )),
            DataType::Ma50 => self.moving_average(DataType::Ma50, MA50_PERIOD),
            DataType::Ma200 => self.moving_average(DataType::Ma200, MA200_PERIOD),
        };
        debug!(data_type = %data_type, ?source, "Resolved source");
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::tests::{FakeIndicators, FakeMarketCap};
    use market_core::currency_metadata;

    fn resolver() -> (ProviderResolver, Arc<FakeIndicators>) {
        let indicators = Arc::new(FakeIndicators::default());
        let resolver =
            ProviderResolver::new(Arc::new(FakeMarketCap { fail: false }), indicators.clone());
        (resolver, indicators)
    }

    #[test]
    fn test_moving_average_periods() {
        assert_eq!(moving_average_period(DataType::Ma50), Some(50));
        assert_eq!(moving_average_period(DataType::Ma200), Some(200));
        assert_eq!(moving_average_period(DataType::BtcPrice), None);
    }

    #[tokio::test]
    async fn test_every_data_type_resolves_to_matching_result() {
        let (resolver, _) = resolver();

        for data_type in DataType::ALL {
            let source = resolver.resolve(data_type).unwrap();
            let result = source.fetch().await.unwrap();
            assert_eq!(result.data_type(), data_type);
        }
    }

    #[tokio::test]
    async fn test_routing_to_providers() {
        let (resolver, indicators) = resolver();

        let price = resolver.resolve(DataType::BtcPrice).unwrap().fetch().await.unwrap();
        assert_eq!(price.provider(), "fake-cap");
        assert_eq!(price.metadata(), Some(&currency_metadata("USD")));

        let stable = resolver
            .resolve(DataType::StablecoinMarketCap)
            .unwrap()
            .fetch()
            .await
            .unwrap();
        assert_eq!(stable.value(), 2.05e11);

        let ma50 = resolver.resolve(DataType::Ma50).unwrap().fetch().await.unwrap();
        assert_eq!(ma50.provider(), "fake-ta");
        assert_eq!(ma50.value(), 60_050.0);
        assert_eq!(ma50.metadata().unwrap()["period"], 50);

        resolver.resolve(DataType::Ma200).unwrap().fetch().await.unwrap();
        assert_eq!(*indicators.periods.lock().unwrap(), vec![50, 200]);
    }

    #[test]
    fn test_provider_resolver_supports_every_type() {
        let (resolver, _) = resolver();
        assert!(DataType::ALL.into_iter().all(|t| resolver.supports(t)));
    }

    #[test]
    fn test_resolve_does_not_fetch() {
        let (resolver, indicators) = resolver();
        resolver.resolve(DataType::Ma200).unwrap();
        assert!(indicators.periods.lock().unwrap().is_empty());
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = FetcherConfig::new("", "secret");
        assert!(ProviderResolver::from_config(&config).is_err());

        let config = FetcherConfig::new("key", "secret");
        assert!(ProviderResolver::from_config(&config).is_ok());
    }
}
