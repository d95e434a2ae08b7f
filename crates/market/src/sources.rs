//! Source implementations, one per fetch strategy.
//!
//! Each source calls exactly one provider getter and wraps the value into a
//! [`DataResult`] tagged with the provider's name.

use std::sync::Arc;

use async_trait::async_trait;
use market_core::{
    DataResult, DataType, IndicatorProvider, MarketCapProvider, Metadata, Result, Source,
    currency_metadata,
};

/// Currency every price and market cap value is quoted in.
const QUOTE_CURRENCY: &str = "USD";

/// BTC spot price from a market cap provider.
#[derive(Debug)]
pub struct PriceSource {
    provider: Arc<dyn MarketCapProvider>,
}

impl PriceSource {
    /// Create a price source backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn MarketCapProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Source for PriceSource {
    async fn fetch(&self) -> Result<DataResult> {
        let value = self.provider.spot_price().await?;
        Ok(
            DataResult::new(DataType::BtcPrice, value, self.provider.name())
                .with_metadata(currency_metadata(QUOTE_CURRENCY)),
        )
    }
}

/// Which aggregate market capitalization to fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapKind {
    /// Every tracked cryptocurrency.
    Total,
    /// Stablecoins only.
    Stablecoin,
}

impl CapKind {
    /// The data type values of this kind are reported as.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Total => DataType::TotalMarketCap,
            Self::Stablecoin => DataType::StablecoinMarketCap,
        }
    }
}

/// Aggregate market capitalization from a market cap provider.
#[derive(Debug)]
pub struct AggregateCapSource {
    provider: Arc<dyn MarketCapProvider>,
    kind: CapKind,
}

impl AggregateCapSource {
    /// Create a source for the given aggregate.
    #[must_use]
    pub fn new(provider: Arc<dyn MarketCapProvider>, kind: CapKind) -> Self {
        Self { provider, kind }
    }

    /// The aggregate this source fetches.
    #[must_use]
    pub const fn kind(&self) -> CapKind {
        self.kind
    }
}

#[async_trait]
impl Source for AggregateCapSource {
    async fn fetch(&self) -> Result<DataResult> {
        let value = match self.kind {
            CapKind::Total => self.provider.total_market_cap().await?,
            CapKind::Stablecoin => self.provider.stablecoin_market_cap().await?,
        };
        Ok(
            DataResult::new(self.kind.data_type(), value, self.provider.name())
                .with_metadata(currency_metadata(QUOTE_CURRENCY)),
        )
    }
}

/// Moving average over a fixed number of candles.
///
/// Results carry the period and the provider's market settings
/// (exchange, symbol, interval) as metadata.
#[derive(Debug)]
pub struct MovingAverageSource {
    provider: Arc<dyn IndicatorProvider>,
    data_type: DataType,
    period: u32,
}

impl MovingAverageSource {
    /// Create a source reporting `period`-candle averages as `data_type`.
    #[must_use]
    pub fn new(provider: Arc<dyn IndicatorProvider>, data_type: DataType, period: u32) -> Self {
        Self {
            provider,
            data_type,
            period,
        }
    }

    /// Number of candles averaged.
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    fn metadata(&self) -> Metadata {
        let settings = self.provider.settings();
        let mut metadata = Metadata::new();
        metadata.insert("period".to_string(), self.period.into());
        metadata.insert("exchange".to_string(), settings.exchange.clone().into());
        metadata.insert("symbol".to_string(), settings.symbol.clone().into());
        metadata.insert("interval".to_string(), settings.interval.clone().into());
        metadata
    }
}

#[async_trait]
impl Source for MovingAverageSource {
    async fn fetch(&self) -> Result<DataResult> {
        let value = self.provider.moving_average(self.period).await?;
        Ok(
            DataResult::new(self.data_type, value, self.provider.name())
                .with_metadata(self.metadata()),
        )
    }
}
