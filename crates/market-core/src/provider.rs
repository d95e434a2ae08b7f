//! Provider traits for fetching market metrics.
//!
//! This module defines the collaborator contracts that sources call into:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`MarketCapProvider`] - Spot price and aggregate market capitalization
//! - [`IndicatorProvider`] - Technical indicators such as moving averages

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::Result;

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "coinmarketcap").
    ///
    /// This is the value recorded as [`DataResult::provider`](crate::DataResult::provider).
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for spot price and aggregate market capitalization data.
///
/// All values are denominated in USD.
#[async_trait]
pub trait MarketCapProvider: DataProvider {
    /// Fetches the current BTC spot price.
    async fn spot_price(&self) -> Result<f64>;

    /// Fetches the total crypto market capitalization.
    async fn total_market_cap(&self) -> Result<f64>;

    /// Fetches the total stablecoin market capitalization.
    async fn stablecoin_market_cap(&self) -> Result<f64>;
}

/// Market an indicator provider computes its values over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndicatorSettings {
    /// Exchange the candles come from (e.g., "binance").
    pub exchange: String,
    /// Trading pair (e.g., "BTC/USDT").
    pub symbol: String,
    /// Candle interval (e.g., "1d").
    pub interval: String,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            exchange: "binance".to_string(),
            symbol: "BTC/USDT".to_string(),
            interval: "1d".to_string(),
        }
    }
}

/// Provider for technical indicators.
#[async_trait]
pub trait IndicatorProvider: DataProvider {
    /// Market settings every indicator request is bound to.
    fn settings(&self) -> &IndicatorSettings;

    /// Fetches the simple moving average over `period` candles.
    async fn moving_average(&self, period: u32) -> Result<f64>;
}
