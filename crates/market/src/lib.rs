#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Cached fetch facade for crypto market metrics.
//!
//! This crate ties the providers, sources and cache together behind
//! [`DataFetcher`]: a caller asks for a [`DataType`] and receives either a
//! value no older than the cache TTL or the provider's error.
//!
//! - [`DataFetcher`] - `get`, `get_by_name` and `get_all`
//! - [`SourceResolver`] / [`ProviderResolver`] - data type to source routing
//! - [`FetcherConfig`] - credentials, TTL and timeouts from the environment
//!
//! # Example
//!
//! ```rust,ignore
//! use market::{DataFetcher, DataType};
//!
//! #[tokio::main]
//! async fn main() -> market::Result<()> {
//!     let fetcher = DataFetcher::from_env()?;
//!     let ma200 = fetcher.get(DataType::Ma200).await?;
//!     println!("{}", ma200.to_json());
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use market_core::*;

// Cache
pub use market_cache::{DEFAULT_TTL, MetricCache};

// Providers
pub use market_cmc::CoinMarketCapProvider;
pub use market_taapi::TaapiProvider;

mod config;
mod fetcher;
mod resolver;
mod sources;

pub use config::{
    CACHE_TTL_ENV, CMC_API_KEY_ENV, DEFAULT_REQUEST_TIMEOUT, FetcherConfig, HTTP_TIMEOUT_ENV,
    TAAPI_SECRET_ENV,
};
pub use fetcher::DataFetcher;
pub use resolver::{
    MA50_PERIOD, MA200_PERIOD, ProviderResolver, SourceResolver, moving_average_period,
};
pub use sources::{AggregateCapSource, CapKind, MovingAverageSource, PriceSource};
