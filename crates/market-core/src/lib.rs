#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for cached market metrics.
//!
//! This crate provides the foundational abstractions shared by the facade and
//! the provider crates:
//!
//! - [`DataType`](types::DataType) - The closed set of fetchable metrics
//! - [`DataResult`](types::DataResult) - A fetched value with provenance
//! - [`Source`](source::Source) - Uniform `fetch()` contract
//! - [`MarketCapProvider`](provider::MarketCapProvider) - Price and market cap data
//! - [`IndicatorProvider`](provider::IndicatorProvider) - Moving averages

/// Error types for data operations.
pub mod error;
/// Provider traits for fetching market metrics.
pub mod provider;
/// The fetch contract shared by all sources.
pub mod source;
/// Core data types (DataType, DataResult, DataRecord).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{DataError, Result};
pub use provider::{DataProvider, IndicatorProvider, IndicatorSettings, MarketCapProvider};
pub use source::Source;
pub use types::{DataRecord, DataResult, DataType, Metadata, currency_metadata};
