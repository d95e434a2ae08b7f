#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! TTL-bounded in-memory cache for market metrics.
//!
//! [`MetricCache`] keeps at most one entry per [`DataType`](market_core::DataType)
//! and is meant to be constructed once and shared (via `Arc`) by every
//! fetch facade in the process.

/// In-memory cache implementation.
pub mod memory;

pub use memory::{DEFAULT_TTL, MetricCache};
