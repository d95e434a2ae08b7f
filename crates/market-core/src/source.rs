//! The fetch contract shared by every source.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::Result, types::DataResult};

/// A strategy for fetching one [`DataType`](crate::DataType).
///
/// Every parameter a source needs (its provider, a moving-average period)
/// is bound when it is constructed, so `fetch` takes no arguments. Provider
/// errors are returned unchanged.
#[async_trait]
pub trait Source: Send + Sync + Debug {
    /// Fetches a fresh value from the backing provider.
    async fn fetch(&self) -> Result<DataResult>;
}
