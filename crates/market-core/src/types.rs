//! Core data types for market metrics.
//!
//! This module defines the fundamental data structures:
//!
//! - [`DataType`] - The closed set of metrics that can be fetched
//! - [`DataResult`] - A fetched value with provider identity and metadata
//! - [`DataRecord`] - The stable JSON-compatible shape of a [`DataResult`]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Metadata attached to a [`DataResult`], e.g. `{"currency": "USD"}`.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// A metric that can be fetched.
///
/// Variants are ordered by declaration, which is also the order of [`DataType::ALL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// BTC spot price in USD.
    BtcPrice,
    /// Total crypto market capitalization in USD.
    TotalMarketCap,
    /// Total stablecoin market capitalization in USD.
    StablecoinMarketCap,
    /// 50-period moving average of BTC.
    Ma50,
    /// 200-period moving average of BTC.
    Ma200,
}

impl DataType {
    /// Every supported data type, in enumeration order.
    pub const ALL: [Self; 5] = [
        Self::BtcPrice,
        Self::TotalMarketCap,
        Self::StablecoinMarketCap,
        Self::Ma50,
        Self::Ma200,
    ];

    /// Returns the stable string identifier of this data type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BtcPrice => "btc_price",
            Self::TotalMarketCap => "total_market_cap",
            Self::StablecoinMarketCap => "stablecoin_market_cap",
            Self::Ma50 => "ma50",
            Self::Ma200 => "ma200",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|data_type| data_type.as_str() == s)
            .ok_or_else(|| DataError::UnsupportedDataType(s.to_string()))
    }
}

/// Result of a single fetch.
///
/// Immutable once built; sources create one per successful fetch and the
/// cache hands out clones.
#[derive(Clone, Debug, PartialEq)]
pub struct DataResult {
    data_type: DataType,
    value: f64,
    provider: String,
    metadata: Option<Metadata>,
}

impl DataResult {
    /// Creates a result without metadata.
    #[must_use]
    pub fn new(data_type: DataType, value: f64, provider: impl Into<String>) -> Self {
        Self {
            data_type,
            value,
            provider: provider.into(),
            metadata: None,
        }
    }

    /// Attaches metadata to the result.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The data type this value was fetched for.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The fetched value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Name of the provider that produced the value.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Metadata attached by the source, if any.
    #[must_use]
    pub const fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Converts to the stable serializable record.
    ///
    /// Missing metadata becomes an empty map.
    #[must_use]
    pub fn to_record(&self) -> DataRecord {
        DataRecord {
            data_type: self.data_type,
            value: self.value,
            provider: self.provider.clone(),
            metadata: self.metadata.clone().unwrap_or_default(),
        }
    }

    /// Serializes to a JSON object of the shape
    /// `{"data_type": str, "value": f64, "provider": str, "metadata": {..}}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "data_type": self.data_type.as_str(),
            "value": self.value,
            "provider": self.provider,
            "metadata": self.metadata.clone().unwrap_or_default(),
        })
    }
}

/// Serializable form of a [`DataResult`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Data type identifier.
    pub data_type: DataType,
    /// Fetched value.
    pub value: f64,
    /// Provider name.
    pub provider: String,
    /// Metadata, empty when the source attached none.
    #[serde(default)]
    pub metadata: Metadata,
}

impl From<DataRecord> for DataResult {
    fn from(record: DataRecord) -> Self {
        let metadata = (!record.metadata.is_empty()).then_some(record.metadata);
        Self {
            data_type: record.data_type,
            value: record.value,
            provider: record.provider,
            metadata,
        }
    }
}

/// Builds the `{"currency": ...}` metadata used by price and cap sources.
#[must_use]
pub fn currency_metadata(currency: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("currency".to_string(), currency.into());
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_identifiers() {
        let names: Vec<_> = DataType::ALL.iter().map(DataType::as_str).collect();
        assert_eq!(
            names,
            ["btc_price", "total_market_cap", "stablecoin_market_cap", "ma50", "ma200"]
        );
        assert_eq!(DataType::Ma200.to_string(), "ma200");
    }

    #[test]
    fn test_data_type_parse() {
        assert_eq!("ma50".parse::<DataType>().unwrap(), DataType::Ma50);
        assert_eq!(
            "stablecoin_market_cap".parse::<DataType>().unwrap(),
            DataType::StablecoinMarketCap
        );

        let err = "eth_price".parse::<DataType>().unwrap_err();
        assert!(matches!(err, DataError::UnsupportedDataType(ref s) if s == "eth_price"));
    }

    #[test]
    fn test_data_type_ordering_matches_all() {
        let mut sorted = DataType::ALL;
        sorted.sort();
        assert_eq!(sorted, DataType::ALL);
    }

    #[test]
    fn test_serde_uses_identifiers() {
        let json = serde_json::to_string(&DataType::TotalMarketCap).unwrap();
        assert_eq!(json, "\"total_market_cap\"");
    }

    #[test]
    fn test_to_json_shape() {
        let result = DataResult::new(DataType::BtcPrice, 97_250.5, "coinmarketcap")
            .with_metadata(currency_metadata("USD"));

        let json = result.to_json();
        assert_eq!(json["data_type"], "btc_price");
        assert_eq!(json["value"], 97_250.5);
        assert_eq!(json["provider"], "coinmarketcap");
        assert_eq!(json["metadata"]["currency"], "USD");
    }

    #[test]
    fn test_record_round_trip() {
        let result = DataResult::new(DataType::Ma200, 61_034.25, "taapi")
            .with_metadata(currency_metadata("USD"));

        let text = serde_json::to_string(&result.to_json()).unwrap();
        let record: DataRecord = serde_json::from_str(&text).unwrap();

        assert_eq!(record.data_type, DataType::Ma200);
        assert_eq!(record.value, 61_034.25);
        assert_eq!(record.provider, "taapi");
        assert_eq!(record.metadata, currency_metadata("USD"));
        assert_eq!(DataResult::from(record), result);
    }

    #[test]
    fn test_missing_metadata_serializes_empty() {
        let result = DataResult::new(DataType::BtcPrice, 100.0, "mock");
        assert!(result.metadata().is_none());

        let text = serde_json::to_string(&result.to_json()).unwrap();
        let record: DataRecord = serde_json::from_str(&text).unwrap();
        assert!(record.metadata.is_empty());
        assert_eq!(record, result.to_record());
        assert_eq!(DataResult::from(record), result);
    }
}
