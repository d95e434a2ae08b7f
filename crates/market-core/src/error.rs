//! Error types for market data operations.
//!
//! This module defines [`DataError`] which covers every failure that can occur
//! when resolving a data type, talking to a provider, or parsing its response.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// The requested data type is not part of the known enumeration.
    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    /// A required credential is missing or empty.
    #[error("Missing credential: {0} environment variable is required")]
    MissingCredential(String),

    /// Network-related errors (connection failures, timeouts, non-success status).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// Authentication failed for a provider.
    #[error("Authentication failed for provider {0}")]
    AuthenticationFailed(String),

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    /// Map a non-success HTTP status from `provider` to the matching error.
    ///
    /// 401 and 403 become [`DataError::AuthenticationFailed`], 429 becomes
    /// [`DataError::RateLimited`], and anything else is a
    /// [`DataError::Network`] error carrying the status and response body.
    #[must_use]
    pub fn from_http_status(provider: &str, status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::AuthenticationFailed(provider.to_string()),
            429 => Self::RateLimited {
                provider: provider.to_string(),
                retry_after: None,
            },
            _ => Self::Network(format!("HTTP {status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert!(matches!(
            DataError::from_http_status("cmc", 401, ""),
            DataError::AuthenticationFailed(ref p) if p == "cmc"
        ));
        assert!(matches!(
            DataError::from_http_status("taapi", 403, ""),
            DataError::AuthenticationFailed(ref p) if p == "taapi"
        ));
        assert!(matches!(
            DataError::from_http_status("cmc", 429, ""),
            DataError::RateLimited { ref provider, retry_after: None } if provider == "cmc"
        ));

        let err = DataError::from_http_status("cmc", 502, "upstream");
        assert!(matches!(err, DataError::Network(ref msg) if msg == "HTTP 502: upstream"));
    }
}
