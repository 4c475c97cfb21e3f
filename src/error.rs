// =============================================================================
// Error taxonomy
// =============================================================================
//
// Two families of failure reach the caller:
//   - ValidationError: request parameters outside the supported enumerations.
//     Rejected before any provider call.
//   - ProviderError: the market data provider could not produce data. These
//     are absorbed by the service and turned into empty results, but the
//     reason travels with the result so the UI can tell them apart.
//
// Short histories are not an error at all; indicators simply stay undefined.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unknown symbol: '{0}'")]
    UnknownSymbol(String),

    #[error("unsupported period: '{0}' (expected one of 1d, 5d, 1mo, 3mo, 1y, 5y)")]
    UnsupportedPeriod(String),

    #[error("unsupported interval: '{0}' (expected one of 1d, 1h, 15m, 5m)")]
    UnsupportedInterval(String),

    #[error("target price must be a positive number, got {0}")]
    InvalidTargetPrice(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("provider unreachable: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Http { status: u16, body: String },

    /// The call did not complete within the configured bound.
    #[error("provider did not answer within {0}s")]
    Timeout(u64),

    /// The provider answered but had nothing for this request.
    #[error("provider returned no data")]
    NoData,

    /// The response could not be interpreted.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Short machine-readable tag for API payloads and the error log.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "provider_unavailable",
            Self::Http { .. } => "provider_unavailable",
            Self::Timeout(_) => "provider_timeout",
            Self::NoData => "no_data",
            Self::Malformed(_) => "malformed_response",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ProviderError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None if err.is_decode() => ProviderError::Malformed(err.to_string()),
            None => ProviderError::Network(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_distinguish_no_data_from_outage() {
        assert_eq!(ProviderError::NoData.code(), "no_data");
        assert_eq!(
            ProviderError::Network("refused".into()).code(),
            "provider_unavailable"
        );
        assert_eq!(ProviderError::Timeout(10).code(), "provider_timeout");
    }

    #[test]
    fn messages_carry_details() {
        let err = ProviderError::Http {
            status: 404,
            body: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "provider returned 404: Not Found");
        assert_eq!(
            ValidationError::UnknownSymbol("XYZ".into()).to_string(),
            "unknown symbol: 'XYZ'"
        );
    }
}
