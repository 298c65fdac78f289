//! Error types for the enrichment pipeline.

use thiserror::Error;

/// Failure while talking to the planning registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Transport-level failure, including timeouts
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("registry answered {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not the JSON shape we expect
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

impl RegistryError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            RegistryError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            RegistryError::Status { status, .. } => *status == 429 || *status >= 500,
            RegistryError::Decode(_) => false,
            RegistryError::Unavailable(_) => true,
        }
    }
}

/// Errors surfaced by the enrichment pipeline.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("malformed coordinate {input:?}: {reason}")]
    MalformedCoordinate { input: String, reason: String },

    #[error("plan search failed at ({lon}, {lat}): {source}")]
    PlanQueryFailed {
        lon: f64,
        lat: f64,
        #[source]
        source: RegistryError,
    },

    #[error("destination areas for plan {plan_id} could not be fetched: {source}")]
    AreaFetchFailed {
        plan_id: String,
        #[source]
        source: RegistryError,
    },

    /// Degenerate or unusable polygon. Recovered per polygon by the aggregator.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("station dataset: {0}")]
    Dataset(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EnrichError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        EnrichError::MalformedCoordinate {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        EnrichError::InvalidGeometry(reason.into())
    }
}

pub type Result<T, E = EnrichError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_retryability() {
        let throttled = RegistryError::Status {
            status: 429,
            body: String::new(),
        };
        let server = RegistryError::Status {
            status: 503,
            body: String::new(),
        };
        let not_found = RegistryError::Status {
            status: 404,
            body: String::new(),
        };
        assert!(throttled.is_retryable());
        assert!(server.is_retryable());
        assert!(!not_found.is_retryable());
    }

    #[test]
    fn test_decode_is_not_retryable() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!RegistryError::Decode(err).is_retryable());
    }
}
