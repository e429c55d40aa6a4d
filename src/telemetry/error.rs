use std::time::Duration;
use thiserror::Error;

/// Every way an upstream call can fail. None of these reach the display:
/// the poller masks them with fallback values.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{endpoint} timed out after {timeout:?}")]
    Timeout {
        endpoint: &'static str,
        timeout: Duration,
    },

    #[error("{endpoint} payload is not valid JSON for its schema: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} payload rejected: {reason}")]
    Schema {
        endpoint: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    pub fn schema(endpoint: &'static str, reason: impl Into<String>) -> Self {
        UpstreamError::Schema {
            endpoint,
            reason: reason.into(),
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            UpstreamError::Transport { endpoint, .. }
            | UpstreamError::Status { endpoint, .. }
            | UpstreamError::Timeout { endpoint, .. }
            | UpstreamError::Parse { endpoint, .. }
            | UpstreamError::Schema { endpoint, .. } => endpoint,
        }
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;
