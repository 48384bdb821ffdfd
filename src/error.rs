//! Errors returned by the price data-access layer.

use thiserror::Error;

/// Why a fetch against the upstream price API did not produce records.
///
/// An empty record list is *not* an error: it is returned as `Ok(vec![])`
/// so callers can tell "no data" apart from "the fetch failed".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    #[error("request cancelled before completion")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, FetchError::Malformed(_))
    }

    /// Short machine-readable label, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport_error",
            FetchError::Status { .. } => "status_error",
            FetchError::Malformed(_) => "malformed_payload",
            FetchError::InvalidUrl(_) => "invalid_url",
            FetchError::Cancelled => "cancelled",
        }
    }
}

/// Three-way view of a fetch result for presentation code.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Data(Vec<T>),
    Empty,
    Failed(FetchError),
}

impl<T> From<Result<Vec<T>, FetchError>> for FetchOutcome<T> {
    fn from(result: Result<Vec<T>, FetchError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => FetchOutcome::Empty,
            Ok(items) => FetchOutcome::Data(items),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}
