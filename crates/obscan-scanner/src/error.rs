use thiserror::Error;

/// Failures of the transport collaborator: network, timeout, or non-2xx.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no response within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("response from {url} is not JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid request header \"{name}\"")]
    InvalidHeader { name: String },
}

/// The response parsed, but its top level is not the expected mapping.
#[derive(Debug, Error)]
#[error("malformed response: expected a JSON object at top level, found {found}")]
pub struct MalformedResponseError {
    pub found: &'static str,
}

/// Why a single seed produced no result. Never aborts the scan.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponseError),
}
