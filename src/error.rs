//! Error types shared by the external sources, the playlist operations and
//! the local stores.

use std::time::Duration;

use thiserror::Error;

/// Failure of a single call against an external metadata source.
///
/// The enrichment pipeline never surfaces these to its caller: the batch
/// fetcher absorbs them and degrades the affected item to an empty result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("access token rejected")]
    Unauthorized,

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Classifies a transport error from reqwest.
    pub fn from_http(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Malformed(err.to_string())
        } else {
            SourceError::Unavailable(err.to_string())
        }
    }
}

/// Errors of the playlist operations exposed to callers (CLI and HTTP API).
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("invalid input: {0}")]
    MalformedInput(String),

    #[error("no data for {0}")]
    NotFound(String),

    #[error("missing or expired access token")]
    Unauthorized,

    #[error(transparent)]
    Source(#[from] SourceError),

    /// A remote removal failed part way. Only `confirmed` of the `attempted`
    /// positions are known to be gone; the playlist must be queried again.
    #[error("removal failed after {confirmed} of {attempted} positions, re-query the playlist")]
    RemovalFailed { attempted: usize, confirmed: usize },
}

impl PlaylistError {
    /// Maps a source failure on a playlist call, keeping "not found" distinct.
    pub fn from_source(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(what) => PlaylistError::NotFound(what),
            SourceError::Unauthorized => PlaylistError::Unauthorized,
            other => PlaylistError::Source(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid value: {0}")]
    Invalid(String),
}
