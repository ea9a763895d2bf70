use common::search_query::QueryFingerprint;
use thiserror::Error;

/// Why a paged search or suggestion fetch produced no usable data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("store rejected the request: {0}")]
    Rejected(String),

    #[error("request timed out")]
    TimedOut,
}

/// A failed paged search, attributed to the state that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("search for {fingerprint} failed: {error}")]
pub struct FetchFailure {
    pub fingerprint: QueryFingerprint,
    pub error: FetchError,
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
