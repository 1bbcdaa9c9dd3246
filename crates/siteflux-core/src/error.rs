use thiserror::Error;

/// Validation and contract errors exposed by `siteflux-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("dimension cannot be empty")]
    EmptyDimension,
    #[error("dimension must use the '<namespace>:<name>' form: '{value}'")]
    DimensionMissingNamespace { value: String },
    #[error("dimension contains invalid character '{ch}' at index {index}")]
    DimensionInvalidChar { ch: char, index: usize },

    #[error("query requires at least one dimension")]
    EmptyDimensionList,
    #[error("correlation tag cannot be empty")]
    EmptyCorrelationTag,

    #[error("date must be calendar YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date window start {start} is after end {end}")]
    WindowInverted { start: String, end: String },
    #[error("window length must be at least one day")]
    ZeroLengthWindow,

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("client id and client secret must be non-empty")]
    MissingClientCredentials,
}

/// Failure reading from or writing to a credential store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("credential store read failed: {0}")]
    Read(String),
    #[error("credential store write failed: {0}")]
    Write(String),
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fetch(#[from] crate::fetch::FetchError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
