use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::query::{DispatchKey, MetricRow};

/// Failure classification for fetch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// No usable access token; recoverable by re-authorizing.
    Unauthenticated,
    /// No metrics profile selected; recoverable by configuration.
    NoProfile,
    /// The upstream rejected one query; isolated from sibling queries.
    UpstreamRejected,
    /// Connectivity failure for a call or a whole batch; retryable.
    TransportFailure,
    /// The refresh token was rejected; requires full re-authorization.
    RefreshFailed,
}

/// Structured fetch error carried per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    retryable: bool,
}

impl FetchError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Unauthenticated,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn no_profile() -> Self {
        Self {
            kind: FetchErrorKind::NoProfile,
            message: String::from("no metrics profile is selected"),
            retryable: false,
        }
    }

    pub fn upstream_rejected(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::UpstreamRejected,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::TransportFailure,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn refresh_failed(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::RefreshFailed,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Unauthenticated => "fetch.unauthenticated",
            FetchErrorKind::NoProfile => "fetch.no_profile",
            FetchErrorKind::UpstreamRejected => "fetch.upstream_rejected",
            FetchErrorKind::TransportFailure => "fetch.transport_failure",
            FetchErrorKind::RefreshFailed => "fetch.refresh_failed",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Result of a `fetch` call: data when dispatched immediately, or the
/// dispatch key the query was queued under when batch mode is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Data(MetricRow),
    Queued(DispatchKey),
}

impl FetchOutcome {
    pub fn into_row(self) -> Option<MetricRow> {
        match self {
            Self::Data(row) => Some(row),
            Self::Queued(_) => None,
        }
    }
}
