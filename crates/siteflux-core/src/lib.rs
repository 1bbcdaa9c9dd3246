//! Core contracts for siteflux.
//!
//! This crate contains:
//! - Credential model, store trait and token lifecycle
//! - Metric query domain types and validation
//! - The metrics fetch client with immediate and batched dispatch
//! - HTTP transport abstraction and retry policy

pub mod auth;
pub mod client;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod http_client;
pub mod query;
pub mod retry;

pub use auth::{
    AuthConfig, TokenManager, TokenStatus, METRICS_READONLY_SCOPE, OOB_REDIRECT_URI,
};
pub use client::{
    AnalyticsClient, ClientConfig, ProfileInfo, ProfileSummary, PRECEDING_TAG, TRAILING_TAG,
};
pub use credentials::{Credential, CredentialStore, MemoryCredentialStore};
pub use domain::{DateWindow, UtcDate, UtcDateTime};
pub use error::{CoreError, StoreError, ValidationError};
pub use fetch::{FetchError, FetchErrorKind, FetchOutcome};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
pub use query::{Dimension, DispatchKey, MetricQuery, MetricRow};
pub use retry::{Backoff, RetryConfig};
