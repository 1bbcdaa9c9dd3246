//! Metrics fetch client: immediate and batched report queries, windowed
//! convenience fetches and profile discovery.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{TokenManager, TokenStatus};
use crate::credentials::{Credential, CredentialStore};
use crate::domain::UtcDate;
use crate::fetch::{FetchError, FetchOutcome};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse};
use crate::query::{Dimension, DispatchKey, MetricQuery, MetricRow};
use crate::retry::RetryConfig;
use crate::CoreError;

/// Correlation tag applied by the trailing-window convenience fetch.
pub const TRAILING_TAG: &str = "_now";
/// Correlation tag applied by the preceding-window convenience fetch.
pub const PRECEDING_TAG: &str = "_prev";

const DEFAULT_API_BASE: &str = "https://www.googleapis.com/analytics/v3";

/// Reporting API configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::from(DEFAULT_API_BASE),
            retry: RetryConfig::default(),
        }
    }
}

/// One metrics profile discovered under an upstream account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub account_id: String,
    pub account_name: String,
    pub profile_id: String,
    pub profile_name: String,
    pub website_url: String,
    pub timezone: String,
    pub web_property_id: String,
}

/// Profile details fetched for a single account/property pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileInfo {
    pub profile_id: String,
    pub profile_name: String,
    pub website_url: String,
    pub timezone: String,
    pub web_property_id: String,
}

#[derive(Debug)]
struct PendingQuery {
    key: DispatchKey,
    query: MetricQuery,
}

#[derive(Debug, Default)]
struct BatchSession {
    pending: Vec<PendingQuery>,
}

/// Client for the upstream reporting API.
///
/// One instance serves one logical control flow (e.g. one dashboard
/// request): the batch session is unsynchronized shared state, so
/// concurrent callers must either hold an external lock or use one
/// instance each. Nothing runs unless explicitly awaited.
pub struct AnalyticsClient {
    tokens: TokenManager,
    store: Arc<dyn CredentialStore>,
    http: Arc<dyn HttpClient>,
    config: ClientConfig,
    batch: Option<BatchSession>,
}

impl AnalyticsClient {
    pub fn new(
        tokens: TokenManager,
        store: Arc<dyn CredentialStore>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self::with_config(tokens, store, http, ClientConfig::default())
    }

    pub fn with_config(
        tokens: TokenManager,
        store: Arc<dyn CredentialStore>,
        http: Arc<dyn HttpClient>,
        config: ClientConfig,
    ) -> Self {
        Self {
            tokens,
            store,
            http,
            config,
            batch: None,
        }
    }

    pub fn tokens_mut(&mut self) -> &mut TokenManager {
        &mut self.tokens
    }

    pub fn batch_mode(&self) -> bool {
        self.batch.is_some()
    }

    /// Toggle batch mode. Enabling opens a fresh session and discards any
    /// unexecuted queries from a previous one; callers must execute before
    /// re-enabling or switching modes.
    pub fn set_batch_mode(&mut self, enabled: bool) {
        if let Some(session) = self.batch.take() {
            if !session.pending.is_empty() {
                debug!(
                    discarded = session.pending.len(),
                    "dropping unexecuted batch session"
                );
            }
        }
        if enabled {
            self.batch = Some(BatchSession::default());
        }
    }

    /// Fetch one metric query.
    ///
    /// Requires a valid token and a selected profile; neither failure
    /// queues anything. With batch mode off the call is dispatched
    /// immediately and the first data row returned. With batch mode on the
    /// query joins the session under its dispatch key.
    pub async fn fetch(&mut self, query: MetricQuery) -> Result<FetchOutcome, FetchError> {
        let credential = match self.tokens.ensure_valid_token().await {
            TokenStatus::Valid(credential) => credential,
            TokenStatus::Unauthenticated => {
                return Err(FetchError::unauthenticated(
                    "no usable access token; complete authorization first",
                ))
            }
        };
        let profile_id = self.selected_profile()?;

        if let Some(session) = self.batch.as_mut() {
            let key = query.dispatch_key();
            session.pending.push(PendingQuery {
                key: key.clone(),
                query,
            });
            return Ok(FetchOutcome::Queued(key));
        }

        let row = self.run_single(&credential, &profile_id, &query).await?;
        Ok(FetchOutcome::Data(row))
    }

    /// Fetch over the trailing `days`-day window ending today.
    pub async fn fetch_trailing(
        &mut self,
        dimensions: Vec<Dimension>,
        days: u32,
    ) -> Result<FetchOutcome, CoreError> {
        let query = MetricQuery::trailing(dimensions, UtcDate::today_utc(), days, TRAILING_TAG)?;
        self.fetch(query).await.map_err(CoreError::from)
    }

    /// Fetch over the `days`-day window ending `days` days ago.
    pub async fn fetch_preceding(
        &mut self,
        dimensions: Vec<Dimension>,
        days: u32,
    ) -> Result<FetchOutcome, CoreError> {
        let query = MetricQuery::preceding(dimensions, UtcDate::today_utc(), days, PRECEDING_TAG)?;
        self.fetch(query).await.map_err(CoreError::from)
    }

    /// Dispatch every pending query in one transport round trip and
    /// demultiplex the responses by dispatch key.
    ///
    /// A rejection of one query is isolated to its key; a transport
    /// failure of the whole round trip marks every key with the same
    /// failure. The session is cleared on return either way. With no
    /// session or an empty one this returns an empty map.
    pub async fn execute_batch(&mut self) -> BTreeMap<DispatchKey, Result<MetricRow, FetchError>> {
        let Some(session) = self.batch.take() else {
            return BTreeMap::new();
        };
        // Batch mode stays on with a fresh session.
        self.batch = Some(BatchSession::default());

        if session.pending.is_empty() {
            return BTreeMap::new();
        }

        let shared_failure = |error: FetchError| {
            session
                .pending
                .iter()
                .map(|pending| (pending.key.clone(), Err(error.clone())))
                .collect::<BTreeMap<_, _>>()
        };

        let credential = match self.tokens.ensure_valid_token().await {
            TokenStatus::Valid(credential) => credential,
            TokenStatus::Unauthenticated => {
                return shared_failure(FetchError::unauthenticated(
                    "no usable access token; complete authorization first",
                ))
            }
        };
        let profile_id = match self.selected_profile() {
            Ok(profile_id) => profile_id,
            Err(error) => return shared_failure(error),
        };

        let body = BatchRequestBody {
            reports: session
                .pending
                .iter()
                .map(|pending| ReportRequest::new(&profile_id, &pending.query))
                .collect(),
        };
        let payload = match serde_json::to_string(&body) {
            Ok(payload) => payload,
            Err(err) => {
                return shared_failure(FetchError::transport(format!(
                    "failed to encode batch request: {err}"
                )))
            }
        };

        let request = HttpRequest::post(format!("{}/data/ga:batchGet", self.config.api_base))
            .with_header("content-type", "application/json")
            .with_body(payload)
            .with_auth(&HttpAuth::BearerToken(credential.access_token.clone()));

        let response = match self.execute_with_retry(request).await {
            Ok(response) => response,
            Err(error) => return shared_failure(error),
        };
        if !response.is_success() {
            return shared_failure(FetchError::transport(format!(
                "batch endpoint returned status {}",
                response.status
            )));
        }

        let parsed: BatchResponseBody = match serde_json::from_str(&response.body) {
            Ok(parsed) => parsed,
            Err(err) => {
                return shared_failure(FetchError::transport(format!(
                    "malformed batch payload: {err}"
                )))
            }
        };

        let mut results = BTreeMap::new();
        for (index, pending) in session.pending.into_iter().enumerate() {
            let value = match parsed.reports.get(index) {
                None => Err(FetchError::upstream_rejected(
                    "batch response carried no entry for this query",
                )),
                Some(entry) => entry.to_result(),
            };
            if let Err(error) = &value {
                warn!(key = %pending.key, error = %error, "batched query failed");
            }
            results.insert(pending.key, value);
        }
        results
    }

    /// Walk upstream accounts and flatten their profiles. A failure for
    /// one account is logged and skipped; sibling accounts still resolve.
    pub async fn list_profiles(&mut self) -> Result<Vec<ProfileSummary>, FetchError> {
        let credential = self.valid_credential().await?;

        let accounts_url = format!("{}/management/accounts", self.config.api_base);
        let accounts: AccountList = self.get_json(&credential, &accounts_url).await?;

        let mut profiles = Vec::new();
        for account in accounts.items {
            let url = format!(
                "{}/management/accounts/{}/webproperties/~all/profiles",
                self.config.api_base,
                urlencoding::encode(&account.id),
            );
            let listing: Result<ProfileList, FetchError> =
                self.get_json(&credential, &url).await;
            let listing = match listing {
                Ok(listing) => listing,
                Err(error) => {
                    warn!(account = %account.id, error = %error, "skipping account");
                    continue;
                }
            };
            for entry in listing.items {
                profiles.push(entry.into_summary(&account));
            }
        }
        Ok(profiles)
    }

    /// Fetch details of the first profile under one account/property pair.
    pub async fn profile_info(
        &mut self,
        account_id: &str,
        web_property_id: &str,
    ) -> Result<ProfileInfo, FetchError> {
        let credential = self.valid_credential().await?;
        let url = format!(
            "{}/management/accounts/{}/webproperties/{}/profiles",
            self.config.api_base,
            urlencoding::encode(account_id),
            urlencoding::encode(web_property_id),
        );
        let listing: ProfileList = self.get_json(&credential, &url).await?;
        listing
            .items
            .into_iter()
            .next()
            .map(ProfileEntry::into_info)
            .ok_or_else(|| {
                FetchError::upstream_rejected(format!(
                    "no profile found under account '{account_id}' property '{web_property_id}'"
                ))
            })
    }

    async fn valid_credential(&mut self) -> Result<Credential, FetchError> {
        match self.tokens.ensure_valid_token().await {
            TokenStatus::Valid(credential) => Ok(credential),
            TokenStatus::Unauthenticated => Err(FetchError::unauthenticated(
                "no usable access token; complete authorization first",
            )),
        }
    }

    fn selected_profile(&self) -> Result<String, FetchError> {
        match self.store.find_profile_id() {
            Ok(Some(profile_id)) => Ok(profile_id),
            Ok(None) => Err(FetchError::no_profile()),
            Err(err) => Err(FetchError::transport(format!(
                "credential store read failed: {err}"
            ))),
        }
    }

    async fn run_single(
        &self,
        credential: &Credential,
        profile_id: &str,
        query: &MetricQuery,
    ) -> Result<MetricRow, FetchError> {
        let url = format!(
            "{}/data/ga?ids=ga%3A{}&start-date={}&end-date={}&metrics={}",
            self.config.api_base,
            urlencoding::encode(profile_id),
            query.window().start(),
            query.window().end(),
            urlencoding::encode(&query.dimension_expr()),
        );
        let request = HttpRequest::get(url)
            .with_auth(&HttpAuth::BearerToken(credential.access_token.clone()));

        let response = self.execute_with_retry(request).await?;
        if !response.is_success() {
            return Err(FetchError::upstream_rejected(format!(
                "reporting API returned status {}",
                response.status
            )));
        }

        let report: ReportBody = serde_json::from_str(&response.body)
            .map_err(|err| FetchError::upstream_rejected(format!("malformed report payload: {err}")))?;
        report
            .rows
            .into_iter()
            .next()
            .map(|values| MetricRow { values })
            .ok_or_else(|| FetchError::upstream_rejected("report contained no rows"))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        credential: &Credential,
        url: &str,
    ) -> Result<T, FetchError> {
        let request = HttpRequest::get(url)
            .with_auth(&HttpAuth::BearerToken(credential.access_token.clone()));
        let response = self.execute_with_retry(request).await?;
        if !response.is_success() {
            return Err(FetchError::upstream_rejected(format!(
                "upstream returned status {}",
                response.status
            )));
        }
        serde_json::from_str(&response.body)
            .map_err(|err| FetchError::upstream_rejected(format!("malformed payload: {err}")))
    }

    async fn execute_with_retry(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let retry = &self.config.retry;
        let mut attempt = 0u32;
        loop {
            match self.http.execute(request.clone()).await {
                Ok(response) => {
                    if retry.enabled
                        && attempt < retry.max_retries
                        && retry.should_retry_status(response.status)
                    {
                        debug!(status = response.status, attempt, "retrying upstream call");
                        tokio::time::sleep(retry.delay_for_attempt(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return Ok(response);
                }
                Err(error) => {
                    if retry.enabled && error.retryable() && attempt < retry.max_retries {
                        debug!(error = %error, attempt, "retrying after transport error");
                        tokio::time::sleep(retry.delay_for_attempt(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(FetchError::transport(format!(
                        "transport error: {}",
                        error.message()
                    )));
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchRequestBody {
    reports: Vec<ReportRequest>,
}

#[derive(Debug, Serialize)]
struct ReportRequest {
    ids: String,
    #[serde(rename = "start-date")]
    start_date: String,
    #[serde(rename = "end-date")]
    end_date: String,
    metrics: String,
}

impl ReportRequest {
    fn new(profile_id: &str, query: &MetricQuery) -> Self {
        Self {
            ids: format!("ga:{profile_id}"),
            start_date: query.window().start().to_string(),
            end_date: query.window().end().to_string(),
            metrics: query.dimension_expr(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReportBody {
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct BatchResponseBody {
    #[serde(default)]
    reports: Vec<BatchReportEntry>,
}

#[derive(Debug, Deserialize)]
struct BatchReportEntry {
    #[serde(default)]
    rows: Vec<Vec<String>>,
    #[serde(default)]
    error: Option<UpstreamErrorBody>,
}

impl BatchReportEntry {
    fn to_result(&self) -> Result<MetricRow, FetchError> {
        if let Some(error) = &self.error {
            return Err(FetchError::upstream_rejected(format!(
                "upstream rejected query: {} (code {})",
                error.message, error.code
            )));
        }
        self.rows
            .first()
            .map(|values| MetricRow {
                values: values.clone(),
            })
            .ok_or_else(|| FetchError::upstream_rejected("report contained no rows"))
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct AccountList {
    #[serde(default)]
    items: Vec<AccountEntry>,
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProfileList {
    #[serde(default)]
    items: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileEntry {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    website_url: String,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    web_property_id: String,
}

impl ProfileEntry {
    fn into_summary(self, account: &AccountEntry) -> ProfileSummary {
        ProfileSummary {
            account_id: account.id.clone(),
            account_name: account.name.clone(),
            profile_id: self.id,
            profile_name: self.name,
            website_url: self.website_url,
            timezone: self.timezone,
            web_property_id: self.web_property_id,
        }
    }

    fn into_info(self) -> ProfileInfo {
        ProfileInfo {
            profile_id: self.id,
            profile_name: self.name,
            website_url: self.website_url,
            timezone: self.timezone,
            web_property_id: self.web_property_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::auth::AuthConfig;
    use crate::credentials::MemoryCredentialStore;
    use crate::domain::{DateWindow, UtcDateTime};
    use crate::fetch::FetchErrorKind;
    use crate::http_client::HttpError;

    struct ScriptedHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self
                .responses
                .lock()
                .expect("response store should not be poisoned")
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::ok_json("{}")));
            Box::pin(async move { response })
        }
    }

    fn authenticated_store() -> Arc<MemoryCredentialStore> {
        let store = Arc::new(MemoryCredentialStore::with_profile_id("987654"));
        store
            .set_access_token(&Credential::new(
                "access-1",
                UtcDateTime::now().plus_seconds(3600),
                None,
            ))
            .expect("write ok");
        store
    }

    fn client_with(
        store: Arc<MemoryCredentialStore>,
        http: Arc<ScriptedHttpClient>,
        retry: RetryConfig,
    ) -> AnalyticsClient {
        let config = AuthConfig::new("client-id", "client-secret").expect("valid config");
        let mut tokens = TokenManager::new(config, store.clone(), http.clone());
        tokens.initialize().expect("initialize ok");
        AnalyticsClient::with_config(
            tokens,
            store,
            http,
            ClientConfig {
                api_base: String::from("https://metrics.example/v3"),
                retry,
            },
        )
    }

    fn sessions_query(tag: &str) -> MetricQuery {
        let window = DateWindow::trailing(UtcDate::parse("2024-03-10").expect("valid date"), 7)
            .expect("valid window");
        MetricQuery::new(
            vec![Dimension::parse("ga:sessions").expect("valid dimension")],
            window,
            tag,
        )
        .expect("valid query")
    }

    #[tokio::test]
    async fn unauthenticated_fetch_fails_fast_and_queues_nothing() {
        let store = Arc::new(MemoryCredentialStore::with_profile_id("987654"));
        let http = Arc::new(ScriptedHttpClient::new(Vec::new()));
        let mut client = client_with(store, http.clone(), RetryConfig::no_retry());
        client.set_batch_mode(true);

        let error = client
            .fetch(sessions_query("_now"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), FetchErrorKind::Unauthenticated);
        assert!(http.recorded_requests().is_empty());
        assert!(client.execute_batch().await.is_empty());
    }

    #[tokio::test]
    async fn fetch_without_selected_profile_fails() {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .set_access_token(&Credential::new(
                "access-1",
                UtcDateTime::now().plus_seconds(3600),
                None,
            ))
            .expect("write ok");
        let http = Arc::new(ScriptedHttpClient::new(Vec::new()));
        let mut client = client_with(store, http, RetryConfig::no_retry());

        let error = client
            .fetch(sessions_query("_now"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), FetchErrorKind::NoProfile);
    }

    #[tokio::test]
    async fn immediate_fetch_returns_the_first_row() {
        let http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            r#"{"rows":[["1204"],["977"]]}"#,
        ))]));
        let mut client = client_with(authenticated_store(), http.clone(), RetryConfig::no_retry());

        let outcome = client
            .fetch(sessions_query("_now"))
            .await
            .expect("fetch ok");
        assert_eq!(
            outcome,
            FetchOutcome::Data(MetricRow {
                values: vec![String::from("1204")],
            })
        );

        let requests = http.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.contains("ids=ga%3A987654"));
        assert!(requests[0].url.contains("start-date=2024-03-03"));
        assert!(requests[0].url.contains("end-date=2024-03-10"));
        assert!(requests[0].url.contains("metrics=ga%3Asessions"));
        assert_eq!(
            requests[0].headers.get("authorization").map(String::as_str),
            Some("Bearer access-1")
        );
    }

    #[tokio::test]
    async fn batched_fetch_queues_without_network_traffic() {
        let http = Arc::new(ScriptedHttpClient::new(Vec::new()));
        let mut client = client_with(authenticated_store(), http.clone(), RetryConfig::no_retry());
        client.set_batch_mode(true);

        let outcome = client
            .fetch(sessions_query("_now"))
            .await
            .expect("fetch ok");
        let FetchOutcome::Queued(key) = outcome else {
            panic!("expected the query to be queued");
        };
        assert_eq!(key.as_str(), "ga:sessions_now");
        assert!(http.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn transient_status_is_retried_then_succeeds() {
        let http = Arc::new(ScriptedHttpClient::new(vec![
            Ok(HttpResponse::with_status(503, "")),
            Ok(HttpResponse::ok_json(r#"{"rows":[["42"]]}"#)),
        ]));
        let mut client = client_with(
            authenticated_store(),
            http.clone(),
            RetryConfig::fixed(Duration::from_millis(1), 1),
        );

        let outcome = client
            .fetch(sessions_query("_now"))
            .await
            .expect("fetch ok");
        assert!(matches!(outcome, FetchOutcome::Data(_)));
        assert_eq!(http.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn whole_batch_transport_failure_marks_every_key() {
        let http = Arc::new(ScriptedHttpClient::new(vec![Err(HttpError::new(
            "connection reset",
        ))]));
        let mut client = client_with(authenticated_store(), http, RetryConfig::no_retry());
        client.set_batch_mode(true);

        client
            .fetch(sessions_query("_now"))
            .await
            .expect("queued ok");
        client
            .fetch(sessions_query("_prev"))
            .await
            .expect("queued ok");

        let results = client.execute_batch().await;
        assert_eq!(results.len(), 2);
        let failures: Vec<&FetchError> = results
            .values()
            .map(|value| value.as_ref().expect_err("all keys must fail"))
            .collect();
        assert!(failures
            .iter()
            .all(|error| error.kind() == FetchErrorKind::TransportFailure));
        assert_eq!(failures[0], failures[1]);
    }

    #[tokio::test]
    async fn list_profiles_skips_failing_accounts() {
        let http = Arc::new(ScriptedHttpClient::new(vec![
            Ok(HttpResponse::ok_json(
                r#"{"items":[{"id":"a1","name":"Acme"},{"id":"a2","name":"Beta"}]}"#,
            )),
            Ok(HttpResponse::with_status(403, "")),
            Ok(HttpResponse::ok_json(
                r#"{"items":[{"id":"p2","name":"Beta Site","websiteUrl":"https://beta.example","timezone":"UTC","webPropertyId":"UA-2"}]}"#,
            )),
        ]));
        let mut client = client_with(authenticated_store(), http, RetryConfig::no_retry());

        let profiles = client.list_profiles().await.expect("listing ok");
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].account_id, "a2");
        assert_eq!(profiles[0].profile_id, "p2");
        assert_eq!(profiles[0].web_property_id, "UA-2");
    }

    #[tokio::test]
    async fn profile_info_returns_the_first_profile() {
        let http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            r#"{"items":[{"id":"p1","name":"Main","websiteUrl":"https://acme.example","timezone":"UTC","webPropertyId":"UA-1"}]}"#,
        ))]));
        let mut client = client_with(authenticated_store(), http.clone(), RetryConfig::no_retry());

        let info = client
            .profile_info("a1", "UA-1")
            .await
            .expect("profile info ok");
        assert_eq!(info.profile_id, "p1");
        assert!(http.recorded_requests()[0]
            .url
            .contains("/management/accounts/a1/webproperties/UA-1/profiles"));
    }
}
