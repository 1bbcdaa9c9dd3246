//! End-to-end contract for the token lifecycle and the batched fetch
//! client, driven through a scripted transport.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use siteflux_core::{
    AnalyticsClient, AuthConfig, ClientConfig, Credential, CredentialStore, DateWindow, Dimension,
    FetchErrorKind, FetchOutcome, HttpClient, HttpError, HttpRequest, HttpResponse,
    MemoryCredentialStore, MetricQuery, RetryConfig, TokenManager, TokenStatus, UtcDate,
    UtcDateTime,
};

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

fn auth_config() -> AuthConfig {
    AuthConfig::new("client-id", "client-secret").expect("valid config")
}

fn client_with(
    store: Arc<MemoryCredentialStore>,
    http: Arc<ScriptedHttpClient>,
) -> AnalyticsClient {
    let mut tokens = TokenManager::new(auth_config(), store.clone(), http.clone());
    tokens.initialize().expect("initialize ok");
    AnalyticsClient::with_config(
        tokens,
        store,
        http,
        ClientConfig {
            api_base: String::from("https://metrics.example/v3"),
            retry: RetryConfig::no_retry(),
        },
    )
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

fn query(metric: &str, tag: &str) -> MetricQuery {
    let window = DateWindow::trailing(UtcDate::parse("2024-03-10").expect("valid date"), 7)
        .expect("valid window");
    MetricQuery::new(
        vec![Dimension::parse(metric).expect("valid dimension")],
        window,
        tag,
    )
    .expect("valid query")
}

#[tokio::test]
async fn expired_credential_is_refreshed_exactly_once_and_persisted() {
    let store = Arc::new(MemoryCredentialStore::with_profile_id("987654"));
    store
        .set_access_token(&Credential::new(
            "access-old",
            UtcDateTime::now().plus_seconds(-10),
            None,
        ))
        .expect("write ok");
    store.set_refresh_token("refresh-1").expect("write ok");

    let http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        r#"{"access_token":"access-new","expires_in":3600}"#,
    ))]));
    let mut tokens = TokenManager::new(auth_config(), store.clone(), http.clone());
    tokens.initialize().expect("initialize ok");

    let TokenStatus::Valid(credential) = tokens.ensure_valid_token().await else {
        panic!("expected a valid token after refresh");
    };
    assert_eq!(credential.access_token, "access-new");

    let refresh_calls = http
        .recorded_requests()
        .iter()
        .filter(|request| {
            request
                .body
                .as_deref()
                .is_some_and(|body| body.contains("grant_type=refresh_token"))
        })
        .count();
    assert_eq!(refresh_calls, 1);

    let stored = store
        .find_access_token()
        .expect("read ok")
        .expect("credential stored");
    assert_eq!(stored.access_token, "access-new");
}

#[tokio::test]
async fn expired_credential_without_refresh_token_stays_offline() {
    let store = Arc::new(MemoryCredentialStore::with_profile_id("987654"));
    store
        .set_access_token(&Credential::new(
            "access-old",
            UtcDateTime::now().plus_seconds(-10),
            None,
        ))
        .expect("write ok");

    let http = Arc::new(ScriptedHttpClient::new(Vec::new()));
    let mut tokens = TokenManager::new(auth_config(), store, http.clone());
    tokens.initialize().expect("initialize ok");

    assert_eq!(
        tokens.ensure_valid_token().await,
        TokenStatus::Unauthenticated
    );
    assert!(http.recorded_requests().is_empty());
}

#[tokio::test]
async fn three_batched_queries_yield_three_independent_entries() {
    let http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        r#"{"reports":[{"rows":[["100"]]},{"rows":[["200"]]},{"rows":[["300"]]}]}"#,
    ))]));
    let mut client = client_with(authenticated_store(), http.clone());
    client.set_batch_mode(true);

    for (metric, tag) in [
        ("ga:sessions", "_a"),
        ("ga:pageviews", "_b"),
        ("ga:users", "_c"),
    ] {
        let outcome = client.fetch(query(metric, tag)).await.expect("queued ok");
        assert!(matches!(outcome, FetchOutcome::Queued(_)));
    }

    let results = client.execute_batch().await;
    assert_eq!(results.len(), 3);
    assert!(results.values().all(Result::is_ok));
    // One transport round trip for the whole batch.
    assert_eq!(http.recorded_requests().len(), 1);
}

#[tokio::test]
async fn one_rejected_query_does_not_abort_its_siblings() {
    let http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        r#"{"reports":[{"rows":[["100"]]},{"error":{"code":400,"message":"unknown metric"}},{"rows":[["300"]]}]}"#,
    ))]));
    let mut client = client_with(authenticated_store(), http);
    client.set_batch_mode(true);

    client
        .fetch(query("ga:sessions", "_a"))
        .await
        .expect("queued ok");
    client
        .fetch(query("ga:bogus", "_b"))
        .await
        .expect("queued ok");
    client
        .fetch(query("ga:users", "_c"))
        .await
        .expect("queued ok");

    let results = client.execute_batch().await;
    assert_eq!(results.len(), 3);

    let successes = results.values().filter(|value| value.is_ok()).count();
    assert_eq!(successes, 2);

    let failure = results
        .values()
        .find_map(|value| value.as_ref().err())
        .expect("one entry must fail");
    assert_eq!(failure.kind(), FetchErrorKind::UpstreamRejected);
}

#[tokio::test]
async fn executing_an_empty_or_unopened_session_returns_an_empty_map() {
    let http = Arc::new(ScriptedHttpClient::new(Vec::new()));
    let mut client = client_with(authenticated_store(), http.clone());

    // Never opened.
    assert!(client.execute_batch().await.is_empty());

    // Opened but empty.
    client.set_batch_mode(true);
    assert!(client.execute_batch().await.is_empty());

    assert!(http.recorded_requests().is_empty());
}

#[tokio::test]
async fn reenabling_batch_mode_discards_the_previous_session() {
    let http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        r#"{"reports":[{"rows":[["300"]]}]}"#,
    ))]));
    let mut client = client_with(authenticated_store(), http);

    client.set_batch_mode(true);
    client
        .fetch(query("ga:sessions", "_discarded"))
        .await
        .expect("queued ok");

    client.set_batch_mode(true);
    client
        .fetch(query("ga:users", "_kept"))
        .await
        .expect("queued ok");

    let results = client.execute_batch().await;
    assert_eq!(results.len(), 1);
    assert!(results
        .keys()
        .all(|key| key.as_str() == "ga:users_kept"));
}

#[tokio::test]
async fn batch_request_targets_the_selected_profile_and_windows() {
    let http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        r#"{"reports":[{"rows":[["1"]]}]}"#,
    ))]));
    let mut client = client_with(authenticated_store(), http.clone());
    client.set_batch_mode(true);
    client
        .fetch(query("ga:sessions", "_now"))
        .await
        .expect("queued ok");
    client.execute_batch().await;

    let requests = http.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.ends_with("/data/ga:batchGet"));
    let body = requests[0].body.as_deref().expect("batch body present");
    assert!(body.contains(r#""ids":"ga:987654""#));
    assert!(body.contains(r#""start-date":"2024-03-03""#));
    assert!(body.contains(r#""end-date":"2024-03-10""#));
}
