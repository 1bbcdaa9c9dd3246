//! Credential lifecycle: authorization-code exchange, expiry-driven
//! refresh and revocation.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, warn};

use crate::credentials::{Credential, CredentialStore};
use crate::domain::UtcDateTime;
use crate::http_client::{HttpClient, HttpRequest};
use crate::{StoreError, ValidationError};

/// Read-only scope requested during authorization.
pub const METRICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

/// Out-of-band redirect for installed applications without a callback URL.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

const DEFAULT_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_REVOKE_ENDPOINT: &str = "https://oauth2.googleapis.com/revoke";

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3_600;

/// OAuth client configuration for the upstream authorization server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_endpoint: String,
    pub token_endpoint: String,
    pub revoke_endpoint: String,
}

impl AuthConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(ValidationError::MissingClientCredentials);
        }

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri: String::from(OOB_REDIRECT_URI),
            scope: String::from(METRICS_READONLY_SCOPE),
            auth_endpoint: String::from(DEFAULT_AUTH_ENDPOINT),
            token_endpoint: String::from(DEFAULT_TOKEN_ENDPOINT),
            revoke_endpoint: String::from(DEFAULT_REVOKE_ENDPOINT),
        })
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_endpoints(
        mut self,
        auth: impl Into<String>,
        token: impl Into<String>,
        revoke: impl Into<String>,
    ) -> Self {
        self.auth_endpoint = auth.into();
        self.token_endpoint = token.into();
        self.revoke_endpoint = revoke.into();
        self
    }
}

/// Outcome of a token validity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Valid(Credential),
    Unauthenticated,
}

impl TokenStatus {
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Token endpoint response body.
#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenGrant {
    fn into_credential(self, issued_at: UtcDateTime) -> Credential {
        let ttl = self.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);
        Credential::new(
            self.access_token,
            issued_at.plus_seconds(ttl),
            self.refresh_token,
        )
    }
}

/// Owns the live credential and drives exchange, refresh and revocation
/// against the authorization server, writing every mutation through the
/// store before considering it committed.
///
/// Expected failures (stale code, revoked refresh token, transport outage)
/// are logged at this boundary and surfaced as plain results; nothing here
/// is fatal to the caller.
pub struct TokenManager {
    config: AuthConfig,
    store: Arc<dyn CredentialStore>,
    http: Arc<dyn HttpClient>,
    credential: Option<Credential>,
}

impl TokenManager {
    pub fn new(config: AuthConfig, store: Arc<dyn CredentialStore>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            store,
            http,
            credential: None,
        }
    }

    /// Load the stored credential, if any. Absence is a valid
    /// unauthenticated state, not an error.
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        self.credential = self.store.find_access_token()?;
        Ok(())
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// URL the end user must visit to grant access. Pure construction,
    /// no side effects.
    pub fn authorization_url(&self) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&access_type=offline",
            self.config.auth_endpoint,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&self.config.scope),
        )
    }

    /// Exchange an authorization code for tokens and persist them.
    ///
    /// The access token is persisted unconditionally; the refresh token
    /// only when the grant carries one, since re-grants may omit it. A
    /// previously stored refresh token is never discarded. Returns `false`
    /// on any failure, leaving stored state untouched.
    pub async fn complete_authorization(&mut self, code: &str) -> bool {
        let request = HttpRequest::post(&self.config.token_endpoint).with_form_body(&[
            ("code", code),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("redirect_uri", &self.config.redirect_uri),
            ("grant_type", "authorization_code"),
        ]);

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "authorization code exchange failed");
                return false;
            }
        };

        if !response.is_success() {
            error!(
                status = response.status,
                "token endpoint rejected the authorization code"
            );
            return false;
        }

        let grant: TokenGrant = match serde_json::from_str(&response.body) {
            Ok(grant) => grant,
            Err(err) => {
                error!(error = %err, "malformed token grant payload");
                return false;
            }
        };

        let credential = grant.into_credential(UtcDateTime::now());

        if let Err(err) = self.store.set_access_token(&credential) {
            error!(error = %err, "failed to persist access token");
            return false;
        }
        if let Some(refresh_token) = credential.refresh_token.as_deref() {
            if let Err(err) = self.store.set_refresh_token(refresh_token) {
                error!(error = %err, "failed to persist refresh token");
                return false;
            }
        }

        self.credential = Some(credential);
        true
    }

    /// Return a credential usable for an upstream call, refreshing first
    /// when the loaded one has expired.
    ///
    /// Expiry is decided by local clock against the stored expiry instant,
    /// never by probing the API. Refresh failures are logged and surfaced
    /// as `Unauthenticated`.
    pub async fn ensure_valid_token(&mut self) -> TokenStatus {
        let Some(credential) = self.credential.clone() else {
            return TokenStatus::Unauthenticated;
        };

        if !credential.is_expired_at(UtcDateTime::now()) {
            return TokenStatus::Valid(credential);
        }

        self.refresh().await
    }

    async fn refresh(&mut self) -> TokenStatus {
        let refresh_token = match self.store.find_refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("access token expired and no refresh token is stored");
                return TokenStatus::Unauthenticated;
            }
            Err(err) => {
                error!(error = %err, "credential store read failed during refresh");
                return TokenStatus::Unauthenticated;
            }
        };

        let request = HttpRequest::post(&self.config.token_endpoint).with_form_body(&[
            ("refresh_token", &refresh_token),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("grant_type", "refresh_token"),
        ]);

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "token refresh transport failure");
                return TokenStatus::Unauthenticated;
            }
        };

        if !response.is_success() {
            // Typically a revoked grant; the caller must re-authorize.
            warn!(status = response.status, "refresh token was rejected");
            return TokenStatus::Unauthenticated;
        }

        let grant: TokenGrant = match serde_json::from_str(&response.body) {
            Ok(grant) => grant,
            Err(err) => {
                warn!(error = %err, "malformed refresh grant payload");
                return TokenStatus::Unauthenticated;
            }
        };

        let rotated_refresh = grant.refresh_token.clone();
        let mut credential = grant.into_credential(UtcDateTime::now());
        if credential.refresh_token.is_none() {
            credential.refresh_token = Some(refresh_token);
        }

        if let Err(err) = self.store.set_access_token(&credential) {
            error!(error = %err, "failed to persist refreshed access token");
            return TokenStatus::Unauthenticated;
        }
        if let Some(rotated) = rotated_refresh.as_deref() {
            if let Err(err) = self.store.set_refresh_token(rotated) {
                error!(error = %err, "failed to persist rotated refresh token");
                return TokenStatus::Unauthenticated;
            }
        }

        self.credential = Some(credential.clone());
        TokenStatus::Valid(credential)
    }

    /// Ask the upstream to invalidate the current token. The store is not
    /// cleared here; revocation failure must not corrupt local state.
    pub async fn revoke(&mut self) -> bool {
        let credential = match &self.credential {
            Some(credential) => credential.clone(),
            None => match self.store.find_access_token() {
                Ok(Some(credential)) => credential,
                Ok(None) => {
                    warn!("no credential to revoke");
                    return false;
                }
                Err(err) => {
                    error!(error = %err, "credential store read failed during revocation");
                    return false;
                }
            },
        };

        let request = HttpRequest::post(&self.config.revoke_endpoint)
            .with_form_body(&[("token", &credential.access_token)]);

        match self.http.execute(request).await {
            Ok(response) if response.is_success() => true,
            Ok(response) => {
                warn!(status = response.status, "revocation was rejected upstream");
                false
            }
            Err(err) => {
                warn!(error = %err, "revocation transport failure");
                false
            }
        }
    }
}
