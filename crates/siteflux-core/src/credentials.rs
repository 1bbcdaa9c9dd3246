use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::domain::UtcDateTime;
use crate::StoreError;

/// Tokens within this many seconds of expiry count as expired, so a token
/// cannot lapse between the local check and the upstream call.
const EXPIRY_SKEW_SECONDS: i64 = 60;

/// OAuth-style credential: short-lived access token plus expiry, and the
/// long-lived refresh token when one has been granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: UtcDateTime,
    pub refresh_token: Option<String>,
}

impl Credential {
    pub fn new(
        access_token: impl Into<String>,
        expires_at: UtcDateTime,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
            refresh_token,
        }
    }

    /// Local-clock expiry check with skew allowance. Never probes the API.
    pub fn is_expired_at(&self, now: UtcDateTime) -> bool {
        now.plus_seconds(EXPIRY_SKEW_SECONDS) >= self.expires_at
    }
}

/// Durable credential storage consumed by the token lifecycle.
///
/// The access token and the refresh token are persisted through separate
/// channels: `set_access_token` replaces the short-lived credential, while
/// the refresh token is only ever written via `set_refresh_token` and is
/// never discarded by an access-token update. The profile id is written by
/// external configuration and read-only here.
pub trait CredentialStore: Send + Sync {
    fn find_access_token(&self) -> Result<Option<Credential>, StoreError>;
    fn set_access_token(&self, credential: &Credential) -> Result<(), StoreError>;
    fn find_refresh_token(&self) -> Result<Option<String>, StoreError>;
    fn set_refresh_token(&self, token: &str) -> Result<(), StoreError>;
    fn find_profile_id(&self) -> Result<Option<String>, StoreError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    credential: Option<Credential>,
    refresh_token: Option<String>,
    profile_id: Option<String>,
}

/// In-process credential store used by tests and single-shot tooling.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    state: Mutex<MemoryState>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile_id(profile_id: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .state
            .lock()
            .expect("memory store should not be poisoned")
            .profile_id = Some(profile_id.into());
        store
    }

    /// Profile selection is external configuration, so it is not part of
    /// the `CredentialStore` trait.
    pub fn set_profile_id(&self, profile_id: impl Into<String>) {
        self.state
            .lock()
            .expect("memory store should not be poisoned")
            .profile_id = Some(profile_id.into());
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn find_access_token(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self
            .state
            .lock()
            .expect("memory store should not be poisoned")
            .credential
            .clone())
    }

    fn set_access_token(&self, credential: &Credential) -> Result<(), StoreError> {
        self.state
            .lock()
            .expect("memory store should not be poisoned")
            .credential = Some(credential.clone());
        Ok(())
    }

    fn find_refresh_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .state
            .lock()
            .expect("memory store should not be poisoned")
            .refresh_token
            .clone())
    }

    fn set_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        self.state
            .lock()
            .expect("memory store should not be poisoned")
            .refresh_token = Some(token.to_owned());
        Ok(())
    }

    fn find_profile_id(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .state
            .lock()
            .expect("memory store should not be poisoned")
            .profile_id
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_check_applies_skew_allowance() {
        let now = UtcDateTime::parse("2024-03-10T12:00:00Z").expect("valid timestamp");

        let fresh = Credential::new("token", now.plus_seconds(3600), None);
        assert!(!fresh.is_expired_at(now));

        let lapsing = Credential::new("token", now.plus_seconds(30), None);
        assert!(lapsing.is_expired_at(now));

        let lapsed = Credential::new("token", now.plus_seconds(-1), None);
        assert!(lapsed.is_expired_at(now));
    }

    #[test]
    fn access_token_update_does_not_clobber_refresh_token() {
        let store = MemoryCredentialStore::new();
        store.set_refresh_token("refresh-1").expect("write ok");

        let now = UtcDateTime::now();
        store
            .set_access_token(&Credential::new("access-1", now.plus_seconds(3600), None))
            .expect("write ok");

        assert_eq!(
            store.find_refresh_token().expect("read ok").as_deref(),
            Some("refresh-1")
        );
    }

    #[test]
    fn profile_id_roundtrips() {
        let store = MemoryCredentialStore::with_profile_id("987654");
        assert_eq!(
            store.find_profile_id().expect("read ok").as_deref(),
            Some("987654")
        );
    }
}
