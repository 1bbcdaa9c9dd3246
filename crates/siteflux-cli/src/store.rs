//! JSON-file credential store for the admin CLI.
//!
//! Reads and writes use whole-file read-modify-write with last-writer-wins
//! semantics, which is sufficient for a single admin credential.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use siteflux_core::{Credential, CredentialStore, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct FileState {
    #[serde(default)]
    credential: Option<Credential>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    profile_id: Option<String>,
}

/// Credential store persisted as a single JSON file.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Profile selection is external configuration, so it is not part of
    /// the `CredentialStore` trait.
    pub fn set_profile_id(&self, profile_id: &str) -> Result<(), StoreError> {
        let mut state = self.load()?;
        state.profile_id = Some(profile_id.to_owned());
        self.save(&state)
    }

    fn load(&self) -> Result<FileState, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|err| StoreError::Read(format!("{}: {err}", self.path.display()))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(FileState::default()),
            Err(err) => Err(StoreError::Read(format!(
                "{}: {err}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, state: &FileState) -> Result<(), StoreError> {
        let payload = serde_json::to_string_pretty(state)
            .map_err(|err| StoreError::Write(err.to_string()))?;
        fs::write(&self.path, payload)
            .map_err(|err| StoreError::Write(format!("{}: {err}", self.path.display())))
    }
}

impl CredentialStore for FileCredentialStore {
    fn find_access_token(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.load()?.credential)
    }

    fn set_access_token(&self, credential: &Credential) -> Result<(), StoreError> {
        let mut state = self.load()?;
        state.credential = Some(credential.clone());
        self.save(&state)
    }

    fn find_refresh_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.refresh_token)
    }

    fn set_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let mut state = self.load()?;
        state.refresh_token = Some(token.to_owned());
        self.save(&state)
    }

    fn find_profile_id(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.profile_id)
    }
}
