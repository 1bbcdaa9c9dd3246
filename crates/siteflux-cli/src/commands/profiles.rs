use serde_json::{json, Value};
use siteflux_core::AnalyticsClient;

use crate::error::CliError;
use crate::store::FileCredentialStore;

pub async fn list(client: &mut AnalyticsClient) -> Result<Value, CliError> {
    let profiles = client.list_profiles().await?;
    Ok(json!({ "profiles": profiles }))
}

pub fn select(store: &FileCredentialStore, profile_id: &str) -> Result<Value, CliError> {
    store.set_profile_id(profile_id)?;
    Ok(json!({ "profile_id": profile_id }))
}

pub async fn info(
    client: &mut AnalyticsClient,
    account_id: &str,
    web_property_id: &str,
) -> Result<Value, CliError> {
    let info = client.profile_info(account_id, web_property_id).await?;
    Ok(json!({ "profile": info }))
}
