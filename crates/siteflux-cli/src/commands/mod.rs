mod auth;
mod dashboard;
mod fetch;
mod profiles;

use std::env;
use std::sync::Arc;

use serde_json::Value;
use siteflux_core::{
    AnalyticsClient, AuthConfig, HttpClient, ReqwestHttpClient, TokenManager,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::store::FileCredentialStore;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    match &cli.command {
        Command::Auth { command } => {
            let manager = token_manager(cli)?;
            auth::run(manager, command).await
        }
        Command::Profiles => {
            let mut client = analytics_client(cli)?;
            profiles::list(&mut client).await
        }
        Command::SelectProfile { profile_id } => {
            let store = FileCredentialStore::new(&cli.credentials);
            profiles::select(&store, profile_id)
        }
        Command::ProfileInfo {
            account_id,
            web_property_id,
        } => {
            let mut client = analytics_client(cli)?;
            profiles::info(&mut client, account_id, web_property_id).await
        }
        Command::Fetch {
            metrics,
            days,
            prev,
        } => {
            let mut client = analytics_client(cli)?;
            fetch::run(&mut client, metrics, *days, *prev).await
        }
        Command::Dashboard { days } => {
            let mut client = analytics_client(cli)?;
            dashboard::run(&mut client, *days).await
        }
    }
}

fn auth_config() -> Result<AuthConfig, CliError> {
    let client_id = env::var("SITEFLUX_CLIENT_ID")
        .map_err(|_| CliError::Config(String::from("SITEFLUX_CLIENT_ID is not set")))?;
    let client_secret = env::var("SITEFLUX_CLIENT_SECRET")
        .map_err(|_| CliError::Config(String::from("SITEFLUX_CLIENT_SECRET is not set")))?;
    Ok(AuthConfig::new(client_id, client_secret)?)
}

fn token_manager(cli: &Cli) -> Result<TokenManager, CliError> {
    let store = Arc::new(FileCredentialStore::new(&cli.credentials));
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let mut manager = TokenManager::new(auth_config()?, store, http);
    manager.initialize()?;
    Ok(manager)
}

fn analytics_client(cli: &Cli) -> Result<AnalyticsClient, CliError> {
    let store = Arc::new(FileCredentialStore::new(&cli.credentials));
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let mut manager = TokenManager::new(auth_config()?, store.clone(), http.clone());
    manager.initialize()?;
    Ok(AnalyticsClient::new(manager, store, http))
}
