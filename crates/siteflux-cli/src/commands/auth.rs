use serde_json::{json, Value};
use siteflux_core::TokenManager;

use crate::cli::AuthCommand;
use crate::error::CliError;

pub async fn run(mut manager: TokenManager, command: &AuthCommand) -> Result<Value, CliError> {
    match command {
        AuthCommand::Url => Ok(json!({
            "authorization_url": manager.authorization_url(),
        })),
        AuthCommand::Complete { code } => {
            if manager.complete_authorization(code).await {
                Ok(json!({ "authorized": true }))
            } else {
                Err(CliError::Command(String::from(
                    "the authorization code was rejected; request a fresh one and retry",
                )))
            }
        }
        AuthCommand::Status => {
            let status = manager.ensure_valid_token().await;
            Ok(json!({ "authenticated": status.is_valid() }))
        }
        AuthCommand::Revoke => {
            if manager.revoke().await {
                Ok(json!({ "revoked": true }))
            } else {
                Err(CliError::Command(String::from(
                    "revocation failed; the stored credential is unchanged",
                )))
            }
        }
    }
}
