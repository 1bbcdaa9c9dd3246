//! CLI argument definitions for siteflux.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Authenticated analytics aggregation CLI.
///
/// Drives the authorization flow against the upstream analytics provider,
/// selects a metrics profile and fetches traffic metrics over trailing or
/// preceding day windows, individually or batched.
#[derive(Debug, Parser)]
#[command(name = "siteflux", version, about = "Authenticated analytics aggregation CLI")]
pub struct Cli {
    /// Credential file backing the token lifecycle.
    #[arg(long, global = true, default_value = "siteflux-credentials.json")]
    pub credentials: PathBuf,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage upstream authorization.
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// List metrics profiles reachable with the current grant.
    Profiles,

    /// Select the profile that later fetches target.
    SelectProfile { profile_id: String },

    /// Show details for one account/property pair.
    ProfileInfo {
        account_id: String,
        web_property_id: String,
    },

    /// Fetch metrics over a trailing or preceding day window.
    Fetch {
        /// Metric dimensions, e.g. ga:sessions.
        #[arg(required = true)]
        metrics: Vec<String>,

        /// Window length in days.
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Query the window preceding the trailing one.
        #[arg(long, default_value_t = false)]
        prev: bool,
    },

    /// Batched traffic overview: sessions, pageviews and users for the
    /// current and previous windows in one round trip.
    Dashboard {
        /// Window length in days.
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Print the URL the account owner must visit to grant access.
    Url,
    /// Exchange an authorization code for tokens.
    Complete { code: String },
    /// Check whether a usable access token is available, refreshing it
    /// when expired.
    Status,
    /// Ask the upstream to invalidate the current token. The credential
    /// file is left untouched.
    Revoke,
}
