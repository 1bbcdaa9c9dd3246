use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] siteflux_core::ValidationError),

    #[error(transparent)]
    Fetch(#[from] siteflux_core::FetchError),

    #[error(transparent)]
    Store(#[from] siteflux_core::StoreError),

    #[error(transparent)]
    Core(#[from] siteflux_core::CoreError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) => 2,
            Self::Fetch(_) => 4,
            Self::Store(_) | Self::Core(_) | Self::Command(_) | Self::Serialization(_)
            | Self::Io(_) => 10,
        }
    }
}
