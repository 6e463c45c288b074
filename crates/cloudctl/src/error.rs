//! CLI error types.

use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// API request failed.
    #[error(transparent)]
    Api(#[from] cloud_api::ApiError),

    /// Dashboard failed to start or run.
    #[error("dashboard error: {0}")]
    Dashboard(#[from] cloud_dashboard::DashboardError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format(format!("JSON serialization failed: {err}"))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Format(format!("YAML serialization failed: {err}"))
    }
}
