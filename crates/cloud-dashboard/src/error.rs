//! Error types for the dashboard.

use thiserror::Error;

/// Errors that stop the dashboard before or while it runs.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The terminal could not be set up, drawn to or restored.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Unknown color theme name.
    #[error("invalid color theme '{0}', expected one of: default, dark")]
    InvalidTheme(String),

    /// Invalid refresh interval.
    #[error("refresh interval must be greater than zero")]
    InvalidInterval,
}

/// A failed refresh. Shown inline, never fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API call failed.
    #[error(transparent)]
    Api(#[from] cloud_api::ApiError),

    /// Any other source failure.
    #[error("{0}")]
    Source(String),
}
