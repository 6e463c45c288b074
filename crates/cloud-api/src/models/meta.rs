//! API health and version.

use serde::{Deserialize, Serialize};

/// Health status value of a fully healthy API.
pub const HEALTH_STATUS_HEALTHY: &str = "healthy";

/// API health as reported by `/v1/health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Health {
    /// `healthy`, `degraded` or `unhealthy`.
    pub status: String,
    /// Explanation when not healthy.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Health {
    /// Whether the API reports itself as healthy.
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case(HEALTH_STATUS_HEALTHY)
    }
}

/// API build information as reported by `/v1/version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    /// Release version.
    pub version: String,
    /// Source revision.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub revision: String,
    /// Git commit.
    #[serde(rename = "gitsha1", skip_serializing_if = "String::is_empty")]
    pub git_sha1: String,
    /// Build date.
    #[serde(rename = "builddate", skip_serializing_if = "String::is_empty")]
    pub build_date: String,
}
