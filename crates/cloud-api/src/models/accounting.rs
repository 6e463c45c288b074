//! Billing and accounting.

use serde::{Deserialize, Serialize};

/// Request for cluster usage within a time window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UsageRequest {
    /// Restrict to a tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Restrict to a project.
    #[serde(rename = "ProjectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Window start (RFC 3339).
    pub from: String,
    /// Window end (RFC 3339). Defaults to now on the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// Usage of all clusters in the requested window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClusterUsageResponse {
    /// Window start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Window end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Per-cluster usage.
    pub usage: Vec<ClusterUsage>,
}

/// Usage of one cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClusterUsage {
    /// Owning tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Owning project.
    #[serde(rename = "ProjectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Cluster ID.
    #[serde(rename = "ClusterID", skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    /// Cluster name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    /// Partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    /// Cluster start (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_start: Option<String>,
    /// Cluster end (RFC 3339), absent while running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_end: Option<String>,
    /// Lifetime within the window, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<u64>,
}
