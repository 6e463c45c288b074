//! Managed postgres databases.

use serde::{Deserialize, Serialize};

/// A managed postgres database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Postgres {
    /// Database ID.
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Free-form description, used as the display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Owning project.
    #[serde(rename = "ProjectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Partition the database runs in.
    #[serde(rename = "PartitionID", skip_serializing_if = "Option::is_none")]
    pub partition_id: Option<String>,
    /// Postgres major version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Number of replicas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_instances: Option<u32>,
    /// Requested resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<PostgresSize>,
    /// Observed status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostgresStatus>,
    /// Creation time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
}

/// Resources requested for a postgres database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PostgresSize {
    /// CPU quantity, e.g. `500m`.
    #[serde(rename = "CPU", skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    /// Storage quantity, e.g. `10Gi`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_size: Option<String>,
}

/// Observed status of a postgres database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PostgresStatus {
    /// Short status, e.g. `Running`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Search criteria for postgres databases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PostgresFilter {
    /// Match by project.
    #[serde(rename = "ProjectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Match by partition.
    #[serde(rename = "PartitionID", skip_serializing_if = "Option::is_none")]
    pub partition_id: Option<String>,
    /// Match by description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
