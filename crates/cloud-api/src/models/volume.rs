//! Block storage volumes.

use serde::{Deserialize, Serialize};

/// A block storage volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Volume {
    /// Volume ID.
    #[serde(rename = "VolumeID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Volume name (usually the persistent volume name).
    #[serde(rename = "VolumeName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owning project.
    #[serde(rename = "ProjectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Owning tenant.
    #[serde(rename = "TenantID", skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Partition of the storage backend.
    #[serde(rename = "PartitionID", skip_serializing_if = "Option::is_none")]
    pub partition_id: Option<String>,
    /// Storage class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    /// Provisioned size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Used bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<u64>,
    /// Volume state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Nodes the volume is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<Vec<String>>,
}

impl Volume {
    /// Whether the volume is attached to no node.
    pub fn is_unbound(&self) -> bool {
        self.attached_to.as_ref().is_none_or(Vec::is_empty)
    }
}

/// Search criteria for volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VolumeFilter {
    /// Match by project.
    #[serde(rename = "ProjectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Match by partition.
    #[serde(rename = "PartitionID", skip_serializing_if = "Option::is_none")]
    pub partition_id: Option<String>,
}
