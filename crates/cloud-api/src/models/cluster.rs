//! Kubernetes cluster resources.
//!
//! Top-level resources use PascalCase keys, the embedded shoot status uses
//! the lowerCamelCase keys of the Kubernetes API it is copied from.

use serde::{Deserialize, Serialize};

/// Condition type reported when the kube-apiserver answers health probes.
pub const CONDITION_API_SERVER_AVAILABLE: &str = "APIServerAvailable";
/// Condition type reported when all control-plane components are healthy.
pub const CONDITION_CONTROL_PLANE_HEALTHY: &str = "ControlPlaneHealthy";
/// Condition type reported when every worker node is ready.
pub const CONDITION_EVERY_NODE_READY: &str = "EveryNodeReady";
/// Condition type reported when the system components in the shoot are healthy.
pub const CONDITION_SYSTEM_COMPONENTS_HEALTHY: &str = "SystemComponentsHealthy";

/// Status value of a condition that holds.
pub const CONDITION_STATUS_TRUE: &str = "True";

/// Last-operation state of a successfully reconciled cluster.
pub const OPERATION_STATE_SUCCEEDED: &str = "Succeeded";
/// Last-operation state of a cluster that is currently being reconciled.
pub const OPERATION_STATE_PROCESSING: &str = "Processing";

/// A cluster as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClusterResponse {
    /// Cluster ID.
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Cluster name, unique within its project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Owning project.
    #[serde(rename = "ProjectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Partition the cluster runs in.
    #[serde(rename = "PartitionID", skip_serializing_if = "Option::is_none")]
    pub partition_id: Option<String>,
    /// Cluster purpose (production, development, evaluation, infrastructure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Kubernetes settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<KubernetesSpec>,
    /// Worker groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<Vec<Worker>>,
    /// Observed status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ClusterStatus>,
    /// Creation time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
}

impl ClusterResponse {
    /// The kubernetes version, if reported.
    pub fn version(&self) -> Option<&str> {
        self.kubernetes.as_ref()?.version.as_deref()
    }

    /// The last-operation state, if reported and non-empty.
    pub fn last_operation_state(&self) -> Option<&str> {
        self.status
            .as_ref()?
            .last_operation
            .as_ref()?
            .state
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    /// Conditions reported for this cluster. Empty when absent.
    pub fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .and_then(|s| s.conditions.as_deref())
            .unwrap_or_default()
    }

    /// Last errors reported for this cluster. Empty when absent.
    pub fn last_errors(&self) -> &[LastError] {
        self.status
            .as_ref()
            .and_then(|s| s.last_errors.as_deref())
            .unwrap_or_default()
    }

    /// Total worker machines across all worker groups (minimum sizes).
    pub fn worker_minimum(&self) -> u32 {
        self.workers
            .iter()
            .flatten()
            .filter_map(|w| w.minimum)
            .sum()
    }
}

/// Kubernetes settings of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct KubernetesSpec {
    /// Kubernetes version, e.g. `1.24.3`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A worker group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Worker {
    /// Worker group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Machine type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<String>,
    /// Minimum machine count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u32>,
    /// Maximum machine count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<u32>,
}

/// Observed cluster status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterStatus {
    /// Health conditions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
    /// Most recent reconciliation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_operation: Option<LastOperation>,
    /// Errors of the most recent reconciliation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_errors: Option<Vec<LastError>>,
}

/// A named health signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Condition {
    /// Condition type, e.g. [`CONDITION_EVERY_NODE_READY`].
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// `True`, `False`, `Unknown` or `Progressing`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Machine-readable reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Last update (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<String>,
}

/// The most recent reconciliation of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LastOperation {
    /// Operation type (Create, Reconcile, Delete, ...).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Operation state (Succeeded, Processing, Error, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Progress in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Last update (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<String>,
}

/// An error of the most recent reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LastError {
    /// Error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Task that failed.
    #[serde(rename = "taskID", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Time of the error (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<String>,
}

/// Search criteria for clusters. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClusterFilter {
    /// Match by ID.
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Match by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Match by tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Match by project.
    #[serde(rename = "ProjectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Match by partition.
    #[serde(rename = "PartitionID", skip_serializing_if = "Option::is_none")]
    pub partition_id: Option<String>,
    /// Match by purpose.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}
