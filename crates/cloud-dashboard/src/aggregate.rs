//! Reduction of a cluster snapshot into counters and anomaly lists.
//!
//! Counters are always recomputed from the full snapshot. Optional fields
//! that are missing or malformed only drop their own contribution.

use chrono::{DateTime, Utc};
use cloud_api::models::ClusterResponse;
use cloud_api::models::cluster::{
    CONDITION_API_SERVER_AVAILABLE, CONDITION_CONTROL_PLANE_HEALTHY, CONDITION_EVERY_NODE_READY,
    CONDITION_STATUS_TRUE, CONDITION_SYSTEM_COMPONENTS_HEALTHY, OPERATION_STATE_PROCESSING,
    OPERATION_STATE_SUCCEEDED,
};

/// Identity of the cluster an anomaly belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterRef {
    /// Cluster ID.
    pub id: String,
    /// Cluster name.
    pub name: String,
    /// Owning tenant.
    pub tenant: String,
    /// Owning project.
    pub project: String,
}

impl ClusterRef {
    fn of(cluster: &ClusterResponse) -> Self {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            id: field(&cluster.id),
            name: field(&cluster.name),
            tenant: field(&cluster.tenant),
            project: field(&cluster.project_id),
        }
    }
}

/// A condition that does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionAnomaly {
    /// Affected cluster.
    pub cluster: ClusterRef,
    /// Condition type.
    pub condition: String,
    /// Condition message.
    pub message: String,
    /// Last update of the condition.
    pub updated: DateTime<Utc>,
}

/// An error of a cluster's last operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorAnomaly {
    /// Affected cluster.
    pub cluster: ClusterRef,
    /// Error description.
    pub description: String,
    /// Time of the error.
    pub updated: DateTime<Utc>,
}

/// Classification of a cluster's last operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    /// Last operation succeeded.
    Succeeded,
    /// An operation is in progress.
    Processing,
    /// Anything else, including a missing state.
    Unhealthy,
}

impl OperationClass {
    /// Classify a cluster by its last-operation state.
    pub fn of(cluster: &ClusterResponse) -> Self {
        match cluster.last_operation_state() {
            Some(OPERATION_STATE_SUCCEEDED) => Self::Succeeded,
            Some(OPERATION_STATE_PROCESSING) => Self::Processing,
            _ => Self::Unhealthy,
        }
    }
}

/// Counters derived from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateCounters {
    /// Clusters that passed the purpose filter.
    pub processed: usize,
    /// Clusters skipped by the purpose filter.
    pub filtered_out: usize,
    /// Processed clusters whose last operation succeeded.
    pub succeeded: usize,
    /// Processed clusters with an operation in progress.
    pub processing: usize,
    /// Processed clusters in any other state.
    pub unhealthy: usize,
    /// Clusters whose API server is available.
    pub api_server_ok: usize,
    /// Clusters whose control plane is healthy.
    pub control_plane_ok: usize,
    /// Clusters whose nodes are all ready.
    pub nodes_ok: usize,
    /// Clusters whose system components are healthy.
    pub system_ok: usize,
    /// Conditions in error, oldest first.
    pub condition_anomalies: Vec<ConditionAnomaly>,
    /// Last errors, oldest first.
    pub last_errors: Vec<ErrorAnomaly>,
}

/// Readiness percentages per subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gauges {
    /// API server availability.
    pub api_server: u16,
    /// Control-plane health.
    pub control_plane: u16,
    /// Node readiness.
    pub nodes: u16,
    /// System component health.
    pub system: u16,
}

impl AggregateCounters {
    /// Readiness percentages, or `None` when no cluster was processed.
    pub fn gauges(&self) -> Option<Gauges> {
        if self.processed == 0 {
            return None;
        }
        // A cluster may repeat a condition type, so clamp to 100.
        let percent = |ok: usize| (ok * 100 / self.processed).min(100) as u16;
        Some(Gauges {
            api_server: percent(self.api_server_ok),
            control_plane: percent(self.control_plane_ok),
            nodes: percent(self.nodes_ok),
            system: percent(self.system_ok),
        })
    }
}

/// Whether a cluster passes the purpose filter.
pub fn matches_purpose(cluster: &ClusterResponse, purpose: Option<&str>) -> bool {
    purpose.is_none_or(|p| cluster.purpose.as_deref() == Some(p))
}

/// Parse an RFC 3339 timestamp.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Reduce a snapshot into counters.
pub fn aggregate(clusters: &[ClusterResponse], purpose: Option<&str>) -> AggregateCounters {
    let mut counters = AggregateCounters::default();

    for cluster in clusters {
        if !matches_purpose(cluster, purpose) {
            counters.filtered_out += 1;
            continue;
        }
        counters.processed += 1;

        match OperationClass::of(cluster) {
            OperationClass::Succeeded => counters.succeeded += 1,
            OperationClass::Processing => counters.processing += 1,
            OperationClass::Unhealthy => counters.unhealthy += 1,
        }

        for condition in cluster.conditions() {
            let Some(kind) = condition.kind.as_deref() else {
                continue;
            };

            if condition.status.as_deref() == Some(CONDITION_STATUS_TRUE) {
                match kind {
                    CONDITION_API_SERVER_AVAILABLE => counters.api_server_ok += 1,
                    CONDITION_CONTROL_PLANE_HEALTHY => counters.control_plane_ok += 1,
                    CONDITION_EVERY_NODE_READY => counters.nodes_ok += 1,
                    CONDITION_SYSTEM_COMPONENTS_HEALTHY => counters.system_ok += 1,
                    _ => {}
                }
                continue;
            }

            let (Some(message), Some(updated)) = (
                condition.message.as_deref(),
                condition.last_update_time.as_deref().and_then(parse_timestamp),
            ) else {
                continue;
            };

            counters.condition_anomalies.push(ConditionAnomaly {
                cluster: ClusterRef::of(cluster),
                condition: kind.to_string(),
                message: message.to_string(),
                updated,
            });
        }

        for error in cluster.last_errors() {
            let Some(updated) = error.last_update_time.as_deref().and_then(parse_timestamp) else {
                continue;
            };
            counters.last_errors.push(ErrorAnomaly {
                cluster: ClusterRef::of(cluster),
                description: error.description.clone().unwrap_or_default(),
                updated,
            });
        }
    }

    // sort_by_key is stable: equal timestamps keep fetch order.
    counters.condition_anomalies.sort_by_key(|a| a.updated);
    counters.last_errors.sort_by_key(|a| a.updated);

    counters
}
