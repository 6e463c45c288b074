//! Snapshot fetching.
//!
//! A snapshot is the full cluster list plus the API health and version,
//! taken in one refresh cycle. Any failing call fails the whole snapshot.

use std::future::Future;

use chrono::{DateTime, Utc};
use cloud_api::ApiClient;
use cloud_api::models::{ClusterFilter, ClusterResponse, Health};
use tracing::debug;

use crate::error::FetchError;

/// Restricts which clusters the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotFilter {
    /// Only clusters of this tenant.
    pub tenant: Option<String>,
    /// Only clusters in this partition.
    pub partition: Option<String>,
    /// Only clusters with this purpose. Applied while aggregating, not while
    /// fetching, so that filtered-out clusters can be counted.
    pub purpose: Option<String>,
}

impl SnapshotFilter {
    /// The server-side part of the filter.
    pub fn cluster_filter(&self) -> ClusterFilter {
        ClusterFilter {
            tenant: self.tenant.clone(),
            partition_id: self.partition.clone(),
            ..ClusterFilter::default()
        }
    }

    /// One-line description for the header.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = [
            ("tenant", &self.tenant),
            ("partition", &self.partition),
            ("purpose", &self.purpose),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| format!("{name}={v}")))
        .collect();

        if parts.is_empty() {
            "all clusters".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// One refresh cycle's observed state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// All clusters matching the server-side filter.
    pub clusters: Vec<ClusterResponse>,
    /// API health.
    pub health: Health,
    /// API version string.
    pub version: String,
    /// When the snapshot was taken.
    pub fetched_at: DateTime<Utc>,
}

/// Source of snapshots.
///
/// Implemented by [`ApiClient`]; tests use fakes.
pub trait SnapshotSource: Send + Sync + 'static {
    /// Fetch a fresh snapshot.
    fn fetch(
        &self,
        filter: &SnapshotFilter,
    ) -> impl Future<Output = Result<Snapshot, FetchError>> + Send;
}

impl SnapshotSource for ApiClient {
    async fn fetch(&self, filter: &SnapshotFilter) -> Result<Snapshot, FetchError> {
        let cluster_filter = filter.cluster_filter();
        let (clusters, health, version) = tokio::try_join!(
            self.list_clusters(&cluster_filter),
            self.health(),
            self.version(),
        )?;

        debug!(clusters = clusters.len(), health = %health.status, "fetched snapshot");

        Ok(Snapshot {
            clusters,
            health,
            version: version.version,
            fetched_at: Utc::now(),
        })
    }
}
