//! Dashboard state, owned by the event loop.

use chrono::{DateTime, Utc};
use cloud_api::models::Health;
use tracing::debug;

use crate::aggregate::{AggregateCounters, Gauges, aggregate, matches_purpose};
use crate::error::FetchError;
use crate::fetch::{Snapshot, SnapshotFilter};
use crate::tree::VersionTree;

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// Gauges, state counts and anomaly tables.
    #[default]
    Health,
    /// Clusters grouped by kubernetes version.
    Versions,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 2] = [Tab::Health, Tab::Versions];

    /// Tab title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Versions => "Versions",
        }
    }

    /// Position in [`Tab::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Health => 0,
            Self::Versions => 1,
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Health => Self::Versions,
            Self::Versions => Self::Health,
        }
    }
}

/// What a refresh result did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Counters and tree were replaced.
    Applied {
        /// Whether the version tree differs from the previous one.
        tree_changed: bool,
    },
    /// No cluster passed the filter; cluster panels were left as they were.
    Empty,
    /// The fetch failed; the previous view is kept.
    Failed,
}

#[derive(Debug, PartialEq, Eq)]
struct HeaderView {
    health: Option<Health>,
    version: Option<String>,
    last_update: Option<i64>,
    last_error: Option<String>,
}

/// Everything the dashboard draws.
#[derive(Debug)]
pub struct DashboardState {
    /// Cleared on quit.
    pub running: bool,
    /// Visible tab.
    pub selected_tab: Tab,
    /// Active cluster filter.
    pub filter: SnapshotFilter,
    /// API health of the last successful refresh.
    pub api_health: Option<Health>,
    /// API version of the last successful refresh.
    pub api_version: Option<String>,
    /// Time of the last successful refresh.
    pub last_update: Option<DateTime<Utc>>,
    /// Error of the last refresh, if it failed.
    pub last_error: Option<String>,
    /// Counters of the last non-empty refresh.
    pub counters: AggregateCounters,
    /// Readiness gauges of the last non-empty refresh.
    pub gauges: Option<Gauges>,
    /// Clusters by version.
    pub tree: VersionTree,
    /// Terminal size at the last resize.
    pub last_area: Option<(u16, u16)>,
    /// Whether the screen must be redrawn.
    pub needs_redraw: bool,
}

impl DashboardState {
    /// Fresh state for the given filter.
    pub fn new(filter: SnapshotFilter) -> Self {
        Self {
            running: true,
            selected_tab: Tab::default(),
            filter,
            api_health: None,
            api_version: None,
            last_update: None,
            last_error: None,
            counters: AggregateCounters::default(),
            gauges: None,
            tree: VersionTree::default(),
            last_area: None,
            needs_redraw: true,
        }
    }

    /// Apply the result of a refresh.
    ///
    /// Requests a redraw only when something on screen changed. The Health
    /// tab shows ages and is always redrawn. The Versions tab is redrawn when
    /// the tree or a header value changed.
    pub fn apply(&mut self, result: Result<Snapshot, FetchError>) -> RefreshOutcome {
        let header = self.header();
        let outcome = self.apply_result(result);

        let content_changed = match self.selected_tab {
            Tab::Health => true,
            Tab::Versions => matches!(outcome, RefreshOutcome::Applied { tree_changed: true }),
        };
        if content_changed || self.header() != header {
            self.needs_redraw = true;
        }
        outcome
    }

    fn apply_result(&mut self, result: Result<Snapshot, FetchError>) -> RefreshOutcome {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                debug!(error = %err, "refresh failed");
                self.last_error = Some(err.to_string());
                return RefreshOutcome::Failed;
            }
        };

        self.api_health = Some(snapshot.health);
        self.api_version = Some(snapshot.version);
        self.last_update = Some(snapshot.fetched_at);
        self.last_error = None;

        let purpose = self.filter.purpose.as_deref();
        let counters = aggregate(&snapshot.clusters, purpose);
        if counters.processed == 0 {
            debug!(filtered_out = counters.filtered_out, "no clusters to show");
            return RefreshOutcome::Empty;
        }

        self.gauges = counters.gauges();
        self.counters = counters;
        let tree_changed = self.tree.update(
            snapshot
                .clusters
                .iter()
                .filter(|c| matches_purpose(c, purpose)),
        );

        RefreshOutcome::Applied { tree_changed }
    }

    /// Header values at the resolution they are displayed.
    fn header(&self) -> HeaderView {
        HeaderView {
            health: self.api_health.clone(),
            version: self.api_version.clone(),
            last_update: self.last_update.map(|t| t.timestamp()),
            last_error: self.last_error.clone(),
        }
    }

    /// Record a terminal resize. Returns whether the size changed.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        let changed = self.last_area != Some((width, height));
        self.last_area = Some((width, height));
        self.needs_redraw = true;
        changed
    }

    /// Stop the dashboard.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Switch to the next tab.
    pub fn next_tab(&mut self) {
        self.selected_tab = self.selected_tab.next();
        self.needs_redraw = true;
    }

    /// Switch to the previous tab.
    pub fn prev_tab(&mut self) {
        // Two tabs: previous and next coincide.
        self.next_tab();
    }

    /// Show a specific tab.
    pub fn select_tab(&mut self, tab: Tab) {
        self.selected_tab = tab;
        self.needs_redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_api::models::{ClusterStatus, KubernetesSpec, LastOperation};

    fn cluster(id: &str, purpose: &str, state: &str) -> cloud_api::models::ClusterResponse {
        cloud_api::models::ClusterResponse {
            id: Some(id.into()),
            name: Some(id.into()),
            tenant: Some("tenant-a".into()),
            project_id: Some("project-a".into()),
            purpose: Some(purpose.into()),
            kubernetes: Some(KubernetesSpec {
                version: Some("1.24.3".into()),
            }),
            status: Some(ClusterStatus {
                last_operation: Some(LastOperation {
                    state: Some(state.into()),
                    ..LastOperation::default()
                }),
                ..ClusterStatus::default()
            }),
            ..Default::default()
        }
    }

    fn snapshot(clusters: Vec<cloud_api::models::ClusterResponse>) -> Snapshot {
        Snapshot {
            clusters,
            health: Health {
                status: "healthy".into(),
                message: String::new(),
            },
            version: "v0.9.1".into(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn applies_successful_refresh() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        let outcome = state.apply(Ok(snapshot(vec![
            cluster("a", "production", "Succeeded"),
            cluster("b", "production", "Processing"),
        ])));

        assert_eq!(outcome, RefreshOutcome::Applied { tree_changed: true });
        assert_eq!(state.counters.processed, 2);
        assert_eq!(state.api_version.as_deref(), Some("v0.9.1"));
        assert!(state.last_update.is_some());
        assert_eq!(state.tree.roots().len(), 1);
    }

    #[test]
    fn failed_refresh_keeps_previous_view() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        state.apply(Ok(snapshot(vec![cluster("a", "production", "Succeeded")])));
        let gauges = state.gauges;
        let counters = state.counters.clone();

        let outcome = state.apply(Err(FetchError::Source("connection refused".into())));

        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(state.last_error.as_deref(), Some("connection refused"));
        assert_eq!(state.gauges, gauges);
        assert_eq!(state.counters, counters);
        assert_eq!(state.tree.roots().len(), 1);
    }

    #[test]
    fn success_clears_last_error() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        state.apply(Err(FetchError::Source("timeout".into())));
        assert!(state.last_error.is_some());

        state.apply(Ok(snapshot(vec![cluster("a", "production", "Succeeded")])));
        assert!(state.last_error.is_none());
    }

    #[test]
    fn empty_refresh_leaves_cluster_panels() {
        let filter = SnapshotFilter {
            purpose: Some("production".into()),
            ..SnapshotFilter::default()
        };
        let mut state = DashboardState::new(filter);
        state.apply(Ok(snapshot(vec![cluster("a", "production", "Succeeded")])));
        let counters = state.counters.clone();

        let outcome = state.apply(Ok(snapshot(vec![cluster("b", "development", "Error")])));

        assert_eq!(outcome, RefreshOutcome::Empty);
        assert_eq!(state.counters, counters);
        assert!(state.gauges.is_some());
        // Header values are still refreshed.
        assert!(state.last_error.is_none());
    }

    #[test]
    fn first_empty_refresh_has_no_gauges() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        assert_eq!(state.apply(Ok(snapshot(Vec::new()))), RefreshOutcome::Empty);
        assert!(state.gauges.is_none());
        assert_eq!(state.api_version.as_deref(), Some("v0.9.1"));
    }

    #[test]
    fn tree_only_contains_matching_purpose() {
        let filter = SnapshotFilter {
            purpose: Some("production".into()),
            ..SnapshotFilter::default()
        };
        let mut state = DashboardState::new(filter);
        state.apply(Ok(snapshot(vec![
            cluster("a", "production", "Succeeded"),
            cluster("b", "development", "Succeeded"),
        ])));

        assert_eq!(state.tree.roots()[0].label, "1.24 (1)");
        assert_eq!(state.counters.filtered_out, 1);
    }

    #[test]
    fn unchanged_snapshot_reports_no_tree_change() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        let clusters = vec![cluster("a", "production", "Succeeded")];
        state.apply(Ok(snapshot(clusters.clone())));
        let outcome = state.apply(Ok(snapshot(clusters)));
        assert_eq!(outcome, RefreshOutcome::Applied { tree_changed: false });
    }

    #[test]
    fn versions_tab_redraws_only_on_visible_change() {
        let fetched_at = Utc::now();
        let refresh = |clusters: Vec<cloud_api::models::ClusterResponse>, offset: i64| {
            let mut snapshot = snapshot(clusters);
            snapshot.fetched_at = fetched_at + chrono::Duration::seconds(offset);
            Ok(snapshot)
        };
        let mut state = DashboardState::new(SnapshotFilter::default());
        state.select_tab(Tab::Versions);
        let clusters = vec![cluster("a", "production", "Succeeded")];
        state.apply(refresh(clusters.clone(), 0));

        state.needs_redraw = false;
        let outcome = state.apply(refresh(clusters.clone(), 0));
        assert_eq!(outcome, RefreshOutcome::Applied { tree_changed: false });
        assert!(!state.needs_redraw);

        let mut upgraded = clusters;
        upgraded[0].kubernetes = Some(KubernetesSpec {
            version: Some("1.25.0".into()),
        });
        let outcome = state.apply(refresh(upgraded.clone(), 0));
        assert_eq!(outcome, RefreshOutcome::Applied { tree_changed: true });
        assert!(state.needs_redraw);

        state.needs_redraw = false;
        let outcome = state.apply(refresh(upgraded, 5));
        assert_eq!(outcome, RefreshOutcome::Applied { tree_changed: false });
        assert!(state.needs_redraw, "last update time is in the header");
    }

    #[test]
    fn versions_tab_redraws_on_failure() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        state.select_tab(Tab::Versions);
        state.apply(Ok(snapshot(vec![cluster("a", "production", "Succeeded")])));

        state.needs_redraw = false;
        state.apply(Err(FetchError::Source("timeout".into())));
        assert!(state.needs_redraw);

        state.needs_redraw = false;
        state.apply(Err(FetchError::Source("timeout".into())));
        assert!(!state.needs_redraw);
    }

    #[test]
    fn health_tab_always_redraws() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        let first = snapshot(vec![cluster("a", "production", "Succeeded")]);
        let again = first.clone();
        state.apply(Ok(first));

        state.needs_redraw = false;
        let outcome = state.apply(Ok(again));
        assert_eq!(outcome, RefreshOutcome::Applied { tree_changed: false });
        assert!(state.needs_redraw);
    }

    #[test]
    fn resize_reports_changes() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        assert!(state.resize(80, 24));
        assert!(!state.resize(80, 24));
        assert!(state.resize(120, 40));
    }

    #[test]
    fn tabs_cycle() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        assert_eq!(state.selected_tab, Tab::Health);
        state.next_tab();
        assert_eq!(state.selected_tab, Tab::Versions);
        state.next_tab();
        assert_eq!(state.selected_tab, Tab::Health);
        state.prev_tab();
        assert_eq!(state.selected_tab, Tab::Versions);
    }
}
