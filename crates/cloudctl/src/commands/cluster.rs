//! Cluster command implementation.

use std::io::Write;

use chrono::Utc;
use cloud_api::ApiClient;
use cloud_api::models::cluster::{
    CONDITION_API_SERVER_AVAILABLE, CONDITION_CONTROL_PLANE_HEALTHY, CONDITION_EVERY_NODE_READY,
    CONDITION_STATUS_TRUE, CONDITION_SYSTEM_COMPONENTS_HEALTHY,
};
use cloud_api::models::{ClusterFilter, ClusterResponse};
use cloud_dashboard::aggregate::parse_timestamp;
use cloud_dashboard::ui::format_age;
use tracing::debug;

use super::by_key;
use crate::cli::{ClusterCommands, ClusterListArgs};
use crate::error::CliError;
use crate::output::{OutputFormat, ResourceKind, Tabular, cell};

/// Cluster command executor.
pub struct ClusterCommand<'a> {
    client: &'a ApiClient,
}

impl<'a> ClusterCommand<'a> {
    /// Create a new cluster command.
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute a cluster subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ClusterCommands,
    ) -> Result<(), CliError> {
        match command {
            ClusterCommands::List(args) => {
                let clusters = self.list(args).await?;
                format.write_list(writer, &clusters)?;
            }
            ClusterCommands::Describe { id } => {
                let cluster = self.client.get_cluster(id).await?;
                format.write_detail(writer, &cluster)?;
            }
        }
        Ok(())
    }

    /// List clusters sorted by tenant, project and name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self, args: &ClusterListArgs) -> Result<Vec<ClusterResponse>, CliError> {
        let filter = ClusterFilter {
            id: None,
            name: args.name.clone(),
            tenant: args.tenant.clone(),
            project_id: args.project.clone(),
            partition_id: args.partition.clone(),
            purpose: args.purpose.clone(),
        };
        let mut clusters = self.client.list_clusters(&filter).await?;
        debug!(count = clusters.len(), "listed clusters");

        sort_clusters(&mut clusters);
        Ok(clusters)
    }
}

fn sort_clusters(clusters: &mut [ClusterResponse]) {
    clusters.sort_by(|a, b| {
        by_key(a.tenant.as_deref(), b.tenant.as_deref())
            .then_with(|| by_key(a.project_id.as_deref(), b.project_id.as_deref()))
            .then_with(|| by_key(a.name.as_deref(), b.name.as_deref()))
    });
}

/// `✓` for a true condition, `✗` for any other status, `?` if not reported.
fn condition_symbol(cluster: &ClusterResponse, kind: &str) -> &'static str {
    let condition = cluster
        .conditions()
        .iter()
        .find(|c| c.kind.as_deref() == Some(kind));
    match condition.and_then(|c| c.status.as_deref()) {
        Some(CONDITION_STATUS_TRUE) => "✓",
        Some(_) => "✗",
        None => "?",
    }
}

fn age(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(parse_timestamp)
        .map(|created| format_age(created, Utc::now()))
        .unwrap_or_default()
}

impl Tabular for ClusterResponse {
    const KIND: ResourceKind = ResourceKind::Cluster;

    fn row(&self, wide: bool) -> Vec<String> {
        let progress = self
            .status
            .as_ref()
            .and_then(|s| s.last_operation.as_ref())
            .and_then(|op| op.progress)
            .map(|p| format!("{p}%"));

        let mut row = vec![
            cell(self.id.as_deref()),
            cell(self.tenant.as_deref()),
            cell(self.project_id.as_deref()),
            cell(self.name.as_deref()),
            cell(self.partition_id.as_deref()),
            cell(self.purpose.as_deref()),
            cell(self.version()),
            cell(self.last_operation_state()),
            cell(progress),
            condition_symbol(self, CONDITION_API_SERVER_AVAILABLE).to_string(),
            condition_symbol(self, CONDITION_CONTROL_PLANE_HEALTHY).to_string(),
            condition_symbol(self, CONDITION_EVERY_NODE_READY).to_string(),
            condition_symbol(self, CONDITION_SYSTEM_COMPONENTS_HEALTHY).to_string(),
            age(self.creation_timestamp.as_deref()),
        ];
        if wide {
            let workers = self.workers.as_ref().map(|_| self.worker_minimum());
            row.push(cell(workers));
            row.push(cell(self.description.as_deref()));
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use crate::commands::test_support::{format, serve, template, text};
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    fn router() -> Router {
        Router::new()
            .route(
                "/v1/cluster/find",
                post(|Json(filter): Json<Value>| async move {
                    let all = json!([
                        {"ID": "c-3", "Name": "zeta", "Tenant": "b", "ProjectID": "p1"},
                        {"ID": "c-1", "Name": "beta", "Tenant": "a", "ProjectID": "p2",
                         "Purpose": "production"},
                        {"ID": "c-2", "Name": "alpha", "Tenant": "a", "ProjectID": "p2",
                         "Purpose": "evaluation"}
                    ]);
                    let purpose = filter.get("Purpose").and_then(Value::as_str).map(str::to_string);
                    let items: Vec<Value> = all
                        .as_array()
                        .cloned()
                        .unwrap_or_default()
                        .into_iter()
                        .filter(|c| purpose.as_deref().is_none_or(|p| c["Purpose"] == p))
                        .collect();
                    Json(Value::Array(items))
                }),
            )
            .route(
                "/v1/cluster/{id}",
                get(|Path(id): Path<String>| async move {
                    if id == "missing" {
                        (StatusCode::NOT_FOUND, Json(json!({"message": "cluster not found"})))
                    } else {
                        (StatusCode::OK, Json(json!({"ID": id, "Name": "beta"})))
                    }
                }),
            )
    }

    fn cluster(conditions: Value) -> ClusterResponse {
        serde_json::from_value(json!({
            "ID": "c-1",
            "Name": "beta",
            "Tenant": "a",
            "ProjectID": "p2",
            "PartitionID": "fra-1",
            "Purpose": "production",
            "Kubernetes": {"Version": "1.24.3"},
            "Workers": [{"Minimum": 2}, {"Minimum": 1}],
            "Status": {
                "lastOperation": {"state": "Succeeded", "progress": 100},
                "conditions": conditions
            }
        }))
        .expect("valid cluster")
    }

    #[tokio::test]
    async fn list_is_sorted_by_tenant_project_name() {
        let client = serve(router()).await;
        let cmd = ClusterCommand::new(&client);
        let mut buf = Vec::new();

        cmd.execute(
            &mut buf,
            &template("{{ .ID }}"),
            &ClusterCommands::List(ClusterListArgs::default()),
        )
        .await
        .expect("list should succeed");

        assert_eq!(text(buf), "c-2\nc-1\nc-3\n");
    }

    #[tokio::test]
    async fn list_passes_filters() {
        let client = serve(router()).await;
        let args = ClusterListArgs {
            purpose: Some("production".into()),
            ..ClusterListArgs::default()
        };

        let clusters = ClusterCommand::new(&client).list(&args).await.expect("list");

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].id.as_deref(), Some("c-1"));
    }

    #[tokio::test]
    async fn describe_prints_yaml_in_table_format() {
        let client = serve(router()).await;
        let mut buf = Vec::new();

        ClusterCommand::new(&client)
            .execute(
                &mut buf,
                &format(Format::Table),
                &ClusterCommands::Describe { id: "c-9".into() },
            )
            .await
            .expect("describe should succeed");

        assert_eq!(text(buf), "ID: c-9\nName: beta\n");
    }

    #[tokio::test]
    async fn describe_missing_cluster_fails() {
        let client = serve(router()).await;
        let mut buf = Vec::new();

        let err = ClusterCommand::new(&client)
            .execute(
                &mut buf,
                &format(Format::Json),
                &ClusterCommands::Describe { id: "missing".into() },
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("cluster not found"));
        assert!(buf.is_empty());
    }

    #[test]
    fn row_shows_condition_symbols() {
        let c = cluster(json!([
            {"type": "APIServerAvailable", "status": "True"},
            {"type": "EveryNodeReady", "status": "False"}
        ]));

        let row = c.row(false);

        assert_eq!(row[6], "1.24.3");
        assert_eq!(row[7], "Succeeded");
        assert_eq!(row[8], "100%");
        assert_eq!(&row[9..13], ["✓", "?", "✗", "?"]);
        // No creation timestamp.
        assert_eq!(row[13], "");
    }

    #[test]
    fn wide_row_adds_workers_and_description() {
        let row = cluster(json!([])).row(true);
        assert_eq!(row.len(), 16);
        assert_eq!(row[14], "3");
        assert_eq!(row[15], "");
    }

    #[test]
    fn absent_fields_are_empty_cells() {
        let row = ClusterResponse::default().row(true);
        assert_eq!(row[0], "");
        assert_eq!(row[8], "");
        assert_eq!(row[14], "");
    }
}
