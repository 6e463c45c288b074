//! Project command implementation.

use std::io::Write;

use cloud_api::ApiClient;
use cloud_api::models::Project;

use super::by_key;
use crate::cli::ProjectCommands;
use crate::error::CliError;
use crate::output::{OutputFormat, ResourceKind, Tabular, cell};

/// Project command executor.
pub struct ProjectCommand<'a> {
    client: &'a ApiClient,
}

impl<'a> ProjectCommand<'a> {
    /// Create a new project command.
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute a project subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ProjectCommands,
    ) -> Result<(), CliError> {
        match command {
            ProjectCommands::List { tenant } => {
                let mut projects = self.client.list_projects(tenant.as_deref()).await?;
                projects.sort_by(|a, b| {
                    by_key(a.tenant_id.as_deref(), b.tenant_id.as_deref())
                        .then_with(|| by_key(a.name.as_deref(), b.name.as_deref()))
                });
                format.write_list(writer, &projects)?;
            }
            ProjectCommands::Describe { id } => {
                let project = self.client.get_project(id).await?;
                format.write_detail(writer, &project)?;
            }
        }
        Ok(())
    }
}

impl Tabular for Project {
    const KIND: ResourceKind = ResourceKind::Project;

    fn row(&self, wide: bool) -> Vec<String> {
        let mut row = vec![
            cell(self.id.as_deref()),
            cell(self.name.as_deref()),
            cell(self.description.as_deref()),
            cell(self.tenant_id.as_deref()),
        ];
        if wide {
            row.push(cell(self.cluster_quota));
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use crate::commands::test_support::{format, serve, template, text};
    use axum::extract::{Path, Query};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn router() -> Router {
        Router::new()
            .route(
                "/v1/project",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let all = vec![
                        json!({"ID": "p-3", "Name": "web", "TenantID": "b"}),
                        json!({"ID": "p-2", "Name": "db", "TenantID": "a", "ClusterQuota": 5}),
                        json!({"ID": "p-1", "Name": "api", "TenantID": "a"}),
                    ];
                    let items: Vec<_> = all
                        .into_iter()
                        .filter(|p| q.get("tenant").is_none_or(|t| p["TenantID"] == t.as_str()))
                        .collect();
                    Json(items)
                }),
            )
            .route(
                "/v1/project/{id}",
                get(|Path(id): Path<String>| async move {
                    Json(json!({"ID": id, "Name": "api", "Description": "public api"}))
                }),
            )
    }

    #[tokio::test]
    async fn list_sorted_by_tenant_and_name() {
        let client = serve(router()).await;
        let mut buf = Vec::new();

        ProjectCommand::new(&client)
            .execute(
                &mut buf,
                &template("{{ .TenantID }}/{{ .Name }}"),
                &ProjectCommands::List { tenant: None },
            )
            .await
            .expect("list should succeed");

        assert_eq!(text(buf), "a/api\na/db\nb/web\n");
    }

    #[tokio::test]
    async fn list_by_tenant() {
        let client = serve(router()).await;
        let mut buf = Vec::new();

        ProjectCommand::new(&client)
            .execute(
                &mut buf,
                &format(Format::Json),
                &ProjectCommands::List {
                    tenant: Some("b".into()),
                },
            )
            .await
            .expect("list should succeed");

        let value: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["ID"], "p-3");
    }

    #[tokio::test]
    async fn describe_as_yaml() {
        let client = serve(router()).await;
        let mut buf = Vec::new();

        ProjectCommand::new(&client)
            .execute(
                &mut buf,
                &format(Format::Yaml),
                &ProjectCommands::Describe { id: "p-1".into() },
            )
            .await
            .expect("describe should succeed");

        assert_eq!(text(buf), "ID: p-1\nName: api\nDescription: public api\n");
    }

    #[test]
    fn wide_row_shows_quota() {
        let project = Project {
            id: Some("p-2".into()),
            cluster_quota: Some(5),
            ..Project::default()
        };
        assert_eq!(project.row(false).len(), 4);
        assert_eq!(project.row(true)[4], "5");
    }
}
