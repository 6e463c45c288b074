//! S3 command implementation.
//!
//! Tables never show secret keys. Structured formats print the credentials
//! as returned by the API.

use std::io::Write;

use cloud_api::ApiClient;
use cloud_api::models::S3Credentials;

use super::by_key;
use crate::cli::S3Commands;
use crate::error::CliError;
use crate::output::{OutputFormat, ResourceKind, Tabular, cell};

/// S3 command executor.
pub struct S3Command<'a> {
    client: &'a ApiClient,
}

impl<'a> S3Command<'a> {
    /// Create a new S3 command.
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute an S3 subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &S3Commands,
    ) -> Result<(), CliError> {
        match command {
            S3Commands::List { partition } => {
                if partition.trim().is_empty() {
                    return Err(CliError::InvalidArgument(
                        "partition cannot be empty".to_string(),
                    ));
                }
                let mut users = self.client.list_s3(partition).await?;
                users.sort_by(|a, b| {
                    by_key(a.tenant.as_deref(), b.tenant.as_deref())
                        .then_with(|| by_key(a.project.as_deref(), b.project.as_deref()))
                        .then_with(|| by_key(a.name.as_deref(), b.name.as_deref()))
                });
                format.write_list(writer, &users)?;
            }
        }
        Ok(())
    }
}

impl Tabular for S3Credentials {
    const KIND: ResourceKind = ResourceKind::S3;

    fn row(&self, wide: bool) -> Vec<String> {
        let mut row = vec![
            cell(self.id.as_deref()),
            cell(self.tenant.as_deref()),
            cell(self.project.as_deref()),
            cell(self.name.as_deref()),
            cell(self.partition.as_deref()),
        ];
        if wide {
            let access_key = self
                .keys
                .iter()
                .flatten()
                .find_map(|k| k.access_key.as_deref());
            row.push(cell(self.endpoint.as_deref()));
            row.push(cell(access_key));
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use crate::commands::test_support::{format, serve, text};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    fn router() -> Router {
        Router::new().route(
            "/v1/s3/list",
            post(|Json(body): Json<Value>| async move {
                Json(json!([{
                    "ID": "u-1",
                    "Name": "backup",
                    "Tenant": "a",
                    "Project": "p1",
                    "Partition": body["Partition"],
                    "Endpoint": "https://s3.example.com",
                    "Keys": [{"AccessKey": "AK1", "SecretKey": "SK1"}]
                }]))
            }),
        )
    }

    #[tokio::test]
    async fn wide_table_shows_access_key_only() {
        let client = serve(router()).await;
        let mut buf = Vec::new();

        S3Command::new(&client)
            .execute(
                &mut buf,
                &format(Format::Wide),
                &S3Commands::List {
                    partition: "fra-1".into(),
                },
            )
            .await
            .expect("list should succeed");

        let out = text(buf);
        assert!(out.contains("fra-1"));
        assert!(out.contains("AK1"));
        assert!(!out.contains("SK1"));
    }

    #[tokio::test]
    async fn empty_partition_is_rejected() {
        let client = serve(router()).await;
        let mut buf = Vec::new();

        let err = S3Command::new(&client)
            .execute(
                &mut buf,
                &format(Format::Table),
                &S3Commands::List {
                    partition: " ".into(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
