//! Postgres command implementation.

use std::io::Write;

use chrono::Utc;
use cloud_api::ApiClient;
use cloud_api::models::{Postgres, PostgresFilter};
use cloud_dashboard::aggregate::parse_timestamp;
use cloud_dashboard::ui::format_age;

use super::by_key;
use crate::cli::PostgresCommands;
use crate::error::CliError;
use crate::output::{OutputFormat, ResourceKind, Tabular, cell};

/// Postgres command executor.
pub struct PostgresCommand<'a> {
    client: &'a ApiClient,
}

impl<'a> PostgresCommand<'a> {
    /// Create a new postgres command.
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute a postgres subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &PostgresCommands,
    ) -> Result<(), CliError> {
        match command {
            PostgresCommands::List {
                project,
                partition,
                description,
            } => {
                let filter = PostgresFilter {
                    project_id: project.clone(),
                    partition_id: partition.clone(),
                    description: description.clone(),
                };
                let mut databases = self.client.list_postgres(&filter).await?;
                databases.sort_by(|a, b| {
                    by_key(a.project_id.as_deref(), b.project_id.as_deref())
                        .then_with(|| by_key(a.description.as_deref(), b.description.as_deref()))
                });
                format.write_list(writer, &databases)?;
            }
            PostgresCommands::Describe { id } => {
                let database = self.client.get_postgres(id).await?;
                format.write_detail(writer, &database)?;
            }
        }
        Ok(())
    }
}

impl Tabular for Postgres {
    const KIND: ResourceKind = ResourceKind::Postgres;

    fn row(&self, wide: bool) -> Vec<String> {
        let size = self.size.as_ref();
        let age = self
            .creation_timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .map(|created| format_age(created, Utc::now()));

        let mut row = vec![
            cell(self.id.as_deref()),
            cell(self.description.as_deref()),
            cell(self.partition_id.as_deref()),
            cell(self.version.as_deref()),
            cell(size.and_then(|s| s.cpu.as_deref())),
            cell(size.and_then(|s| s.storage_size.as_deref())),
            cell(self.number_of_instances),
            cell(self.status.as_ref().and_then(|s| s.description.as_deref())),
            cell(age),
        ];
        if wide {
            row.push(cell(self.tenant.as_deref()));
            row.push(cell(self.project_id.as_deref()));
        }
        row
    }
}
