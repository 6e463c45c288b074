//! Volume command implementation.

use std::io::Write;

use cloud_api::ApiClient;
use cloud_api::models::{Volume, VolumeFilter};
use tracing::debug;

use super::by_key;
use crate::cli::VolumeCommands;
use crate::error::CliError;
use crate::output::{OutputFormat, ResourceKind, Tabular, cell, human_bytes};

/// Volume command executor.
pub struct VolumeCommand<'a> {
    client: &'a ApiClient,
}

impl<'a> VolumeCommand<'a> {
    /// Create a new volume command.
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute a volume subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &VolumeCommands,
    ) -> Result<(), CliError> {
        match command {
            VolumeCommands::List {
                project,
                partition,
                only_unbound,
            } => {
                let filter = VolumeFilter {
                    project_id: project.clone(),
                    partition_id: partition.clone(),
                };
                let mut volumes = self.client.list_volumes(&filter).await?;
                if *only_unbound {
                    let total = volumes.len();
                    volumes.retain(Volume::is_unbound);
                    debug!(total, unbound = volumes.len(), "filtered unbound volumes");
                }
                volumes.sort_by(|a, b| {
                    by_key(a.project_id.as_deref(), b.project_id.as_deref())
                        .then_with(|| by_key(a.name.as_deref(), b.name.as_deref()))
                });
                format.write_list(writer, &volumes)?;
            }
        }
        Ok(())
    }
}

impl Tabular for Volume {
    const KIND: ResourceKind = ResourceKind::Volume;

    fn row(&self, wide: bool) -> Vec<String> {
        let mut row = vec![
            cell(self.id.as_deref()),
            cell(self.name.as_deref()),
            cell(self.size.map(human_bytes)),
            cell(self.usage.map(human_bytes)),
            cell(self.state.as_deref()),
            cell(self.project_id.as_deref()),
            cell(self.partition_id.as_deref()),
        ];
        if wide {
            row.push(cell(self.storage_class.as_deref()));
            row.push(cell(self.attached_to.as_ref().map(|nodes| nodes.join(","))));
        }
        row
    }
}
