//! Tenant command implementation.

use std::io::Write;

use cloud_api::ApiClient;
use cloud_api::models::Tenant;

use super::by_key;
use crate::cli::TenantCommands;
use crate::error::CliError;
use crate::output::{OutputFormat, ResourceKind, Tabular, cell};

/// Tenant command executor.
pub struct TenantCommand<'a> {
    client: &'a ApiClient,
}

impl<'a> TenantCommand<'a> {
    /// Create a new tenant command.
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute a tenant subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &TenantCommands,
    ) -> Result<(), CliError> {
        match command {
            TenantCommands::List => {
                let mut tenants = self.client.list_tenants().await?;
                tenants.sort_by(|a, b| by_key(a.id.as_deref(), b.id.as_deref()));
                format.write_list(writer, &tenants)?;
            }
        }
        Ok(())
    }
}

impl Tabular for Tenant {
    const KIND: ResourceKind = ResourceKind::Tenant;

    fn row(&self, _wide: bool) -> Vec<String> {
        vec![
            cell(self.id.as_deref()),
            cell(self.name.as_deref()),
            cell(self.description.as_deref()),
        ]
    }
}
