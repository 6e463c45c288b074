//! Audit command implementation.

use std::io::Write;

use cloud_api::ApiClient;
use cloud_api::models::{AuditFilter, AuditTrace};
use cloud_dashboard::aggregate::parse_timestamp;

use crate::cli::AuditCommands;
use crate::error::CliError;
use crate::output::{OutputFormat, ResourceKind, Tabular, cell};

/// Audit command executor.
pub struct AuditCommand<'a> {
    client: &'a ApiClient,
}

impl<'a> AuditCommand<'a> {
    /// Create a new audit command.
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute an audit subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &AuditCommands,
    ) -> Result<(), CliError> {
        match command {
            AuditCommands::List {
                phase,
                user,
                tenant,
                path,
                limit,
            } => {
                if *limit == 0 {
                    return Err(CliError::InvalidArgument(
                        "limit must be greater than 0".to_string(),
                    ));
                }
                let filter = AuditFilter {
                    phase: phase.clone(),
                    user: user.clone(),
                    tenant: tenant.clone(),
                    path: path.clone(),
                    limit: Some(*limit),
                };
                let mut traces = self.client.list_audit(&filter).await?;
                // Unparseable timestamps sort first.
                traces.sort_by_key(|t| t.timestamp.as_deref().and_then(parse_timestamp));
                format.write_list(writer, &traces)?;
            }
        }
        Ok(())
    }
}

impl Tabular for AuditTrace {
    const KIND: ResourceKind = ResourceKind::Audit;

    fn row(&self, wide: bool) -> Vec<String> {
        let mut row = vec![
            cell(self.timestamp.as_deref()),
            cell(self.request_id.as_deref()),
            cell(self.phase.as_deref()),
            cell(self.user.as_deref()),
        ];
        if wide {
            row.push(cell(self.tenant.as_deref()));
        }
        row.push(cell(self.method.as_deref()));
        row.push(cell(self.path.as_deref()));
        row.push(cell(self.status_code));
        if wide {
            row.push(cell(self.error.as_deref()));
        }
        row
    }
}
