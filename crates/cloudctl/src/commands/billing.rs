//! Billing command implementation.

use std::io::Write;

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use cloud_api::ApiClient;
use cloud_api::models::{ClusterUsage, UsageRequest};

use super::by_key;
use crate::cli::BillingCommands;
use crate::error::CliError;
use crate::output::{OutputFormat, ResourceKind, Tabular, cell, human_duration};

/// Billing command executor.
pub struct BillingCommand<'a> {
    client: &'a ApiClient,
}

impl<'a> BillingCommand<'a> {
    /// Create a new billing command.
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute a billing subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if a time is malformed, or the request or the output
    /// fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &BillingCommands,
    ) -> Result<(), CliError> {
        match command {
            BillingCommands::ClusterUsage {
                tenant,
                project,
                from,
                to,
            } => {
                let from = match from {
                    Some(from) => normalize_time(from)?,
                    None => start_of_month(Utc::now())?,
                };
                let to = to.as_deref().map(normalize_time).transpose()?;

                let request = UsageRequest {
                    tenant: tenant.clone(),
                    project_id: project.clone(),
                    from,
                    to,
                };
                let mut usage = self.client.cluster_usage(&request).await?.usage;
                usage.sort_by(|a, b| {
                    by_key(a.tenant.as_deref(), b.tenant.as_deref())
                        .then_with(|| by_key(a.project_id.as_deref(), b.project_id.as_deref()))
                        .then_with(|| by_key(a.cluster_name.as_deref(), b.cluster_name.as_deref()))
                });
                format.write_list(writer, &usage)?;
            }
        }
        Ok(())
    }
}

/// Accept RFC 3339 as is and turn `YYYY-MM-DD` into midnight UTC.
fn normalize_time(input: &str) -> Result<String, CliError> {
    if let Ok(time) = DateTime::parse_from_rfc3339(input) {
        return Ok(time.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "invalid time '{input}', expected YYYY-MM-DD or RFC 3339"
            ))
        })
}

fn start_of_month(now: DateTime<Utc>) -> Result<String, CliError> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or_else(|| CliError::InvalidArgument(format!("no start of month for {now}")))
}

impl Tabular for ClusterUsage {
    const KIND: ResourceKind = ResourceKind::ClusterUsage;

    fn row(&self, wide: bool) -> Vec<String> {
        let lifetime = cell(self.lifetime.map(human_duration));
        if wide {
            vec![
                cell(self.tenant.as_deref()),
                cell(self.project_id.as_deref()),
                cell(self.cluster_id.as_deref()),
                cell(self.cluster_name.as_deref()),
                cell(self.partition.as_deref()),
                cell(self.cluster_start.as_deref()),
                cell(self.cluster_end.as_deref()),
                lifetime,
            ]
        } else {
            vec![
                cell(self.tenant.as_deref()),
                cell(self.project_id.as_deref()),
                cell(self.cluster_name.as_deref()),
                cell(self.partition.as_deref()),
                lifetime,
            ]
        }
    }
}
