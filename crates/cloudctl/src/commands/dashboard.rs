//! Dashboard command implementation.
//!
//! Flags take precedence over the `[dashboard]` section of the configuration
//! file.

use cloud_api::ApiClient;
use cloud_dashboard::{DashboardOptions, SnapshotFilter};
use tracing::debug;

use crate::cli::DashboardArgs;
use crate::config::DashboardConfig;
use crate::error::CliError;

/// Dashboard command executor.
pub struct DashboardCommand<'a> {
    client: &'a ApiClient,
    config: &'a DashboardConfig,
}

impl<'a> DashboardCommand<'a> {
    /// Create a new dashboard command.
    pub const fn new(client: &'a ApiClient, config: &'a DashboardConfig) -> Self {
        Self { client, config }
    }

    /// Run the dashboard until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or the terminal fails.
    pub async fn execute(&self, args: &DashboardArgs) -> Result<(), CliError> {
        let options = self.options(args)?;
        debug!(filter = %options.filter.describe(), "starting dashboard");
        cloud_dashboard::run(self.client.clone(), options).await?;
        Ok(())
    }

    /// Merge flags over the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown theme in the configuration file.
    pub fn options(&self, args: &DashboardArgs) -> Result<DashboardOptions, CliError> {
        let theme = match args.color_theme {
            Some(theme) => theme.into(),
            None => self.config.theme()?,
        };
        let options = DashboardOptions {
            filter: SnapshotFilter {
                tenant: args.tenant.clone(),
                partition: args.partition.clone(),
                purpose: args.purpose.clone(),
            },
            refresh_interval: args
                .refresh_interval
                .unwrap_or_else(|| self.config.refresh_interval()),
            theme,
        };
        options.validate()?;
        Ok(options)
    }
}
