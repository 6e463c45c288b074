//! Health command implementation.

use std::io::Write;

use cloud_api::ApiClient;
use cloud_api::models::Health;
use tracing::warn;

use crate::error::CliError;
use crate::output::{OutputFormat, ResourceKind, Tabular};

/// Health command executor.
pub struct HealthCommand<'a> {
    client: &'a ApiClient,
}

impl<'a> HealthCommand<'a> {
    /// Create a new health command.
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Print the API health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
    ) -> Result<(), CliError> {
        let health = self.client.health().await?;
        if !health.is_healthy() {
            warn!(status = %health.status, "API reports unhealthy");
        }
        format.write_single(writer, &health)
    }
}

impl Tabular for Health {
    const KIND: ResourceKind = ResourceKind::Health;

    fn row(&self, _wide: bool) -> Vec<String> {
        vec![self.status.clone(), self.message.clone()]
    }
}
