//! Version command implementation.

use std::io::Write;

use cloud_api::ApiClient;
use cloud_api::models::Version;
use serde::Serialize;

use crate::error::CliError;
use crate::output::{OutputFormat, ResourceKind, Tabular};

/// Version of this binary.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Client and server version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    /// Client version.
    pub client: String,
    /// Server version, absent if the server could not be reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<Version>,
}

/// Version command executor.
pub struct VersionCommand<'a> {
    client: Option<&'a ApiClient>,
}

impl<'a> VersionCommand<'a> {
    /// Create a new version command. Without a client only the client
    /// version is printed.
    pub const fn new(client: Option<&'a ApiClient>) -> Self {
        Self { client }
    }

    /// Print client and server version.
    ///
    /// # Errors
    ///
    /// Returns an error if the server request or the output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
    ) -> Result<(), CliError> {
        let server = match self.client {
            Some(client) => Some(client.version().await?),
            None => None,
        };
        let info = VersionInfo {
            client: CLIENT_VERSION.to_string(),
            server,
        };
        format.write_single(writer, &info)
    }
}

impl Tabular for VersionInfo {
    const KIND: ResourceKind = ResourceKind::Version;

    fn row(&self, wide: bool) -> Vec<String> {
        let server = self.server.clone().unwrap_or_default();
        let mut row = vec![self.client.clone(), server.version];
        if wide {
            row.extend([server.revision, server.git_sha1, server.build_date]);
        }
        row
    }
}
