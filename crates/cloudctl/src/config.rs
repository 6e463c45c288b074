//! CLI configuration.
//!
//! Settings come from, in order of precedence:
//! - command-line flags and their environment variables
//! - the TOML configuration file (`~/.cloudctl/config.toml` by default)
//! - built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use cloud_api::ApiClient;
use cloud_dashboard::ThemeName;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::{Cli, Format};
use crate::error::CliError;

/// Directory below the home directory holding the configuration.
pub const CONFIG_DIR: &str = ".cloudctl";

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Dashboard section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Seconds between refreshes.
    pub refresh_interval_secs: u64,
    /// Color theme name.
    pub color_theme: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 3,
            color_theme: ThemeName::Default.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Refresh interval as a duration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Parsed color theme.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown theme name.
    pub fn theme(&self) -> Result<ThemeName, CliError> {
        self.color_theme
            .parse::<ThemeName>()
            .map_err(|e| CliError::Config(format!("dashboard.color_theme: {e}")))
    }
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// API endpoint URL.
    pub url: Option<String>,
    /// API token.
    pub token: Option<String>,
    /// Default output format.
    pub output: Option<String>,
    /// Dashboard settings.
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the configuration.
    ///
    /// An explicitly given file must exist. A missing default file yields the
    /// built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        debug!(path = %path.display(), "loaded configuration file");

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let config: Self =
            toml::from_str(content).map_err(|e| CliError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), CliError> {
        if let Some(url) = &self.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CliError::Config(
                    "url must start with http:// or https://".to_string(),
                ));
            }
        }

        if let Some(output) = &self.output {
            if Format::from_name(output).is_none() {
                return Err(CliError::Config(format!(
                    "unknown output format '{output}', \
                     expected one of: table, wide, json, yaml, template"
                )));
            }
        }

        if self.dashboard.refresh_interval_secs == 0 {
            return Err(CliError::Config(
                "dashboard.refresh_interval_secs must be greater than 0".to_string(),
            ));
        }

        self.dashboard.theme()?;

        Ok(())
    }
}

/// Effective settings after applying precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// API endpoint URL.
    pub url: Option<String>,
    /// API token.
    pub token: Option<String>,
    /// Output format.
    pub format: Format,
    /// Template for [`Format::Template`].
    pub template: Option<String>,
    /// Dashboard settings from the file.
    pub dashboard: DashboardConfig,
}

impl Settings {
    /// Merge command-line values over the configuration file.
    pub fn resolve(cli: &Cli, config: Config) -> Self {
        let format = cli
            .output
            .or_else(|| config.output.as_deref().and_then(Format::from_name))
            .unwrap_or_default();

        Self {
            url: cli.url.clone().or(config.url),
            token: cli.token.clone().or(config.token),
            format,
            template: cli.template.clone(),
            dashboard: config.dashboard,
        }
    }

    /// Build an API client from the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL is configured or the URL is invalid.
    pub fn client(&self) -> Result<ApiClient, CliError> {
        let url = self.url.as_deref().ok_or_else(|| {
            CliError::Config(
                "no API URL configured; use --url, CLOUDCTL_URL or the config file".to_string(),
            )
        })?;
        Ok(ApiClient::builder(url)
            .maybe_token(self.token.clone())
            .build()?)
    }
}
