//! Command-line argument parsing with clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cloud_dashboard::ThemeName;

/// cloudctl - client for the cloud control-plane API.
#[derive(Parser, Debug, Clone)]
#[command(name = "cloudctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// API endpoint URL.
    #[arg(long, env = "CLOUDCTL_URL", global = true)]
    pub url: Option<String>,

    /// API token.
    #[arg(long, env = "CLOUDCTL_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file (default: ~/.cloudctl/config.toml).
    #[arg(long, env = "CLOUDCTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<Format>,

    /// Template for `--output template`, e.g. `{{ .ID }} {{ .Name }}`.
    #[arg(long, global = true)]
    pub template: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table.
    #[default]
    Table,
    /// Table with additional columns.
    Wide,
    /// JSON for scripting.
    Json,
    /// YAML for scripting.
    Yaml,
    /// One line per item from `--template`.
    Template,
}

impl Format {
    /// Parse a format name as used in the configuration file.
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show API health.
    Health,

    /// Show client and server version.
    Version,

    /// Kubernetes clusters.
    Cluster {
        /// Cluster subcommand to execute.
        #[command(subcommand)]
        command: ClusterCommands,
    },

    /// Projects.
    Project {
        /// Project subcommand to execute.
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Tenants.
    Tenant {
        /// Tenant subcommand to execute.
        #[command(subcommand)]
        command: TenantCommands,
    },

    /// Postgres databases.
    Postgres {
        /// Postgres subcommand to execute.
        #[command(subcommand)]
        command: PostgresCommands,
    },

    /// S3 credentials.
    S3 {
        /// S3 subcommand to execute.
        #[command(subcommand)]
        command: S3Commands,
    },

    /// Persistent volumes.
    Volume {
        /// Volume subcommand to execute.
        #[command(subcommand)]
        command: VolumeCommands,
    },

    /// API audit traces.
    Audit {
        /// Audit subcommand to execute.
        #[command(subcommand)]
        command: AuditCommands,
    },

    /// Usage accounting.
    Billing {
        /// Billing subcommand to execute.
        #[command(subcommand)]
        command: BillingCommands,
    },

    /// Live terminal dashboard of cluster health.
    Dashboard(DashboardArgs),
}

/// Cluster subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ClusterCommands {
    /// List clusters.
    #[command(alias = "ls")]
    List(ClusterListArgs),

    /// Show a single cluster.
    Describe {
        /// Cluster ID.
        id: String,
    },
}

/// Filters for `cluster list`.
#[derive(Args, Debug, Clone, Default)]
pub struct ClusterListArgs {
    /// Only clusters of this tenant.
    #[arg(long)]
    pub tenant: Option<String>,

    /// Only clusters in this partition.
    #[arg(long)]
    pub partition: Option<String>,

    /// Only clusters with this purpose.
    #[arg(long)]
    pub purpose: Option<String>,

    /// Only clusters with this name.
    #[arg(long)]
    pub name: Option<String>,

    /// Only clusters of this project.
    #[arg(long)]
    pub project: Option<String>,
}

/// Project subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ProjectCommands {
    /// List projects.
    #[command(alias = "ls")]
    List {
        /// Only projects of this tenant.
        #[arg(long)]
        tenant: Option<String>,
    },

    /// Show a single project.
    Describe {
        /// Project ID.
        id: String,
    },
}

/// Tenant subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum TenantCommands {
    /// List tenants.
    #[command(alias = "ls")]
    List,
}

/// Postgres subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum PostgresCommands {
    /// List databases.
    #[command(alias = "ls")]
    List {
        /// Only databases of this project.
        #[arg(long)]
        project: Option<String>,

        /// Only databases in this partition.
        #[arg(long)]
        partition: Option<String>,

        /// Only databases with this description.
        #[arg(long)]
        description: Option<String>,
    },

    /// Show a single database.
    Describe {
        /// Database ID.
        id: String,
    },
}

/// S3 subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum S3Commands {
    /// List S3 users of a partition.
    #[command(alias = "ls")]
    List {
        /// S3 partition.
        #[arg(long, required = true)]
        partition: String,
    },
}

/// Volume subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum VolumeCommands {
    /// List volumes.
    #[command(alias = "ls")]
    List {
        /// Only volumes of this project.
        #[arg(long)]
        project: Option<String>,

        /// Only volumes in this partition.
        #[arg(long)]
        partition: Option<String>,

        /// Only volumes not attached to any node.
        #[arg(long)]
        only_unbound: bool,
    },
}

/// Audit subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AuditCommands {
    /// List audit traces.
    #[command(alias = "ls")]
    List {
        /// Request phase (request, response, ...).
        #[arg(long)]
        phase: Option<String>,

        /// Calling user.
        #[arg(long)]
        user: Option<String>,

        /// Calling tenant.
        #[arg(long)]
        tenant: Option<String>,

        /// Request path.
        #[arg(long)]
        path: Option<String>,

        /// Maximum number of traces.
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
}

/// Billing subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum BillingCommands {
    /// Cluster lifetime usage in a time window.
    ClusterUsage {
        /// Only usage of this tenant.
        #[arg(long)]
        tenant: Option<String>,

        /// Only usage of this project.
        #[arg(long)]
        project: Option<String>,

        /// Window start (YYYY-MM-DD or RFC 3339). Defaults to the start of the month.
        #[arg(long)]
        from: Option<String>,

        /// Window end (YYYY-MM-DD or RFC 3339). Defaults to now.
        #[arg(long)]
        to: Option<String>,
    },
}

/// Color theme choices for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorTheme {
    /// Terminal default colors.
    Default,
    /// For dark terminal backgrounds.
    Dark,
}

impl From<ColorTheme> for ThemeName {
    fn from(theme: ColorTheme) -> Self {
        match theme {
            ColorTheme::Default => Self::Default,
            ColorTheme::Dark => Self::Dark,
        }
    }
}

/// Arguments for the dashboard.
#[derive(Args, Debug, Clone, Default)]
pub struct DashboardArgs {
    /// Only clusters of this tenant.
    #[arg(long)]
    pub tenant: Option<String>,

    /// Only clusters in this partition.
    #[arg(long)]
    pub partition: Option<String>,

    /// Only clusters with this purpose.
    #[arg(long)]
    pub purpose: Option<String>,

    /// Color theme.
    #[arg(long, value_enum)]
    pub color_theme: Option<ColorTheme>,

    /// Time between refreshes, e.g. `3s`, `500ms`, `1m 30s`.
    #[arg(long, value_parser = parse_duration)]
    pub refresh_interval: Option<Duration>,
}

/// Parse a duration such as `3s`, `500ms` or `1m 30s`. A bare number is seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let duration = if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        input
            .parse()
            .map(Duration::from_secs)
            .map_err(|e| format!("invalid duration '{input}': {e}"))?
    } else {
        humantime::parse_duration(input)
            .map_err(|e| format!("invalid duration '{input}': {e}"))?
    };

    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use test_case::test_case;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_cluster_list_filters() {
        let cli = Cli::parse_from([
            "cloudctl", "cluster", "list", "--tenant", "t1", "--purpose", "production",
        ]);
        match cli.command {
            Commands::Cluster {
                command: ClusterCommands::List(args),
            } => {
                assert_eq!(args.tenant.as_deref(), Some("t1"));
                assert_eq!(args.purpose.as_deref(), Some("production"));
                assert!(args.partition.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "cloudctl", "tenant", "list", "-o", "yaml", "--url", "http://api:8080",
        ]);
        assert_eq!(cli.output, Some(Format::Yaml));
        assert_eq!(cli.url.as_deref(), Some("http://api:8080"));
    }

    #[test]
    fn parses_dashboard_args() {
        let cli = Cli::parse_from([
            "cloudctl",
            "dashboard",
            "--purpose",
            "production",
            "--color-theme",
            "dark",
            "--refresh-interval",
            "500ms",
        ]);
        match cli.command {
            Commands::Dashboard(args) => {
                assert_eq!(args.color_theme, Some(ColorTheme::Dark));
                assert_eq!(args.refresh_interval, Some(Duration::from_millis(500)));
                assert_eq!(args.purpose.as_deref(), Some("production"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_theme() {
        let result = Cli::try_parse_from(["cloudctl", "dashboard", "--color-theme", "neon"]);
        assert!(result.is_err());
    }

    #[test]
    fn s3_list_requires_partition() {
        assert!(Cli::try_parse_from(["cloudctl", "s3", "list"]).is_err());
    }

    #[test]
    fn audit_limit_defaults_to_100() {
        let cli = Cli::parse_from(["cloudctl", "audit", "list"]);
        match cli.command {
            Commands::Audit {
                command: AuditCommands::List { limit, .. },
            } => assert_eq!(limit, 100),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test_case("3s", Duration::from_secs(3) ; "seconds")]
    #[test_case("3", Duration::from_secs(3) ; "bare number")]
    #[test_case("500ms", Duration::from_millis(500) ; "milliseconds")]
    #[test_case("2m", Duration::from_secs(120) ; "minutes")]
    #[test_case("1h", Duration::from_secs(3_600) ; "hours")]
    #[test_case("1m 30s", Duration::from_secs(90) ; "compound")]
    fn parses_durations(input: &str, expected: Duration) {
        assert_eq!(parse_duration(input), Ok(expected));
    }

    #[test_case("" ; "empty")]
    #[test_case("0s" ; "zero")]
    #[test_case("3x" ; "unknown unit")]
    #[test_case("fast" ; "no number")]
    #[test_case("18446744073709551615h" ; "overflowing hours")]
    #[test_case("18446744073709551616" ; "overflowing seconds")]
    fn rejects_bad_durations(input: &str) {
        assert!(parse_duration(input).is_err());
    }

    #[test]
    fn format_names() {
        assert_eq!(Format::from_name("wide"), Some(Format::Wide));
        assert_eq!(Format::from_name("JSON"), Some(Format::Json));
        assert_eq!(Format::from_name("xml"), None);
    }
}
