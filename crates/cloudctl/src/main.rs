//! cloudctl binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cloudctl::cli::{Cli, Commands};
use cloudctl::commands::{
    AuditCommand, BillingCommand, ClusterCommand, DashboardCommand, HealthCommand,
    PostgresCommand, ProjectCommand, S3Command, TenantCommand, VersionCommand, VolumeCommand,
};
use cloudctl::config::{Config, Settings};
use cloudctl::output::OutputFormat;

fn main() -> ExitCode {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), cloudctl::CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, config);
    let format = OutputFormat::new(settings.format, settings.template.as_deref())?;
    let mut stdout = io::stdout().lock();

    // `version` works without a configured API.
    if matches!(cli.command, Commands::Version) {
        let client = settings.url.is_some().then(|| settings.client()).transpose()?;
        return VersionCommand::new(client.as_ref())
            .execute(&mut stdout, &format)
            .await;
    }

    let client = settings.client()?;

    match &cli.command {
        // Handled above.
        Commands::Version => {}
        Commands::Health => {
            HealthCommand::new(&client).execute(&mut stdout, &format).await?;
        }
        Commands::Cluster { command } => {
            let cmd = ClusterCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Project { command } => {
            let cmd = ProjectCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Tenant { command } => {
            let cmd = TenantCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Postgres { command } => {
            let cmd = PostgresCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::S3 { command } => {
            let cmd = S3Command::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Volume { command } => {
            let cmd = VolumeCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Audit { command } => {
            let cmd = AuditCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Billing { command } => {
            let cmd = BillingCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Dashboard(args) => {
            // The dashboard owns the terminal.
            drop(stdout);
            DashboardCommand::new(&client, &settings.dashboard)
                .execute(args)
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudctl::cli::{ClusterCommands, Format};

    #[test]
    fn cli_parses_health() {
        let cli = Cli::parse_from(["cloudctl", "health"]);
        assert!(matches!(cli.command, Commands::Health));
    }

    #[test]
    fn cli_parses_cluster_describe() {
        let cli = Cli::parse_from(["cloudctl", "cluster", "describe", "c-1"]);
        match cli.command {
            Commands::Cluster {
                command: ClusterCommands::Describe { id },
            } => assert_eq!(id, "c-1"),
            _ => panic!("expected cluster describe"),
        }
    }

    #[test]
    fn cli_parses_output_format() {
        let cli = Cli::parse_from(["cloudctl", "-o", "wide", "cluster", "ls"]);
        assert_eq!(cli.output, Some(Format::Wide));
    }
}
