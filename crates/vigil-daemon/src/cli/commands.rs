use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "vigil")]
#[command(version = BUILD_VERSION)]
#[command(about = "Vigil - External availability watchdog with self-healing restarts")]
#[command(long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", env = "VIGIL_CONFIG", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Append logs to file (overrides logging.file)")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text", help = "Output format")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the watchdog (default)")]
    #[command(long_about = "Start the monitoring loop.\n\nProbes the primary endpoint every check interval, re-checks quickly once the failure threshold is reached and restarts the server when the outage is confirmed.")]
    Run,

    #[command(about = "Run a single aggregated health check")]
    Check {
        #[arg(long, help = "Also show the secondary endpoint result")]
        secondary: bool,
    },

    #[command(about = "Terminate stale server processes on the configured port")]
    Reap,

    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    #[command(about = "Show version information")]
    Version,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Show effective configuration")]
    Show,
    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(short, long, help = "Overwrite existing configuration")]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["vigil"]);
        assert!(cli.command.is_none());
        assert!(cli.format == OutputFormat::Text);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["vigil", "check", "--secondary", "-vv", "--format", "json"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.format == OutputFormat::Json);
        assert!(matches!(cli.command, Some(Commands::Check { secondary: true })));
    }
}
