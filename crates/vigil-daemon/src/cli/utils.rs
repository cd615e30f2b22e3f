use super::commands::Cli;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};
use vigil_daemon::{LogLevel, LoggingConfig};
use vigil_types::{VigilError, VigilResult};

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn filter_directive(cli: &Cli, configured: LogLevel) -> String {
    if cli.quiet {
        return "warn".to_string();
    }
    match cli.verbose {
        0 => configured.to_string(),
        1 => "info,vigil_daemon=debug".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

pub fn init_logging(cli: &Cli, logging: &LoggingConfig) -> VigilResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(cli, logging.level)));

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = fmt::layer()
        .with_target(cli.verbose >= 2)
        .with_ansi(logging.ansi);
    if logging.json {
        layers.push(console.json().boxed());
    } else {
        layers.push(console.boxed());
    }

    let log_file: Option<PathBuf> = cli.log_file.clone().or_else(|| logging.file.clone());
    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| VigilError::Io(format!("Failed to open log file {:?}: {}", path, e)))?;
        layers.push(
            fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| VigilError::Internal(format!("Failed to initialise logging: {}", e)))
}

pub fn print_banner() {
    println!();
    println!("  \x1b[1;38;5;46mvigil\x1b[0m \x1b[38;5;245mv{}\x1b[0m", BUILD_VERSION);
    println!("  \x1b[38;5;245mexternal availability watchdog\x1b[0m");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_filter_directive() {
        let quiet = Cli::parse_from(["vigil", "-q", "-vvv"]);
        assert_eq!(filter_directive(&quiet, LogLevel::Debug), "warn");

        let plain = Cli::parse_from(["vigil"]);
        assert_eq!(filter_directive(&plain, LogLevel::Warn), "warn");
        assert_eq!(filter_directive(&plain, LogLevel::Info), "info");

        let verbose = Cli::parse_from(["vigil", "-v"]);
        assert_eq!(filter_directive(&verbose, LogLevel::Info), "info,vigil_daemon=debug");
    }
}
