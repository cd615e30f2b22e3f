mod cli;

use clap::Parser;
use cli::{
    handle_config, init_logging, run_check, run_reap, run_watchdog, show_version, Cli, Commands,
};
use vigil_daemon::VigilConfig;
use vigil_types::VigilResult;

#[tokio::main]
async fn main() -> VigilResult<()> {
    let mut cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(VigilConfig::default_path);

    match cli.command.take() {
        Some(Commands::Config { action }) => {
            handle_config(&config_path, action)?;
        }
        Some(Commands::Version) => {
            show_version();
        }
        Some(Commands::Check { secondary }) => {
            let config = VigilConfig::load(&config_path)?;
            init_logging(&cli, &config.logging)?;
            if !run_check(&config, secondary, cli.format).await? {
                std::process::exit(1);
            }
        }
        Some(Commands::Reap) => {
            let config = VigilConfig::load(&config_path)?;
            init_logging(&cli, &config.logging)?;
            run_reap(&config, cli.format).await?;
        }
        Some(Commands::Run) | None => {
            let config = VigilConfig::load(&config_path)?;
            init_logging(&cli, &config.logging)?;
            run_watchdog(config).await?;
        }
    }

    Ok(())
}
