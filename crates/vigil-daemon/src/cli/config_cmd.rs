use super::commands::ConfigAction;
use std::path::Path;
use vigil_daemon::VigilConfig;
use vigil_types::{VigilError, VigilResult};

pub fn handle_config(config_path: &Path, action: Option<ConfigAction>) -> VigilResult<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            if !config_path.exists() {
                println!("\x1b[38;5;245mNo configuration file found at {:?}, showing defaults\x1b[0m", config_path);
            }
            let config = VigilConfig::load(config_path)?;
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| VigilError::Serialization(e.to_string()))?;
            println!("{}", rendered);
            println!("{}", config.redacted());
        }
        Some(ConfigAction::Init { force }) => {
            if config_path.exists() && !force {
                return Err(VigilError::Config(format!(
                    "{:?} already exists (use --force to overwrite)",
                    config_path
                )));
            }
            VigilConfig::default().save(config_path)?;
            println!("\x1b[38;5;46m[+]\x1b[0m Default configuration written to {:?}", config_path);
        }
    }
    Ok(())
}
