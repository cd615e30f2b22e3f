mod checks;
mod commands;
mod config_cmd;
mod info;
mod reap;
mod run;
mod utils;

pub use checks::run_check;
pub use commands::{Cli, Commands};
pub use config_cmd::handle_config;
pub use info::show_version;
pub use reap::run_reap;
pub use run::run_watchdog;
pub use utils::init_logging;
