use super::utils::print_banner;
use std::env::consts::{ARCH, OS};
use vigil_daemon::config::constants::{
    DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_FAILURE_THRESHOLD, DEFAULT_MAX_RESTART_ATTEMPTS,
};

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn section(title: &str) {
    println!("\x1b[38;5;46m{}\x1b[0m", title);
    println!("\x1b[38;5;245m{}\x1b[0m", "─".repeat(44));
}

pub fn show_version() {
    print_banner();

    section("Build");
    println!("  version    {}", BUILD_VERSION);
    println!("  platform   {}-{}", ARCH, OS);
    println!("  profile    {}", build_profile());
    println!();

    section("Defaults");
    println!("  interval   {}s between checks", DEFAULT_CHECK_INTERVAL_SECS);
    println!("  threshold  {} consecutive failures", DEFAULT_FAILURE_THRESHOLD);
    println!("  ceiling    {} restarts before cooldown", DEFAULT_MAX_RESTART_ATTEMPTS);
}
