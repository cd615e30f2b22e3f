use super::commands::OutputFormat;
use std::sync::Arc;
use tracing::info;
use vigil_daemon::{ProcessReaper, SystemProcessDirectory, VigilConfig};
use vigil_types::VigilResult;

pub async fn run_reap(config: &VigilConfig, format: OutputFormat) -> VigilResult<()> {
    let reaper = ProcessReaper::new(
        Arc::new(SystemProcessDirectory::new()),
        config.restart.kill_grace(),
        config.restart.port_release(),
    );

    info!(
        "Manual sweep of port {} and processes matching '{}'",
        config.target.port, config.target.signature
    );
    let report = reaper.reap(config.target.port, &config.target.signature).await;

    match format {
        OutputFormat::Json => {
            let failures: Vec<serde_json::Value> = report
                .failures
                .iter()
                .map(|(pid, reason)| serde_json::json!({ "pid": pid, "reason": reason }))
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "terminated": report.terminated,
                    "killed": report.killed,
                    "failures": failures,
                })
            );
        }
        OutputFormat::Text => {
            println!("\x1b[38;5;46m[+]\x1b[0m Terminated: {:?}", report.terminated);
            println!("\x1b[38;5;46m[+]\x1b[0m Force killed: {:?}", report.killed);
            for (pid, reason) in &report.failures {
                println!("\x1b[38;5;196m[-]\x1b[0m pid {}: {}", pid, reason);
            }
        }
    }

    Ok(())
}
