use super::utils::print_banner;
use std::sync::Arc;
use tracing::{error, info, warn};
use vigil_daemon::{
    CancellationToken, CommandLauncher, ProbeClient, Supervisor, SupervisorState,
    SystemProcessDirectory, SystemResourceSampler, VigilConfig,
};
use vigil_types::VigilResult;

pub async fn run_watchdog(config: VigilConfig) -> VigilResult<()> {
    print_banner();
    info!("Starting vigil v{}", env!("CARGO_PKG_VERSION"));

    let (cancel_tx, cancel) = CancellationToken::new();
    let state = Arc::new(SupervisorState::new());

    let mut supervisor = Supervisor::new(
        config,
        state,
        Arc::new(ProbeClient::new()?),
        Arc::new(SystemResourceSampler::new()),
        Arc::new(SystemProcessDirectory::new()),
        Arc::new(CommandLauncher::new()),
        cancel,
    );

    tokio::spawn(async move {
        wait_for_shutdown().await;
        info!("Shutting down...");
        let _ = cancel_tx.send(true);
    });

    supervisor.run().await
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => { info!("Received SIGTERM"); }
                    _ = sigint.recv() => { info!("Received SIGINT"); }
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to install signal handlers, falling back to Ctrl+C: {}", e);
            }
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C");
}
