// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// Start signal handlers (Unix only)
///
/// Handlers are registered before returning so registration errors reach the
/// caller; the background task then requests shutdown on the first signal.
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    logger::log_info(&format!(
        "Signal handlers registered (SIGTERM, SIGINT), pid {}",
        std::process::id()
    ));

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        logger::log_info(&format!("{name} received, initiating graceful shutdown"));
        state.request_shutdown();
    });

    Ok(())
}

/// Non-unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_info("Ctrl+C received, initiating graceful shutdown");
            state.request_shutdown();
        }
    });

    Ok(())
}
