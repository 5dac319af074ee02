// Server loop module
// Accepts connections until shutdown is requested, then drains

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Poll interval while waiting for connections to finish
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Accept connections until shutdown is requested.
///
/// After shutdown the listener is closed. Idle keep-alive connections close
/// right away; in-flight ones get up to `performance.shutdown_timeout`
/// seconds to finish.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    loop {
        tokio::select! {
            biased;

            () = state.wait_for_shutdown() => break,

            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
        }
    }

    drop(listener);
    logger::log_shutdown(state.connection_count());

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    if !drain_connections(&state, grace).await {
        logger::log_warning(&format!(
            "Shutdown timeout after {} seconds, {} connection(s) still active",
            grace.as_secs(),
            state.connection_count()
        ));
    }
}

/// Wait until no connection is active; false if the grace period ran out
async fn drain_connections(state: &AppState, grace: Duration) -> bool {
    tokio::time::timeout(grace, async {
        while state.connection_count() > 0 {
            tokio::time::sleep(DRAIN_POLL).await;
        }
    })
    .await
    .is_ok()
}
