// Connection handling module
// Accepts a single TCP connection and serves it with hyper

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};

use crate::config::AppState;
use crate::handler;
use crate::http;
use crate::logger;

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
) {
    if state.is_shutting_down() {
        logger::log_debug(&format!("Shutting down, dropping connection from {peer_addr}"));
        return;
    }

    // Increment counter first, then check limit (prevents race condition)
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    handle_connection(stream, peer_addr, Arc::clone(state));
}

/// Serve one connection in a spawned task.
///
/// Between requests the connection may stay idle for
/// `performance.keep_alive_timeout` seconds (`read_timeout` when keep-alive
/// is off). Each request is bounded by the larger of the read and write
/// timeouts. On shutdown the connection finishes its current request and
/// closes.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let keep_alive = performance.keep_alive_timeout > 0;
        let idle_timeout = if keep_alive {
            performance.keep_alive_timeout
        } else {
            performance.read_timeout
        };
        let request_timeout = Duration::from_secs(std::cmp::max(
            performance.read_timeout,
            performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(keep_alive)
            .header_read_timeout(Duration::from_secs(idle_timeout));

        let service_state = Arc::clone(&state);
        let service = service_fn(move |req| {
            let state = Arc::clone(&service_state);
            async move {
                let handled = handler::handle_request(req, peer_addr, Arc::clone(&state));
                match tokio::time::timeout(request_timeout, handled).await {
                    Ok(result) => result,
                    Err(_) => {
                        logger::log_warning(&format!(
                            "Request from {peer_addr} timed out after {} seconds",
                            request_timeout.as_secs()
                        ));
                        let mut resp = http::build_408_response();
                        http::apply_common_headers(&mut resp, &state.config.http);
                        Ok(resp)
                    }
                }
            }
        });

        let mut conn = std::pin::pin!(builder.serve_connection(io, service));
        let served = async {
            tokio::select! {
                result = conn.as_mut() => return result,
                () = state.wait_for_shutdown() => conn.as_mut().graceful_shutdown(),
            }
            conn.as_mut().await
        };

        match served.await {
            Ok(()) => {}
            Err(err) if err.is_timeout() => logger::log_debug(&format!(
                "Connection from {peer_addr} idle for {idle_timeout} seconds, closing"
            )),
            Err(err) => logger::log_connection_error(&err),
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}
