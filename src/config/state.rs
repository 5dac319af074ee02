// Application state module
// Immutable state shared by every connection

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use super::types::Config;
use crate::classifier::Classifier;
use crate::logger::AccessLogFormat;

/// Application state
pub struct AppState {
    pub config: Config,
    pub classifier: Classifier,

    /// Parsed once from `logging.access_log_format`
    pub access_log_format: AccessLogFormat,

    /// Active connection count
    pub active_connections: Arc<AtomicUsize>,

    /// Shutdown flag (SIGTERM, SIGINT), observed by the accept loop and
    /// every open connection
    shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(config: Config, classifier: Classifier) -> Self {
        let access_log_format = config
            .logging
            .access_log_format
            .parse::<AccessLogFormat>()
            .unwrap_or_default();

        Self {
            config,
            classifier,
            access_log_format,
            active_connections: Arc::new(AtomicUsize::new(0)),
            shutdown: watch::Sender::new(false),
        }
    }

    /// Stop accepting connections and close open ones once idle
    pub fn request_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Resolves once shutdown has been requested, immediately if it already was
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.shutdown.subscribe();
        // the sender lives in self, so the channel cannot close while waiting
        let _ = rx.wait_for(|stop| *stop).await;
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}
