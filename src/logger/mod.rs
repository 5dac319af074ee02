//! Logger module
//!
//! Provides logging utilities for the chatbot server including:
//! - Server lifecycle logging
//! - Access logging in combined, common or json format
//! - Leveled error, warning and debug logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::Config;
use std::net::SocketAddr;
use std::str::FromStr;

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("Unknown log level '{other}'")),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config
        .logging
        .level
        .parse::<Level>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    config
        .logging
        .access_log_format
        .parse::<AccessLogFormat>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level >= Level::Warn => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, rules: usize) {
    write(Level::Info, "======================================");
    write(Level::Info, "Chatbot server started successfully");
    write(Level::Info, &format!("Listening on: http://{addr}"));
    write(Level::Info, &format!("Log level: {}", config.logging.level));
    write(Level::Info, &format!("Classifier rules: {rules}"));
    if let Some(workers) = config.server.workers {
        write(Level::Info, &format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(Level::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(Level::Info, &format!("Error log: {path}"));
    }
    write(Level::Info, &format!("CORS enabled: {}", config.http.enable_cors));
    write(Level::Info, "======================================\n");
}

pub fn log_info(message: &str) {
    write(Level::Info, &format!("[INFO] {message}"));
}

pub fn log_debug(message: &str) {
    write(Level::Debug, &format!("[DEBUG] {message}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(Level::Debug, &format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(Level::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

/// Log the outcome of a chat classification
pub fn log_classification(rule: Option<usize>, message_len: usize) {
    match rule {
        Some(index) => log_debug(&format!("[Chat] Matched rule #{index} ({message_len} chars)")),
        None => log_debug(&format!("[Chat] No rule matched ({message_len} chars), using fallback")),
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

pub fn log_shutdown(active: usize) {
    write(Level::Info, "\n[Shutdown] Stopped accepting connections");
    if active > 0 {
        write(
            Level::Info,
            &format!("[Shutdown] Waiting for {active} active connection(s)"),
        );
    }
}
