//! Log writer module
//!
//! Thread-safe log writing to files or stdout/stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use super::Level;

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => Ok(Self::File(Mutex::new(open_log_file(p)?))),
            None => Ok(fallback),
        }
    }

    fn write(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
        }
    }
}

/// Thread-safe log writer
pub struct LogWriter {
    level: Level,
    /// Access and info log target
    access: LogTarget,
    /// Error and warning log target
    error: LogTarget,
}

impl LogWriter {
    fn new(
        level: Level,
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
    ) -> io::Result<Self> {
        Ok(Self {
            level,
            access: LogTarget::open(access_log_file, LogTarget::Stdout)?,
            error: LogTarget::open(error_log_file, LogTarget::Stderr)?,
        })
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Write a leveled message; debug and info go to the access target
    pub fn write(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        match level {
            Level::Debug | Level::Info => self.access.write(message),
            Level::Warn | Level::Error => self.error.write(message),
        }
    }

    /// Access log lines bypass the level filter
    pub fn write_access(&self, message: &str) {
        self.access.write(message);
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// Returns error if log files cannot be opened or the writer is already set.
pub fn init(
    level: Level,
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
) -> io::Result<()> {
    let writer = LogWriter::new(level, access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if initialized
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        let writer = LogWriter::new(Level::Warn, None, None).unwrap();
        assert!(!writer.enabled(Level::Debug));
        assert!(!writer.enabled(Level::Info));
        assert!(writer.enabled(Level::Warn));
        assert!(writer.enabled(Level::Error));
    }

    #[test]
    fn test_file_target() {
        let dir = std::env::temp_dir().join(format!("chatbot-log-{}", std::process::id()));
        let access = dir.join("nested/access.log");
        let error = dir.join("error.log");

        let writer = LogWriter::new(
            Level::Info,
            Some(access.to_str().unwrap()),
            Some(error.to_str().unwrap()),
        )
        .unwrap();
        writer.write(Level::Info, "server up");
        writer.write(Level::Debug, "hidden");
        writer.write(Level::Error, "boom");
        writer.write_access("GET / 200");

        let access_log = std::fs::read_to_string(&access).unwrap();
        assert!(access_log.contains("server up"));
        assert!(access_log.contains("GET / 200"));
        assert!(!access_log.contains("hidden"));
        assert!(std::fs::read_to_string(&error).unwrap().contains("boom"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
