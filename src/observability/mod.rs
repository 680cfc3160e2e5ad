//! Logging setup.
//!
//! The hook's only diagnostic surface is a fixed append-only log file:
//! timestamped, leveled lines, no rotation, never consumed by anything
//! else in the system. Stdout is reserved for the hook response and
//! stderr stays quiet so the host's interaction stream cannot be
//! corrupted by diagnostics.

use crate::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Env var overriding the log filter (standard `RUST_LOG` syntax).
pub const LOG_FILTER_ENV: &str = "DEBUG_REMINDER_LOG";

/// Initializes logging to the given append-only file.
///
/// `verbose` lowers the default filter from `info` to `debug`; the
/// `DEBUG_REMINDER_LOG` environment variable overrides both. Subsequent
/// calls are a no-op, so library consumers and tests can call this freely.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or the subscriber
/// fails to install.
pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    if LOGGING_INIT.get().is_some() {
        return Ok(());
    }

    let writer = open_log_file(log_file)?;
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .map_err(|e| Error::OperationFailed {
            operation: "logging_init".to_string(),
            cause: e.to_string(),
        })?;

    let _ = LOGGING_INIT.set(());
    Ok(())
}

/// Thread-safe file writer for logging.
#[derive(Clone)]
struct LogFileWriter {
    file: Arc<Mutex<File>>,
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::other(e.to_string()))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::other(e.to_string()))?;
        guard.flush()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogFileWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Opens a log file for appending.
fn open_log_file(path: &Path) -> Result<LogFileWriter> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
            operation: "create_log_dir".to_string(),
            cause: e.to_string(),
        })?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::OperationFailed {
            operation: "open_log_file".to_string(),
            cause: format!("{}: {}", path.display(), e),
        })?;

    Ok(LogFileWriter {
        file: Arc::new(Mutex::new(file)),
    })
}
