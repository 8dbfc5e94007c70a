//! Logging setup, command timing and standard spans.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{LogFormat, LoggingConfig};
use crate::stats::MonthKey;

/// Errors that can occur during logging initialization.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Where the log file goes, if anywhere.
///
/// An explicit file name is placed under `dir` when both are set. A bare
/// `dir` gets one file per month, named after the month the bot started in.
pub fn log_file_path(config: &LoggingConfig, month: MonthKey) -> Option<PathBuf> {
    match (&config.file, &config.dir) {
        (Some(file), Some(dir)) => Some(PathBuf::from(dir).join(file)),
        (Some(file), None) => Some(PathBuf::from(file)),
        (None, Some(dir)) => Some(PathBuf::from(dir).join(format!("slircbot_{month}.log"))),
        (None, None) => None,
    }
}

fn open_append(path: PathBuf) -> Result<File, TelemetryError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| TelemetryError::LogFile {
            path: path.clone(),
            source,
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| TelemetryError::LogFile { path, source })
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. Output goes to stdout and,
/// when configured, is appended to a file without ANSI colours.
pub fn init(config: &LoggingConfig, month: MonthKey) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let file_layer = log_file_path(config, month)
        .map(open_append)
        .transpose()?
        .map(|file| {
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
        });

    let json = config.format == LogFormat::Json;
    let json_layer = json.then(|| fmt::layer().json().with_target(true));
    let pretty_layer = (!json).then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}

/// Guard for timing command execution.
///
/// Logs the handler latency when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        debug!(command = %self.command, elapsed_ms, "command finished");
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span covering one connection to the server.
    pub fn session(server: &str, nick: &str) -> Span {
        info_span!("session", server = %server, nick = %nick)
    }

    /// Create a span for a command execution.
    pub fn command(name: &str, source: &str, target: Option<&str>) -> Span {
        if let Some(target) = target {
            info_span!("command", name = %name, source = %source, target = %target)
        } else {
            info_span!("command", name = %name, source = %source)
        }
    }
}
