//! Diagnostic logging setup.
//!
//! The engine itself only emits `tracing` events. Hosts that do not install their own
//! subscriber can call [`init`] to route them to stderr or to the configured log file.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    OpenLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Installs a global fmt subscriber. `RUST_LOG` overrides the default level, which is `debug`
/// when the debug flag is set and `info` otherwise.
pub fn init(config: &EngineConfig) -> Result<(), LoggingError> {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match config.write_log.as_deref() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenLog {
                    path: PathBuf::from(path),
                    source,
                })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };

    installed.map_err(|_| LoggingError::AlreadyInitialized)
}
