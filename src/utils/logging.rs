//! Log setup.
//!
//! The terminal belongs to the game, so events go to
//! `~/.neon-snake/neon-snake.log`. `RUST_LOG` overrides the default filter.

use crate::constants::LOG_FILE;
use crate::utils::persistence::data_path;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "neon_snake=info";

/// Install the global subscriber, appending to the log file.
///
/// Returns the log path. Failing to log is never fatal for the caller.
pub fn init() -> io::Result<PathBuf> {
    let path = data_path(LOG_FILE)?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;

    Ok(path)
}
