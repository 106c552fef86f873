//! JSON and plain-text persistence under ~/.neon-snake/.
//!
//! Everything here is best-effort: loads fall back to defaults and the game
//! never stops because a file could not be read or written.

use crate::constants::{DATA_DIR_NAME, HIGH_SCORE_FILE, HISTORY_FILE, HISTORY_LEN};
use crate::game::types::{FinishedRun, GameOverCause};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Get the ~/.neon-snake/ directory path, creating it if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(DATA_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in ~/.neon-snake/.
pub fn data_path(filename: &str) -> io::Result<PathBuf> {
    Ok(data_dir()?.join(filename))
}

/// Load a JSON file, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
        Err(_) => T::default(),
    }
}

/// Save a value as pretty-printed JSON.
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

/// Read a high score stored as a decimal integer string.
///
/// Missing files, unreadable files, garbage and negative values all read as 0.
pub fn read_high_score(path: &Path) -> i64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|&n| n >= 0)
        .unwrap_or(0)
}

/// Write a high score as a plain integer string.
pub fn write_high_score(path: &Path, score: i64) -> io::Result<()> {
    fs::write(path, score.to_string())
}

/// High score from the default location, 0 on any failure.
pub fn load_high_score() -> i64 {
    match data_path(HIGH_SCORE_FILE) {
        Ok(path) => read_high_score(&path),
        Err(_) => 0,
    }
}

pub fn save_high_score(score: i64) -> io::Result<()> {
    write_high_score(&data_path(HIGH_SCORE_FILE)?, score)
}

/// One finished run, kept for the `--history` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub score: i64,
    pub level: u32,
    pub length: usize,
    pub cause: GameOverCause,
    /// RFC 3339 timestamp.
    pub finished_at: String,
    pub duration_ms: u64,
}

impl RunRecord {
    /// Stamp a finished run with the current time.
    pub fn from_finished(run: &FinishedRun) -> Self {
        Self {
            score: run.score,
            level: run.level,
            length: run.length,
            cause: run.cause,
            finished_at: chrono::Utc::now().to_rfc3339(),
            duration_ms: run.duration_ms,
        }
    }
}

/// Append a run to the history file, keeping only the most recent entries.
pub fn append_run(path: &Path, record: RunRecord) -> io::Result<Vec<RunRecord>> {
    let mut history: Vec<RunRecord> = load_json_or_default(path);
    history.push(record);
    if history.len() > HISTORY_LEN {
        let excess = history.len() - HISTORY_LEN;
        history.drain(..excess);
    }
    save_json(path, &history)?;
    Ok(history)
}

pub fn load_history() -> Vec<RunRecord> {
    match data_path(HISTORY_FILE) {
        Ok(path) => load_json_or_default(&path),
        Err(_) => Vec::new(),
    }
}

pub fn record_run(record: RunRecord) -> io::Result<Vec<RunRecord>> {
    append_run(&data_path(HISTORY_FILE)?, record)
}
