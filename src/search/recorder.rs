//! Run recorder: in-memory provenance log and its flush to disk.
//!
//! Entries accumulate in memory during the run and are written once, as a
//! pretty-printed JSON array, under
//! `<base>/<YYYY-MM-DD>[/<label>]/<Method>_<HH-MM-SS>.json`. File names are
//! not semantically significant; analysis groups entries by the composite
//! run key stored inside each record.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::schema::{LogEntry, LogTarget, Team};

/// Default base directory for persisted run logs.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Accumulates log entries for one run and flushes them to durable storage.
#[derive(Debug)]
pub struct RunRecorder {
    target: LogTarget,
    /// Output directory resolved once at construction; `None` disables both
    /// recording and flushing.
    dir: Option<PathBuf>,
    method: String,
    format: String,
    run_seed: Option<u64>,
    run_id: String,
    started_at: Option<Instant>,
    entries: Vec<LogEntry>,
}

impl RunRecorder {
    pub fn new(target: LogTarget, method: &str, format: &str, run_seed: Option<u64>) -> Self {
        let dir = resolve_log_dir(&target, Path::new(DEFAULT_LOG_DIR));
        Self {
            target,
            dir,
            method: method.to_string(),
            format: format.to_string(),
            run_seed,
            run_id: Uuid::new_v4().to_string(),
            started_at: None,
            entries: Vec::new(),
        }
    }

    /// Re-resolve the output directory under a different base.
    pub fn rebase(&mut self, base: &Path) {
        self.dir = resolve_log_dir(&self.target, base);
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Entries recorded so far, in emission order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Mark the start of the run; runtime in entries counts from here.
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Record one evaluated candidate. No-op when logging is disabled.
    pub fn record(&mut self, generation: u32, team: &Team, score: f64, battles_used: u64) {
        if self.dir.is_none() {
            return;
        }
        let runtime_sec = self
            .started_at
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);

        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            team: team.to_compact_json(),
            generation,
            score,
            total_battles_used: battles_used,
            runtime_sec,
            run_seed: self.run_seed,
            method: self.method.clone(),
            format: self.format.clone(),
            run_id: self.run_id.clone(),
        });
    }

    /// Write all recorded entries to disk.
    ///
    /// Returns the file path, or `Ok(None)` when logging is disabled or
    /// nothing was recorded. The in-memory entries are kept either way so a
    /// failed flush never discards results.
    pub fn flush(&self) -> Result<Option<PathBuf>, LogWriteError> {
        let Some(dir) = &self.dir else {
            return Ok(None);
        };
        if self.entries.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(dir)?;
        let filename = format!("{}_{}.json", self.method, Utc::now().format("%H-%M-%S"));
        let path = dir.join(filename);

        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&path, json)?;

        info!("saved {} run log entries to {}", self.entries.len(), path.display());
        Ok(Some(path))
    }
}

fn resolve_log_dir(target: &LogTarget, base: &Path) -> Option<PathBuf> {
    let date_dir = || base.join(Utc::now().format("%Y-%m-%d").to_string());
    match target {
        LogTarget::Disabled => None,
        LogTarget::DefaultLocation => Some(date_dir()),
        LogTarget::Named { label } => Some(date_dir().join(label)),
    }
}

/// Run log persistence errors. Reported, never allowed to discard results.
#[derive(Debug, thiserror::Error)]
pub enum LogWriteError {
    #[error("failed to write run log: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize run log: {0}")]
    Json(#[from] serde_json::Error),
}
