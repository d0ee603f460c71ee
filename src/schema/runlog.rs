//! Run log records and their reconstruction into per-run views.
//!
//! Every evaluated candidate produces one immutable [`LogEntry`]. Persisted
//! files are JSON arrays of entries; file names carry no meaning. Analysis
//! groups entries purely by the (method, seed, run_id, format) composite key
//! inside the records.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::team::Team;

/// One logged evaluation of one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// UTC time the entry was recorded (ISO-8601 when serialized).
    pub timestamp: DateTime<Utc>,
    /// Compact JSON encoding of the `(pokemon_ids, move_id_lists)` pair.
    pub team: String,
    /// 1-based generation index.
    pub generation: u32,
    /// Rating of the team at the end of the generation.
    pub score: f64,
    /// Cumulative matches consumed in the run when the entry was recorded.
    pub total_battles_used: u64,
    /// Seconds elapsed since the run started.
    pub runtime_sec: f64,
    /// Run seed, `None` for non-deterministic runs.
    pub run_seed: Option<u64>,
    /// Strategy name (e.g. "EloGeneticAlgorithm").
    pub method: String,
    /// Battle format the run was evaluated under.
    pub format: String,
    /// Unique identifier of the optimizer execution.
    pub run_id: String,
}

impl LogEntry {
    /// Decode the team field back into a [`Team`].
    pub fn parse_team(&self) -> Result<Team, serde_json::Error> {
        Team::from_compact_json(&self.team)
    }

    fn run_key(&self) -> RunKey {
        RunKey {
            method: self.method.clone(),
            run_seed: self.run_seed,
            run_id: self.run_id.clone(),
            format: self.format.clone(),
        }
    }
}

/// Composite key identifying one optimizer execution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunKey {
    pub method: String,
    pub run_seed: Option<u64>,
    pub run_id: String,
    pub format: String,
}

/// All log entries from a single run, sorted by cumulative battles used.
#[derive(Debug, Clone)]
pub struct RunLog {
    pub method: String,
    pub run_seed: Option<u64>,
    pub run_id: String,
    pub format: String,
    entries: Vec<LogEntry>,
}

impl RunLog {
    fn new(key: RunKey, mut entries: Vec<LogEntry>) -> Self {
        entries.sort_by_key(|e| e.total_battles_used);
        Self {
            method: key.method,
            run_seed: key.run_seed,
            run_id: key.run_id,
            format: key.format,
            entries,
        }
    }

    /// Entries ordered by cumulative battles used.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Generation indices present in this run, ascending.
    pub fn generations(&self) -> Vec<u32> {
        let mut gens: Vec<u32> = self.entries.iter().map(|e| e.generation).collect();
        gens.sort_unstable();
        gens.dedup();
        gens
    }

    /// Entries partitioned by generation.
    pub fn entries_by_generation(&self) -> BTreeMap<u32, Vec<&LogEntry>> {
        let mut by_gen: BTreeMap<u32, Vec<&LogEntry>> = BTreeMap::new();
        for entry in &self.entries {
            by_gen.entry(entry.generation).or_default().push(entry);
        }
        by_gen
    }

    /// Best-scoring entry in each generation, ascending by generation.
    /// Ties keep the earliest entry.
    pub fn best_per_generation(&self) -> Vec<&LogEntry> {
        self.entries_by_generation()
            .into_values()
            .filter_map(|entries| {
                entries
                    .into_iter()
                    .reduce(|best, e| if e.score > best.score { e } else { best })
            })
            .collect()
    }

    /// Running maximum of score over entries in generation order, paired
    /// with the battles-consumed x-axis used for cross-run comparison.
    pub fn best_so_far(&self) -> Vec<BestSoFarPoint> {
        let mut ordered: Vec<&LogEntry> = self.entries.iter().collect();
        ordered.sort_by_key(|e| e.generation);

        let mut best = f64::NEG_INFINITY;
        ordered
            .into_iter()
            .map(|e| {
                best = best.max(e.score);
                BestSoFarPoint {
                    generation: e.generation,
                    score: best,
                    total_battles_used: e.total_battles_used,
                }
            })
            .collect()
    }

    /// Highest-scoring entry across the whole run.
    pub fn global_best(&self) -> Option<&LogEntry> {
        self.entries
            .iter()
            .reduce(|best, e| if e.score > best.score { e } else { best })
    }
}

/// One point on a run's best-so-far curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestSoFarPoint {
    pub generation: u32,
    pub score: f64,
    pub total_battles_used: u64,
}

/// Group entries into runs by their composite key.
pub fn group_entries_by_run(entries: Vec<LogEntry>) -> Vec<RunLog> {
    let mut grouped: BTreeMap<RunKey, Vec<LogEntry>> = BTreeMap::new();
    for entry in entries {
        grouped.entry(entry.run_key()).or_default().push(entry);
    }
    grouped
        .into_iter()
        .map(|(key, entries)| RunLog::new(key, entries))
        .collect()
}

/// Read one persisted log file (a JSON array of entries).
pub fn load_log_file(path: &Path) -> Result<Vec<LogEntry>, LogReadError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load runs from a single log file or from every `*.json` file under a
/// directory, recursively.
pub fn load_runs(path: &Path) -> Result<Vec<RunLog>, LogReadError> {
    let mut entries = Vec::new();
    collect_entries(path, &mut entries)?;
    Ok(group_entries_by_run(entries))
}

fn collect_entries(path: &Path, entries: &mut Vec<LogEntry>) -> Result<(), LogReadError> {
    if path.is_dir() {
        let mut children: Vec<_> = fs::read_dir(path)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|d| d.path())
            .collect();
        children.sort();
        for child in children {
            if child.is_dir() || child.extension().is_some_and(|ext| ext == "json") {
                collect_entries(&child, entries)?;
            }
        }
    } else {
        entries.extend(load_log_file(path)?);
    }
    Ok(())
}

/// Errors reading persisted run logs.
#[derive(Debug, thiserror::Error)]
pub enum LogReadError {
    #[error("failed to read log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse log file: {0}")]
    Json(#[from] serde_json::Error),
}
