//! Candidate pool - the eligibility-filtered learnset snapshot.
//!
//! Loaded once before optimization and never mutated afterwards. The JSON
//! format matches the per-tier learnset files produced by the data pipeline:
//! an object keyed by stringified Pokemon id, each value carrying a
//! `"learned"` array of objects with a `"move_id"` field.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::team::{MOVES_PER_POKEMON, MoveId, PokemonId};

/// Read-only mapping from Pokemon id to its eligible move list.
///
/// Move lists are deduplicated and sorted on load so that sampling is
/// deterministic regardless of source file ordering.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    learnsets: BTreeMap<PokemonId, Vec<MoveId>>,
    /// Ids with at least [`MOVES_PER_POKEMON`] eligible moves, ascending.
    eligible: Vec<PokemonId>,
}

impl CandidatePool {
    /// Build a pool from an already-parsed learnset mapping.
    pub fn from_learnsets(learnsets: BTreeMap<PokemonId, Vec<MoveId>>) -> Self {
        let mut learnsets = learnsets;
        for moves in learnsets.values_mut() {
            moves.sort_unstable();
            moves.dedup();
        }
        let eligible = learnsets
            .iter()
            .filter(|(_, moves)| moves.len() >= MOVES_PER_POKEMON)
            .map(|(pid, _)| *pid)
            .collect();
        Self { learnsets, eligible }
    }

    /// Parse a learnset snapshot from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, PoolLoadError> {
        let raw: BTreeMap<String, LearnsetEntry> = serde_json::from_str(json)?;

        let mut learnsets = BTreeMap::new();
        for (key, entry) in raw {
            let pid: PokemonId = key
                .parse()
                .map_err(|_| PoolLoadError::InvalidPokemonId(key))?;
            let moves = entry.learned.into_iter().map(|m| m.move_id).collect();
            learnsets.insert(pid, moves);
        }

        Ok(Self::from_learnsets(learnsets))
    }

    /// Load a learnset snapshot from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, PoolLoadError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Pokemon with at least 4 eligible moves, in ascending id order.
    pub fn eligible(&self) -> &[PokemonId] {
        &self.eligible
    }

    /// Eligible move list for one Pokemon, if it is in the pool.
    pub fn moves(&self, pokemon: PokemonId) -> Option<&[MoveId]> {
        self.learnsets.get(&pokemon).map(|m| m.as_slice())
    }

    /// Total number of Pokemon in the pool, eligible or not.
    pub fn len(&self) -> usize {
        self.learnsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.learnsets.is_empty()
    }
}

/// One learnset record in the snapshot file.
#[derive(Debug, Deserialize)]
struct LearnsetEntry {
    #[serde(default)]
    learned: Vec<LearnedMove>,
}

/// One learned-move record; extra metadata fields are ignored.
#[derive(Debug, Deserialize)]
struct LearnedMove {
    move_id: MoveId,
}

/// Pool snapshot loading errors.
#[derive(Debug, thiserror::Error)]
pub enum PoolLoadError {
    #[error("failed to read learnset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse learnset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("learnset key {0:?} is not a numeric Pokemon id")]
    InvalidPokemonId(String),
}
