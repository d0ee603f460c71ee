//! Search configuration and validation.

use serde::{Deserialize, Serialize};

fn default_population_size() -> usize {
    30
}
fn default_survivors_count() -> usize {
    6
}
fn default_num_matchups() -> u32 {
    100
}
fn default_generations() -> u32 {
    10
}

/// Configuration shared by every selection strategy.
///
/// Validated once at optimizer construction; a run never starts with an
/// invalid size relationship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of teams per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Top-ranked teams retained unchanged into the next generation.
    #[serde(default = "default_survivors_count")]
    pub survivors_count: usize,
    /// Matches scheduled per generation to estimate ratings.
    #[serde(default = "default_num_matchups")]
    pub num_matchups: u32,
    /// Number of generations to run.
    #[serde(default = "default_generations")]
    pub generations: u32,
    /// Battle format passed to the match oracle (e.g. "gen1ou").
    pub battle_format: String,
    /// Seed for the run RNG. `None` seeds from entropy (non-reproducible).
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Where the run log is persisted.
    #[serde(default)]
    pub log_target: LogTarget,
}

impl SearchConfig {
    /// Validate size relationships between the parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall);
        }
        if self.survivors_count == 0 || self.survivors_count >= self.population_size {
            return Err(ConfigError::InvalidSurvivors {
                survivors: self.survivors_count,
                population: self.population_size,
            });
        }
        if self.num_matchups == 0 {
            return Err(ConfigError::NoMatchups);
        }
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        Ok(())
    }
}

/// Mutation probabilities for the genetic algorithm strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MutationRates {
    /// Probability of re-rolling each Pokemon slot.
    pub pokemon: f64,
    /// Probability of re-rolling each move slot of a kept Pokemon.
    pub moves: f64,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            pokemon: 0.5,
            moves: 0.25,
        }
    }
}

impl MutationRates {
    /// Both rates must be probabilities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for rate in [self.pokemon, self.moves] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidMutationRate(rate));
            }
        }
        Ok(())
    }
}

/// Where a run log is written.
///
/// Resolved into a concrete directory once when the run recorder is built,
/// keeping path policy out of the evaluation loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LogTarget {
    /// No log entries are recorded or persisted.
    #[default]
    Disabled,
    /// `<base>/<YYYY-MM-DD>/`.
    DefaultLocation,
    /// `<base>/<YYYY-MM-DD>/<label>/`.
    Named { label: String },
}

/// Configuration validation errors. Fatal; raised before any sampling.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("population size must be at least 2")]
    PopulationTooSmall,
    #[error("survivor count {survivors} must be at least 1 and below population size {population}")]
    InvalidSurvivors { survivors: usize, population: usize },
    #[error("at least one matchup per generation is required")]
    NoMatchups,
    #[error("at least one generation is required")]
    NoGenerations,
    #[error("mutation rate {0} is outside [0, 1]")]
    InvalidMutationRate(f64),
}
