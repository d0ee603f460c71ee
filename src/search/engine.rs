//! Generational optimizer: the abstract loop shared by every strategy.
//!
//! The driver owns the population, the run RNG, the oracle handle and the
//! run recorder. Strategies only decide how to seed the population, how to
//! score it and how to build the next generation; the loop, the best-so-far
//! tracking and the provenance logging live here exactly once.

use std::path::{Path, PathBuf};

use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::oracle::{MatchOracle, OracleError};
use crate::schema::{CandidatePool, ConfigError, LogEntry, SearchConfig, Team};

use super::recorder::{LogWriteError, RunRecorder};
use super::sampler::{SampleError, TeamSampler};

/// Fitness record for one population member in one generation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Rating at the end of the generation.
    pub score: f64,
    /// The team that earned it.
    pub team: Team,
    /// Population slot the team occupied, for rating carry-over.
    pub slot: usize,
}

/// Per-generation view of the shared run state handed to strategies.
///
/// Holds disjoint borrows of optimizer-owned state so strategies can sample
/// teams, invoke the oracle and consume seeded randomness without owning
/// any of it.
pub struct GenerationCtx<'a> {
    pub pool: &'a CandidatePool,
    pub oracle: &'a mut dyn MatchOracle,
    pub rng: &'a mut StdRng,
    pub format: &'a str,
    pub battles_used: &'a mut u64,
}

impl<'a> GenerationCtx<'a> {
    /// Sampler over the run's candidate pool. Tied to the pool borrow, not
    /// to the context, so it can coexist with mutable use of the RNG.
    pub fn sampler(&self) -> TeamSampler<'a> {
        TeamSampler::new(self.pool)
    }
}

/// Selection/variation policy plugged into the generational driver.
pub trait Strategy {
    /// Name recorded in every log entry (the `method` grouping key).
    fn name(&self) -> &'static str;

    /// Produce the generation-0 population.
    fn initialize_population(&mut self, ctx: &mut GenerationCtx<'_>) -> Result<Vec<Team>, SearchError>;

    /// Score every population member, updating the matches-consumed counter.
    fn evaluate(
        &mut self,
        ctx: &mut GenerationCtx<'_>,
        population: &[Team],
    ) -> Result<Vec<Evaluation>, SearchError>;

    /// Build the next population from evaluations ranked best-first.
    fn produce_next_generation(
        &mut self,
        ctx: &mut GenerationCtx<'_>,
        ranked: &[Evaluation],
    ) -> Result<Vec<Team>, SearchError>;
}

/// Errors aborting a run.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Result of one completed run.
///
/// The best candidate is returned even when persisting the run log failed;
/// the persistence failure is surfaced separately in `log_error`.
#[derive(Debug)]
pub struct RunOutcome {
    /// Best score observed across all generations.
    pub best_score: f64,
    /// Team that earned the best score.
    pub best_team: Team,
    /// Total matches consumed by the run.
    pub battles_used: u64,
    /// Identifier shared by every log entry of this run.
    pub run_id: String,
    /// Where the run log was written, if logging was enabled.
    pub log_path: Option<PathBuf>,
    /// Set when flushing the run log failed.
    pub log_error: Option<LogWriteError>,
}

/// Generational driver binding a strategy to a pool, an oracle and a seed.
pub struct Optimizer<O: MatchOracle, S: Strategy> {
    config: SearchConfig,
    pool: CandidatePool,
    oracle: O,
    strategy: S,
    rng: StdRng,
    recorder: RunRecorder,
    battles_used: u64,
}

impl<O: MatchOracle, S: Strategy> Optimizer<O, S> {
    /// Build an optimizer, validating the configuration before anything runs.
    pub fn new(
        config: SearchConfig,
        pool: CandidatePool,
        oracle: O,
        strategy: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let recorder = RunRecorder::new(
            config.log_target.clone(),
            strategy.name(),
            &config.battle_format,
            config.random_seed,
        );

        Ok(Self {
            config,
            pool,
            oracle,
            strategy,
            rng,
            recorder,
            battles_used: 0,
        })
    }

    /// Redirect the log base directory (default `logs/`).
    pub fn with_log_base_dir(mut self, base: &Path) -> Self {
        self.recorder.rebase(base);
        self
    }

    /// Identifier that will tag every log entry of this run.
    pub fn run_id(&self) -> &str {
        self.recorder.run_id()
    }

    /// In-memory log entries accumulated so far.
    pub fn log_entries(&self) -> &[LogEntry] {
        self.recorder.entries()
    }

    /// Run the full generational loop and return the global best.
    ///
    /// Exactly `config.generations` cycles of evaluate, log, select. If an
    /// evaluation fails mid-run, entries accumulated so far are flushed
    /// before the error propagates so partial runs stay analyzable.
    pub fn optimize(&mut self) -> Result<RunOutcome, SearchError> {
        let Self {
            config,
            pool,
            oracle,
            strategy,
            rng,
            recorder,
            battles_used,
        } = self;

        let mut ctx = GenerationCtx {
            pool,
            oracle,
            rng,
            format: &config.battle_format,
            battles_used,
        };

        recorder.start();
        let mut population = strategy.initialize_population(&mut ctx)?;

        let mut best: Option<(f64, Team)> = None;

        for generation in 1..=config.generations {
            info!("generation {generation}/{}", config.generations);

            let evaluations = match strategy.evaluate(&mut ctx, &population) {
                Ok(evaluations) => evaluations,
                Err(err) => {
                    warn!("generation {generation} evaluation failed, flushing partial run log");
                    if let Err(flush_err) = recorder.flush() {
                        error!("failed to flush partial run log: {flush_err}");
                    }
                    return Err(err);
                }
            };

            for e in &evaluations {
                if best.as_ref().is_none_or(|(score, _)| e.score > *score) {
                    best = Some((e.score, e.team.clone()));
                }
            }

            for e in &evaluations {
                recorder.record(generation, &e.team, e.score, *ctx.battles_used);
            }

            let mut ranked = evaluations;
            ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.slot.cmp(&b.slot)));
            info!("generation {generation}: best score {:.1}", ranked[0].score);

            population = strategy.produce_next_generation(&mut ctx, &ranked)?;
        }

        let (log_path, log_error) = match recorder.flush() {
            Ok(path) => (path, None),
            Err(err) => {
                error!("failed to persist run log: {err}");
                (None, Some(err))
            }
        };

        // generations >= 1 and population_size >= 2 are enforced at
        // construction, so at least one evaluation was observed.
        let (best_score, best_team) = best.expect("no evaluations recorded");

        Ok(RunOutcome {
            best_score,
            best_team,
            battles_used: *ctx.battles_used,
            run_id: recorder.run_id().to_string(),
            log_path,
            log_error,
        })
    }
}
