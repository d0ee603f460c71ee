//! Search module - the population-based optimization engine.
//!
//! # Overview
//!
//! - **Team Sampler** (`sampler`): valid random teams and mutated copies
//! - **Rating Subsystem** (`rating`): Elo updates and inter-generation decay
//! - **Match Scheduler** (`scheduler`): sparse random tournament per generation
//! - **Generational Driver** (`engine`): the strategy-agnostic loop
//! - **Strategies** (`strategy`): Elo genetic algorithm and Elo random search
//! - **Run Recorder** (`recorder`): provenance log accumulation and flushing
//!
//! # Example
//!
//! ```rust,no_run
//! use teamsmith::oracle::{MatchOutcome, OracleError};
//! use teamsmith::schema::{CandidatePool, LogTarget, SearchConfig, Team};
//! use teamsmith::search::{EloRandomSearch, Optimizer};
//!
//! let pool = CandidatePool::from_path("learnsets_ou.json".as_ref())?;
//! let config = SearchConfig {
//!     population_size: 30,
//!     survivors_count: 6,
//!     num_matchups: 100,
//!     generations: 10,
//!     battle_format: "gen1ou".to_string(),
//!     random_seed: Some(0),
//!     log_target: LogTarget::DefaultLocation,
//! };
//!
//! // Any match adjudicator works; here a trivial stand-in.
//! let oracle = |_: &Team, _: &Team, _: &str| -> Result<MatchOutcome, OracleError> {
//!     Ok(MatchOutcome::Indeterminate)
//! };
//!
//! let strategy = EloRandomSearch::new(&config)?;
//! let mut optimizer = Optimizer::new(config, pool, oracle, strategy)?;
//! let outcome = optimizer.optimize()?;
//! println!("best score: {:.1}", outcome.best_score);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod engine;
mod rating;
mod recorder;
mod sampler;
mod scheduler;
mod strategy;

pub use engine::{Evaluation, GenerationCtx, Optimizer, RunOutcome, SearchError, Strategy};
pub use rating::{BASE_RATING, K_FACTOR, RATING_DECAY, RatingTable, expected_score};
pub use recorder::{DEFAULT_LOG_DIR, LogWriteError, RunRecorder};
pub use sampler::{SampleError, TeamSampler};
pub use scheduler::run_matchups;
pub use strategy::{EloGeneticAlgorithm, EloRandomSearch};
