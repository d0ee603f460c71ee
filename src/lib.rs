//! Teamsmith - population-based search for competitive team compositions.
//!
//! Team building is treated as a black-box optimization problem: candidate
//! teams are scored through pairwise simulated matches adjudicated by an
//! external oracle, and a population of candidates is improved across
//! generations. Two strategies share one generational engine: an Elo-rated
//! genetic algorithm and an Elo-rated random search baseline.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: teams, the candidate pool snapshot, configuration and the
//!   persisted run-log model
//! - `search`: sampling, ratings, match scheduling, the generational driver
//!   and the concrete strategies
//! - `oracle`: the match adjudication contract consumed by the engine
//!
//! Match simulation, candidate-pool acquisition and plotting are external
//! collaborators; this crate only consumes their contracts.
//!
//! # Reproducibility
//!
//! A run is driven by a single seeded RNG threaded through team sampling,
//! pair scheduling and mutation. Given the same pool, seed, configuration
//! and oracle behavior, a run reproduces bit-exactly.

pub mod oracle;
pub mod schema;
pub mod search;

// Re-export commonly used types
pub use oracle::{MatchOracle, MatchOutcome, OracleError};
pub use schema::{CandidatePool, LogTarget, MutationRates, SearchConfig, Team};
pub use search::{EloGeneticAlgorithm, EloRandomSearch, Optimizer, RunOutcome};
