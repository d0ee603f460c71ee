//! Schema module - teams, candidate pool, configuration and run-log types.

mod config;
mod pool;
mod runlog;
mod team;

pub use config::*;
pub use pool::*;
pub use runlog::*;
pub use team::*;
