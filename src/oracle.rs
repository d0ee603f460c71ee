//! Match oracle contract - the external collaborator that adjudicates matches.
//!
//! The optimizer never simulates a match itself. It hands two teams and a
//! battle format to an oracle and consumes the outcome. Oracle-internal
//! timeouts must surface as [`MatchOutcome::Indeterminate`], not as errors;
//! only a collaborator that cannot run at all reports [`OracleError`].

use crate::schema::Team;

/// Outcome of a single adjudicated match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The first team won.
    TeamA,
    /// The second team won.
    TeamB,
    /// No decisive result (simulation timeout or unparseable replay).
    /// Scored as a draw by the rating subsystem.
    Indeterminate,
}

/// Hard oracle failures. Distinct from [`MatchOutcome::Indeterminate`]:
/// an unavailable oracle aborts the run since no fitness signal exists.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("match oracle unavailable: {0}")]
    Unavailable(String),
}

/// Adjudicates one match between two teams under the given battle format.
///
/// Independent calls must not observe each other through shared mutable
/// state; `&mut self` exists so implementations can keep private counters
/// or connection handles.
pub trait MatchOracle {
    fn play(&mut self, team_a: &Team, team_b: &Team, format: &str) -> Result<MatchOutcome, OracleError>;
}

impl<F> MatchOracle for F
where
    F: FnMut(&Team, &Team, &str) -> Result<MatchOutcome, OracleError>,
{
    fn play(&mut self, team_a: &Team, team_b: &Team, format: &str) -> Result<MatchOutcome, OracleError> {
        self(team_a, team_b, format)
    }
}
