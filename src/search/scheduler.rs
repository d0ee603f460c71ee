//! Match scheduling: the sparse random tournament within one generation.

use log::debug;

use crate::schema::Team;

use super::engine::GenerationCtx;
use super::rating::RatingTable;

/// Schedule `num_matchups` matches between uniformly drawn distinct slots.
///
/// Pairings are unstructured on purpose: repeats across draws are allowed
/// and no bracket is built. Ratings converge over repeated generations
/// rather than within one. Rating updates are applied in draw order and the
/// run-wide matches-consumed counter advances once per oracle invocation.
///
/// An indeterminate outcome is a first-class result scored as a draw; only
/// a hard oracle failure aborts scheduling.
pub fn run_matchups(
    ctx: &mut GenerationCtx<'_>,
    population: &[Team],
    ratings: &mut RatingTable,
    num_matchups: u32,
) -> Result<(), crate::oracle::OracleError> {
    let n = population.len();

    for _ in 0..num_matchups {
        let pair = rand::seq::index::sample(ctx.rng, n, 2);
        let (a, b) = (pair.index(0), pair.index(1));

        let outcome = ctx
            .oracle
            .play(&population[a], &population[b], ctx.format)?;
        debug!("match {a} vs {b}: {outcome:?}");

        ratings.record_match(a, b, outcome);
        *ctx.battles_used += 1;
    }

    Ok(())
}
