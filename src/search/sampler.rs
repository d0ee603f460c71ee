//! Team sampling and mutation against a candidate pool.
//!
//! All randomness comes from the injected run RNG so that a run is fully
//! reproducible from its seed.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::schema::{
    CandidatePool, MOVES_PER_POKEMON, MoveId, MutationRates, PokemonId, TEAM_SIZE, Team, TeamError,
};

/// Draws valid random teams from a read-only candidate pool.
#[derive(Debug, Clone, Copy)]
pub struct TeamSampler<'a> {
    pool: &'a CandidatePool,
}

impl<'a> TeamSampler<'a> {
    pub fn new(pool: &'a CandidatePool) -> Self {
        Self { pool }
    }

    /// Sample a fresh team: 6 distinct eligible Pokemon, 4 distinct moves
    /// each, uniformly at random.
    pub fn sample(&self, rng: &mut StdRng) -> Result<Team, SampleError> {
        let eligible = self.pool.eligible();
        if eligible.len() < TEAM_SIZE {
            return Err(SampleError::PoolExhausted {
                available: eligible.len(),
            });
        }

        let chosen: Vec<PokemonId> = eligible
            .choose_multiple(rng, TEAM_SIZE)
            .copied()
            .collect();

        let mut pokemon = [0; TEAM_SIZE];
        let mut moves = [[0; MOVES_PER_POKEMON]; TEAM_SIZE];
        for (slot, pid) in chosen.into_iter().enumerate() {
            pokemon[slot] = pid;
            moves[slot] = self.sample_moves(rng, pid)?;
        }

        Ok(Team::new(pokemon, moves)?)
    }

    /// Produce a mutated copy of `parent`.
    ///
    /// Each Pokemon slot is independently re-rolled with probability
    /// `rates.pokemon` (the replacement is drawn from eligible Pokemon not
    /// already on the team and receives fresh moves). Each move slot of a
    /// kept Pokemon is independently re-rolled with probability `rates.moves`
    /// from moves the Pokemon can learn but does not already carry. A slot
    /// is kept unchanged when the pool offers no replacement.
    pub fn mutate(
        &self,
        rng: &mut StdRng,
        parent: &Team,
        rates: &MutationRates,
    ) -> Result<Team, SampleError> {
        let mut pokemon = *parent.pokemon();
        let mut moves = *parent.moves();

        for slot in 0..TEAM_SIZE {
            if rng.gen_bool(rates.pokemon) {
                let replacements: Vec<PokemonId> = self
                    .pool
                    .eligible()
                    .iter()
                    .filter(|pid| !pokemon.contains(pid))
                    .copied()
                    .collect();
                if let Some(&new_pid) = replacements.choose(rng) {
                    pokemon[slot] = new_pid;
                    moves[slot] = self.sample_moves(rng, new_pid)?;
                }
                continue;
            }

            let pid = pokemon[slot];
            let learnset = self
                .pool
                .moves(pid)
                .ok_or(SampleError::UnknownPokemon(pid))?;
            for m in 0..MOVES_PER_POKEMON {
                if rng.gen_bool(rates.moves) {
                    let current = moves[slot];
                    let options: Vec<MoveId> = learnset
                        .iter()
                        .filter(|mid| !current.contains(mid))
                        .copied()
                        .collect();
                    if let Some(&new_mid) = options.choose(rng) {
                        moves[slot][m] = new_mid;
                    }
                }
            }
        }

        Ok(Team::new(pokemon, moves)?)
    }

    fn sample_moves(
        &self,
        rng: &mut StdRng,
        pid: PokemonId,
    ) -> Result<[MoveId; MOVES_PER_POKEMON], SampleError> {
        let learnset = self
            .pool
            .moves(pid)
            .ok_or(SampleError::UnknownPokemon(pid))?;
        let chosen: Vec<MoveId> = learnset
            .choose_multiple(rng, MOVES_PER_POKEMON)
            .copied()
            .collect();

        let mut moves = [0; MOVES_PER_POKEMON];
        for (i, mid) in chosen.into_iter().enumerate() {
            moves[i] = mid;
        }
        Ok(moves)
    }
}

/// Sampling failures.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("candidate pool has only {available} Pokemon with at least 4 eligible moves; a team needs {TEAM_SIZE}")]
    PoolExhausted { available: usize },
    #[error("Pokemon {0} is not in the candidate pool")]
    UnknownPokemon(PokemonId),
    #[error(transparent)]
    Team(#[from] TeamError),
}
