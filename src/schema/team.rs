//! Team value object and its persisted representation.
//!
//! A team is a fixed composition of 6 distinct Pokemon, each carrying 4
//! distinct moves. Teams are immutable once constructed; optimization
//! always produces new teams rather than editing one in place.
//!
//! The persisted form is the compact pair `[[pokemon_ids], [move_id_lists]]`
//! consumed by downstream analysis tooling.

use serde::{Deserialize, Serialize};

/// Pokedex identifier of one species.
pub type PokemonId = u32;

/// Identifier of one move.
pub type MoveId = u32;

/// Number of Pokemon per team.
pub const TEAM_SIZE: usize = 6;

/// Number of moves per Pokemon.
pub const MOVES_PER_POKEMON: usize = 4;

/// One candidate solution: 6 distinct Pokemon with 4 distinct moves each.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TeamRepr", into = "TeamRepr")]
pub struct Team {
    pokemon: [PokemonId; TEAM_SIZE],
    moves: [[MoveId; MOVES_PER_POKEMON]; TEAM_SIZE],
}

impl Team {
    /// Build a team, enforcing the composition invariants.
    pub fn new(
        pokemon: [PokemonId; TEAM_SIZE],
        moves: [[MoveId; MOVES_PER_POKEMON]; TEAM_SIZE],
    ) -> Result<Self, TeamError> {
        for (i, pid) in pokemon.iter().enumerate() {
            if pokemon[..i].contains(pid) {
                return Err(TeamError::DuplicatePokemon(*pid));
            }
        }
        for (pid, slot_moves) in pokemon.iter().zip(moves.iter()) {
            for (i, mid) in slot_moves.iter().enumerate() {
                if slot_moves[..i].contains(mid) {
                    return Err(TeamError::DuplicateMove {
                        pokemon: *pid,
                        move_id: *mid,
                    });
                }
            }
        }
        Ok(Self { pokemon, moves })
    }

    /// Pokemon ids in slot order.
    pub fn pokemon(&self) -> &[PokemonId; TEAM_SIZE] {
        &self.pokemon
    }

    /// Move ids per slot, aligned with [`Team::pokemon`].
    pub fn moves(&self) -> &[[MoveId; MOVES_PER_POKEMON]; TEAM_SIZE] {
        &self.moves
    }

    /// Whether the given species is on this team.
    pub fn contains(&self, pokemon: PokemonId) -> bool {
        self.pokemon.contains(&pokemon)
    }

    /// Compact JSON form used inside log entries:
    /// `[[pid,...],[[mid,...],...]]` with no whitespace.
    pub fn to_compact_json(&self) -> String {
        serde_json::to_string(self).expect("team serializes to plain JSON arrays")
    }

    /// Parse a team from its compact JSON form.
    pub fn from_compact_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Team composition violations.
#[derive(Debug, thiserror::Error)]
pub enum TeamError {
    #[error("Pokemon {0} appears more than once on the team")]
    DuplicatePokemon(PokemonId),
    #[error("move {move_id} appears more than once on Pokemon {pokemon}")]
    DuplicateMove { pokemon: PokemonId, move_id: MoveId },
    #[error("expected {expected} entries, got {got}")]
    WrongLength { expected: usize, got: usize },
}

/// Wire form: the `(pokemon_ids, moves_ids_per_pokemon)` pair.
#[derive(Serialize, Deserialize)]
struct TeamRepr(Vec<PokemonId>, Vec<Vec<MoveId>>);

impl From<Team> for TeamRepr {
    fn from(team: Team) -> Self {
        TeamRepr(
            team.pokemon.to_vec(),
            team.moves.iter().map(|m| m.to_vec()).collect(),
        )
    }
}

impl TryFrom<TeamRepr> for Team {
    type Error = TeamError;

    fn try_from(repr: TeamRepr) -> Result<Self, TeamError> {
        let pokemon: [PokemonId; TEAM_SIZE] =
            repr.0
                .as_slice()
                .try_into()
                .map_err(|_| TeamError::WrongLength {
                    expected: TEAM_SIZE,
                    got: repr.0.len(),
                })?;

        if repr.1.len() != TEAM_SIZE {
            return Err(TeamError::WrongLength {
                expected: TEAM_SIZE,
                got: repr.1.len(),
            });
        }
        let mut moves = [[0; MOVES_PER_POKEMON]; TEAM_SIZE];
        for (slot, slot_moves) in repr.1.iter().enumerate() {
            moves[slot] =
                slot_moves
                    .as_slice()
                    .try_into()
                    .map_err(|_| TeamError::WrongLength {
                        expected: MOVES_PER_POKEMON,
                        got: slot_moves.len(),
                    })?;
        }

        Team::new(pokemon, moves)
    }
}
