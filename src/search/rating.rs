//! Elo-style rating subsystem.
//!
//! One rating per population slot, not per team value. Ratings move with
//! match outcomes inside a generation and are pulled toward baseline
//! between generations so that skill estimated against a previous
//! population is not treated as fully informative against the next one.

use crate::oracle::MatchOutcome;

/// Baseline rating assigned to every fresh slot.
pub const BASE_RATING: f64 = 1000.0;

/// Elo K-factor: maximum rating movement per match.
pub const K_FACTOR: f64 = 32.0;

/// Inter-generation decay toward baseline.
/// 0.0 keeps full memory, 1.0 resets every generation.
pub const RATING_DECAY: f64 = 0.2;

/// Logistic win-probability estimate for the first side.
pub fn expected_score(ra: f64, rb: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rb - ra) / 400.0))
}

/// Ratings for every slot of one population, owned by a single strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingTable {
    ratings: Vec<f64>,
}

impl RatingTable {
    /// Table of `n` slots at baseline.
    pub fn new(n: usize) -> Self {
        Self {
            ratings: vec![BASE_RATING; n],
        }
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Rating of one slot.
    pub fn get(&self, slot: usize) -> f64 {
        self.ratings[slot]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.ratings
    }

    /// Pull every rating toward baseline: `r' = (1-d)*r + d*B`.
    pub fn decay(&mut self, d: f64) {
        for rating in &mut self.ratings {
            *rating = (1.0 - d) * *rating + d * BASE_RATING;
        }
    }

    /// Apply one match result between slots `a` and `b`.
    ///
    /// Win/loss score 1.0/0.0; an indeterminate outcome scores as a draw,
    /// nudging both sides toward their expectation instead of rewarding
    /// either direction.
    pub fn record_match(&mut self, a: usize, b: usize, outcome: MatchOutcome) {
        let (sa, sb) = match outcome {
            MatchOutcome::TeamA => (1.0, 0.0),
            MatchOutcome::TeamB => (0.0, 1.0),
            MatchOutcome::Indeterminate => (0.5, 0.5),
        };

        let ea = expected_score(self.ratings[a], self.ratings[b]);
        let eb = 1.0 - ea;

        self.ratings[a] += K_FACTOR * (sa - ea);
        self.ratings[b] += K_FACTOR * (sb - eb);
    }

    /// Build the next generation's table: survivor ratings carried forward
    /// in order, remaining slots reset to baseline.
    pub fn carry_forward<I>(&self, survivor_slots: I, new_len: usize) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut ratings: Vec<f64> = survivor_slots
            .into_iter()
            .map(|slot| self.ratings[slot])
            .collect();
        ratings.resize(new_len, BASE_RATING);
        Self { ratings }
    }
}
