//! Concrete selection strategies over the shared generational loop.
//!
//! Both strategies score populations identically (random matchups feeding
//! Elo updates, with inter-generation decay) and differ only in how
//! non-survivor slots are refilled: directed mutation of survivors versus
//! undirected resampling. This isolates the contribution of mutation when
//! the two are compared over the same evaluation machinery.

use crate::schema::{ConfigError, MutationRates, SearchConfig, Team};

use super::engine::{Evaluation, GenerationCtx, SearchError, Strategy};
use super::rating::{RATING_DECAY, RatingTable};
use super::scheduler::run_matchups;

/// Shared Elo evaluation: decay carried ratings, run the generation's
/// matchups, and return one evaluation per slot.
fn evaluate_with_elo(
    ctx: &mut GenerationCtx<'_>,
    population: &[Team],
    ratings: &mut RatingTable,
    num_matchups: u32,
) -> Result<Vec<Evaluation>, SearchError> {
    if ratings.len() != population.len() {
        *ratings = RatingTable::new(population.len());
    } else {
        ratings.decay(RATING_DECAY);
    }

    run_matchups(ctx, population, ratings, num_matchups)?;

    Ok(population
        .iter()
        .enumerate()
        .map(|(slot, team)| Evaluation {
            score: ratings.get(slot),
            team: team.clone(),
            slot,
        })
        .collect())
}

/// Evolutionary search: survivors are kept, the rest of the population is
/// refilled with mutated copies of survivors.
pub struct EloGeneticAlgorithm {
    population_size: usize,
    survivors_count: usize,
    num_matchups: u32,
    rates: MutationRates,
    ratings: RatingTable,
}

impl EloGeneticAlgorithm {
    pub fn new(config: &SearchConfig, rates: MutationRates) -> Result<Self, ConfigError> {
        config.validate()?;
        rates.validate()?;
        Ok(Self {
            population_size: config.population_size,
            survivors_count: config.survivors_count,
            num_matchups: config.num_matchups,
            rates,
            ratings: RatingTable::default(),
        })
    }

    /// Current per-slot ratings.
    pub fn ratings(&self) -> &RatingTable {
        &self.ratings
    }
}

impl Strategy for EloGeneticAlgorithm {
    fn name(&self) -> &'static str {
        "EloGeneticAlgorithm"
    }

    fn initialize_population(
        &mut self,
        ctx: &mut GenerationCtx<'_>,
    ) -> Result<Vec<Team>, SearchError> {
        let sampler = ctx.sampler();
        (0..self.population_size)
            .map(|_| Ok(sampler.sample(ctx.rng)?))
            .collect()
    }

    fn evaluate(
        &mut self,
        ctx: &mut GenerationCtx<'_>,
        population: &[Team],
    ) -> Result<Vec<Evaluation>, SearchError> {
        evaluate_with_elo(ctx, population, &mut self.ratings, self.num_matchups)
    }

    fn produce_next_generation(
        &mut self,
        ctx: &mut GenerationCtx<'_>,
        ranked: &[Evaluation],
    ) -> Result<Vec<Team>, SearchError> {
        let survivors = &ranked[..self.survivors_count];
        let sampler = ctx.sampler();

        let mut next: Vec<Team> = survivors.iter().map(|e| e.team.clone()).collect();
        for i in 0..self.population_size - self.survivors_count {
            let parent = &survivors[i % self.survivors_count];
            next.push(sampler.mutate(ctx.rng, &parent.team, &self.rates)?);
        }

        self.ratings = self
            .ratings
            .carry_forward(survivors.iter().map(|e| e.slot), self.population_size);
        Ok(next)
    }
}

/// Baseline search: survivors are kept, the rest of the population is
/// refilled with brand-new independently sampled teams.
#[derive(Debug)]
pub struct EloRandomSearch {
    population_size: usize,
    survivors_count: usize,
    num_matchups: u32,
    ratings: RatingTable,
}

impl EloRandomSearch {
    pub fn new(config: &SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            population_size: config.population_size,
            survivors_count: config.survivors_count,
            num_matchups: config.num_matchups,
            ratings: RatingTable::default(),
        })
    }

    /// Current per-slot ratings.
    pub fn ratings(&self) -> &RatingTable {
        &self.ratings
    }
}

impl Strategy for EloRandomSearch {
    fn name(&self) -> &'static str {
        "EloRandomSearch"
    }

    fn initialize_population(
        &mut self,
        ctx: &mut GenerationCtx<'_>,
    ) -> Result<Vec<Team>, SearchError> {
        let sampler = ctx.sampler();
        (0..self.population_size)
            .map(|_| Ok(sampler.sample(ctx.rng)?))
            .collect()
    }

    fn evaluate(
        &mut self,
        ctx: &mut GenerationCtx<'_>,
        population: &[Team],
    ) -> Result<Vec<Evaluation>, SearchError> {
        evaluate_with_elo(ctx, population, &mut self.ratings, self.num_matchups)
    }

    fn produce_next_generation(
        &mut self,
        ctx: &mut GenerationCtx<'_>,
        ranked: &[Evaluation],
    ) -> Result<Vec<Team>, SearchError> {
        let survivors = &ranked[..self.survivors_count];
        let sampler = ctx.sampler();

        let mut next: Vec<Team> = survivors.iter().map(|e| e.team.clone()).collect();
        for _ in 0..self.population_size - self.survivors_count {
            next.push(sampler.sample(ctx.rng)?);
        }

        self.ratings = self
            .ratings
            .carry_forward(survivors.iter().map(|e| e.slot), self.population_size);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{MatchOutcome, OracleError};
    use crate::schema::{CandidatePool, LogTarget};
    use crate::search::rating::BASE_RATING;
    use crate::search::sampler::TeamSampler;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeMap;

    fn test_pool() -> CandidatePool {
        let mut learnsets = BTreeMap::new();
        for pid in 1..=15u32 {
            learnsets.insert(pid, (0..8).map(|m| pid * 100 + m).collect());
        }
        CandidatePool::from_learnsets(learnsets)
    }

    fn test_config() -> SearchConfig {
        SearchConfig {
            population_size: 6,
            survivors_count: 2,
            num_matchups: 20,
            generations: 3,
            battle_format: "gen1ou".to_string(),
            random_seed: Some(0),
            log_target: LogTarget::Disabled,
        }
    }

    fn run_one_generation<S: Strategy>(strategy: &mut S) -> (Vec<Evaluation>, Vec<Team>) {
        let pool = test_pool();
        let mut rng = StdRng::seed_from_u64(0);
        let mut first_wins =
            |_: &Team, _: &Team, _: &str| -> Result<MatchOutcome, OracleError> {
                Ok(MatchOutcome::TeamA)
            };
        let mut battles = 0u64;
        let mut ctx = GenerationCtx {
            pool: &pool,
            oracle: &mut first_wins,
            rng: &mut rng,
            format: "gen1ou",
            battles_used: &mut battles,
        };

        let population = strategy.initialize_population(&mut ctx).unwrap();
        let mut ranked = strategy.evaluate(&mut ctx, &population).unwrap();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.slot.cmp(&b.slot)));
        let next = strategy.produce_next_generation(&mut ctx, &ranked).unwrap();
        (ranked, next)
    }

    #[test]
    fn test_ga_survivors_lead_next_generation() {
        let mut ga = EloGeneticAlgorithm::new(
            &test_config(),
            MutationRates {
                pokemon: 0.5,
                moves: 0.25,
            },
        )
        .unwrap();

        let (ranked, next) = run_one_generation(&mut ga);
        assert_eq!(next.len(), 6);
        assert_eq!(next[0], ranked[0].team);
        assert_eq!(next[1], ranked[1].team);
    }

    #[test]
    fn test_ga_zero_rates_clone_survivor_parents() {
        let mut config = test_config();
        config.population_size = 4;
        config.survivors_count = 1;
        let mut ga = EloGeneticAlgorithm::new(
            &config,
            MutationRates {
                pokemon: 0.0,
                moves: 0.0,
            },
        )
        .unwrap();

        let (ranked, next) = run_one_generation(&mut ga);
        // Every refill is byte-identical to its survivor parent.
        for member in &next {
            assert_eq!(member, &ranked[0].team);
        }
    }

    #[test]
    fn test_ga_ratings_carried_and_reset() {
        let mut ga = EloGeneticAlgorithm::new(&test_config(), MutationRates::default()).unwrap();

        let (ranked, _next) = run_one_generation(&mut ga);
        let ratings = ga.ratings();
        assert_eq!(ratings.len(), 6);
        assert_eq!(ratings.get(0), ranked[0].score);
        assert_eq!(ratings.get(1), ranked[1].score);
        for slot in 2..6 {
            assert_eq!(ratings.get(slot), BASE_RATING);
        }
    }

    #[test]
    fn test_rs_refills_are_freshly_sampled() {
        let mut rs = EloRandomSearch::new(&test_config()).unwrap();

        let (ranked, next) = run_one_generation(&mut rs);
        assert_eq!(next[0], ranked[0].team);
        assert_eq!(next[1], ranked[1].team);
        // Refills came from the sampler, not from survivors.
        for member in &next[2..] {
            assert!(ranked.iter().all(|e| &e.team != member));
        }
    }

    #[test]
    fn test_decay_applied_on_second_evaluation() {
        let pool = test_pool();
        let mut rng = StdRng::seed_from_u64(0);
        let mut first_wins =
            |_: &Team, _: &Team, _: &str| -> Result<MatchOutcome, OracleError> {
                Ok(MatchOutcome::TeamA)
            };
        let mut battles = 0u64;
        let mut ctx = GenerationCtx {
            pool: &pool,
            oracle: &mut first_wins,
            rng: &mut rng,
            format: "gen1ou",
            battles_used: &mut battles,
        };

        let sampler = TeamSampler::new(&pool);
        let population: Vec<Team> = (0..4).map(|_| sampler.sample(ctx.rng).unwrap()).collect();

        // First evaluation sizes the table and perturbs it.
        let mut ratings = RatingTable::default();
        evaluate_with_elo(&mut ctx, &population, &mut ratings, 10).unwrap();
        let before = ratings.clone();

        // Second evaluation with no matchups: pure inter-generation decay.
        evaluate_with_elo(&mut ctx, &population, &mut ratings, 0).unwrap();
        for (&r, &prev) in ratings.as_slice().iter().zip(before.as_slice()) {
            let decayed = (1.0 - RATING_DECAY) * prev + RATING_DECAY * BASE_RATING;
            assert!((r - decayed).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let result = EloGeneticAlgorithm::new(
            &test_config(),
            MutationRates {
                pokemon: 2.0,
                moves: 0.0,
            },
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidMutationRate(_))
        ));
    }
}
