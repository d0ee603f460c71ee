//! End-to-end properties of the generational optimizer.

use std::collections::BTreeMap;

use teamsmith::oracle::{MatchOutcome, OracleError};
use teamsmith::schema::{CandidatePool, LogTarget, SearchConfig, load_runs};
use teamsmith::search::{EloGeneticAlgorithm, EloRandomSearch, Optimizer, SearchError};
use teamsmith::{MutationRates, Team};

fn test_pool() -> CandidatePool {
    let mut learnsets = BTreeMap::new();
    for pid in 1..=20u32 {
        learnsets.insert(pid, (0..8).map(|m| pid * 100 + m).collect());
    }
    CandidatePool::from_learnsets(learnsets)
}

fn test_config(log_target: LogTarget) -> SearchConfig {
    SearchConfig {
        population_size: 5,
        survivors_count: 2,
        num_matchups: 12,
        generations: 4,
        battle_format: "gen1ou".to_string(),
        random_seed: Some(0),
        log_target,
    }
}

/// Deterministic stand-in oracle: the team with the lower Pokedex id sum
/// wins, equal sums are indeterminate.
fn lower_ids_win(a: &Team, b: &Team, _: &str) -> Result<MatchOutcome, OracleError> {
    let sum_a: u32 = a.pokemon().iter().sum();
    let sum_b: u32 = b.pokemon().iter().sum();
    Ok(match sum_a.cmp(&sum_b) {
        std::cmp::Ordering::Less => MatchOutcome::TeamA,
        std::cmp::Ordering::Greater => MatchOutcome::TeamB,
        std::cmp::Ordering::Equal => MatchOutcome::Indeterminate,
    })
}

#[test]
fn every_generation_logs_one_entry_per_member() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(LogTarget::DefaultLocation);
    let strategy = EloRandomSearch::new(&config).unwrap();
    let mut optimizer = Optimizer::new(config, test_pool(), lower_ids_win, strategy)
        .unwrap()
        .with_log_base_dir(dir.path());

    optimizer.optimize().unwrap();

    let entries = optimizer.log_entries();
    assert_eq!(entries.len(), 4 * 5);
    let mut per_gen: BTreeMap<u32, usize> = BTreeMap::new();
    for e in entries {
        *per_gen.entry(e.generation).or_default() += 1;
    }
    assert_eq!(per_gen.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert!(per_gen.values().all(|&count| count == 5));
}

#[test]
fn battles_used_is_monotone_and_steps_by_matchup_budget() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(LogTarget::DefaultLocation);
    let strategy = EloGeneticAlgorithm::new(&config, MutationRates::default()).unwrap();
    let mut optimizer = Optimizer::new(config, test_pool(), lower_ids_win, strategy)
        .unwrap()
        .with_log_base_dir(dir.path());

    let outcome = optimizer.optimize().unwrap();
    assert_eq!(outcome.battles_used, 4 * 12);

    let entries = optimizer.log_entries();
    assert!(
        entries
            .windows(2)
            .all(|w| w[0].total_battles_used <= w[1].total_battles_used)
    );
    for e in entries {
        assert_eq!(e.total_battles_used, u64::from(e.generation) * 12);
    }
}

#[test]
fn global_best_dominates_every_generation_best() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(LogTarget::DefaultLocation);
    let strategy = EloRandomSearch::new(&config).unwrap();
    let mut optimizer = Optimizer::new(config, test_pool(), lower_ids_win, strategy)
        .unwrap()
        .with_log_base_dir(dir.path());

    let outcome = optimizer.optimize().unwrap();

    let runs = load_runs(dir.path()).unwrap();
    assert_eq!(runs.len(), 1);
    for best in runs[0].best_per_generation() {
        assert!(outcome.best_score >= best.score);
    }
    assert_eq!(runs[0].global_best().unwrap().score, outcome.best_score);
}

#[test]
fn persisted_run_reconstructs_in_memory_views() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(LogTarget::Named {
        label: "roundtrip".to_string(),
    });
    let strategy = EloGeneticAlgorithm::new(&config, MutationRates::default()).unwrap();
    let mut optimizer = Optimizer::new(config, test_pool(), lower_ids_win, strategy)
        .unwrap()
        .with_log_base_dir(dir.path());

    let outcome = optimizer.optimize().unwrap();
    assert!(outcome.log_error.is_none());
    let log_path = outcome.log_path.unwrap();
    assert!(log_path.to_string_lossy().contains("roundtrip"));

    let runs = load_runs(dir.path()).unwrap();
    assert_eq!(runs.len(), 1);
    let run = &runs[0];

    assert_eq!(run.run_id, outcome.run_id);
    assert_eq!(run.method, "EloGeneticAlgorithm");
    assert_eq!(run.run_seed, Some(0));
    assert_eq!(run.format, "gen1ou");
    assert_eq!(run.entries(), optimizer.log_entries());

    // Best-so-far curve ends at the global best and never decreases.
    let curve = run.best_so_far();
    assert!(curve.windows(2).all(|w| w[0].score <= w[1].score));
    assert_eq!(curve.last().unwrap().score, outcome.best_score);

    // The winning team round-trips through its compact encoding.
    let best_entry = run.global_best().unwrap();
    assert_eq!(best_entry.parse_team().unwrap(), outcome.best_team);
}

#[test]
fn ga_with_zero_mutation_reproduces_parents() {
    let mut config = test_config(LogTarget::Disabled);
    config.population_size = 4;
    config.survivors_count = 1;
    config.num_matchups = 10;
    let rates = MutationRates {
        pokemon: 0.0,
        moves: 0.0,
    };
    let strategy = EloGeneticAlgorithm::new(&config, rates).unwrap();
    let mut optimizer = Optimizer::new(config, test_pool(), lower_ids_win, strategy).unwrap();

    let outcome = optimizer.optimize().unwrap();

    // After the first selection every member clones the single survivor, so
    // later generations evaluate one unique team.
    assert_eq!(outcome.battles_used, 4 * 10);
    assert!(outcome.best_score > 1000.0);
}

#[test]
fn rs_runs_are_reproducible_per_seed() {
    let run = |seed: u64| {
        let mut config = test_config(LogTarget::Disabled);
        config.random_seed = Some(seed);
        let strategy = EloRandomSearch::new(&config).unwrap();
        let mut optimizer =
            Optimizer::new(config, test_pool(), lower_ids_win, strategy).unwrap();
        optimizer.optimize().unwrap()
    };

    let a = run(5);
    let b = run(5);
    let c = run(6);
    assert_eq!(a.best_team, b.best_team);
    assert_eq!(a.best_score, b.best_score);
    assert!(c.best_team != a.best_team || c.best_score != a.best_score);
}

#[test]
fn oracle_failure_mid_run_flushes_partial_log() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(LogTarget::DefaultLocation);
    let num_matchups = u64::from(config.num_matchups);

    // Healthy through generation 1, unavailable afterwards.
    let mut calls = 0u64;
    let oracle = move |a: &Team, b: &Team, format: &str| {
        calls += 1;
        if calls > num_matchups {
            Err(OracleError::Unavailable("connection refused".to_string()))
        } else {
            lower_ids_win(a, b, format)
        }
    };

    let strategy = EloRandomSearch::new(&config).unwrap();
    let mut optimizer = Optimizer::new(config, test_pool(), oracle, strategy)
        .unwrap()
        .with_log_base_dir(dir.path());

    let err = optimizer.optimize().unwrap_err();
    assert!(matches!(err, SearchError::Oracle(_)));

    // Generation 1 entries survived the abort.
    let runs = load_runs(dir.path()).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].entries().len(), 5);
    assert!(runs[0].entries().iter().all(|e| e.generation == 1));
}
