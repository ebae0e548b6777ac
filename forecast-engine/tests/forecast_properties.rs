use std::hash::Hasher;

use forecast_engine::{
    AdventurerSnapshot, CharacterState, Decision, Entropy, Forecast, ForecastConfig,
    ForecastEngine, ForecastRequest, Path, Stats, Step, StatUpgrades, calculate_level,
    generate_encounter, max_health, rank_paths,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use twox_hash::XxHash64;

const SWEEP_CASES: usize = 60;

fn random_request(rng: &mut ChaCha20Rng) -> ForecastRequest {
    let vitality = rng.gen_range(0..6i64);
    let cap = i64::from(max_health(u16::try_from(vitality).expect("small vitality")));
    ForecastRequest {
        adventurer: AdventurerSnapshot {
            id: rng.gen_range(1..10_000),
            xp: rng.gen_range(0..3_000),
            health: rng.gen_range(1..=cap),
            gold: rng.gen_range(0..200),
            strength: rng.gen_range(0..8),
            dexterity: rng.gen_range(0..8),
            vitality,
            intelligence: rng.gen_range(0..8),
            wisdom: rng.gen_range(0..8),
            charisma: rng.gen_range(0..8),
        },
        items: Vec::new(),
        purchases: Vec::new(),
        upgrades: StatUpgrades::default(),
        potions: rng.gen_range(0..3),
        entropy: Entropy::from(rng.gen_range(1..=u128::MAX)),
        has_beast: rng.gen_bool(0.25),
    }
}

fn random_engine(rng: &mut ChaCha20Rng) -> ForecastEngine {
    let config = ForecastConfig {
        horizon: rng.gen_range(1..=5),
        halt_on_level_up: rng.gen_bool(0.5),
    };
    ForecastEngine::new(config).expect("valid config")
}

fn digest(forecast: &Forecast) -> u64 {
    let bytes = serde_json::to_vec(forecast).expect("forecast serializes");
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    hasher.finish()
}

fn encounter_steps(path: &Path) -> usize {
    path.steps
        .iter()
        .filter(|step| step.encounter.is_some())
        .count()
}

#[test]
fn encounter_generation_is_deterministic() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xF0CA_5700);
    for _ in 0..500 {
        let entropy = Entropy::from(rng.gen_range(1..=u128::MAX));
        let xp = rng.gen_range(0..50_000u32);
        let has_beast = rng.gen_bool(0.3);
        let level = calculate_level(xp);
        assert_eq!(
            generate_encounter(xp, &entropy, has_beast, level),
            generate_encounter(xp, &entropy, has_beast, level)
        );
    }
}

#[test]
fn level_is_monotonic_over_random_pairs() {
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    for _ in 0..2_000 {
        let a = rng.gen_range(0..u32::MAX);
        let b = rng.gen_range(a..=u32::MAX);
        assert!(calculate_level(a) <= calculate_level(b));
    }
}

#[test]
fn forecasts_hold_invariants_across_random_inputs() {
    let mut rng = ChaCha20Rng::seed_from_u64(20_240_601);
    for case in 0..SWEEP_CASES {
        let request = random_request(&mut rng);
        let engine = random_engine(&mut rng);
        let horizon = engine.config().horizon;
        let forecast = engine.forecast(&request).expect("random request is valid");

        assert_eq!(forecast.encounters.len(), horizon, "case {case}");
        for pair in forecast.encounters.windows(2) {
            assert!(pair[1].xp > pair[0].xp, "case {case}: flat xp must grow");
        }

        assert!(!forecast.paths.is_empty(), "case {case}");
        for pair in forecast.paths.windows(2) {
            assert!(pair[0].final_health() >= pair[1].final_health(), "case {case}");
        }
        for path in &forecast.paths {
            assert_eq!(path.steps[0].decision, Decision::Start);
            assert!(encounter_steps(path) <= horizon, "case {case}: {}", path.label());
            for step in &path.steps {
                assert!(step.state.health <= step.state.max_health(), "case {case}");
            }
            for (index, step) in path.steps.iter().enumerate() {
                if step.state.is_dead() {
                    assert_eq!(index, path.steps.len() - 1, "case {case}: death must be a leaf");
                }
                if step.decision == Decision::LevelUp {
                    assert!(step.encounter.is_none());
                }
            }
        }
    }
}

#[test]
fn repeated_and_concurrent_forecasts_agree() {
    let mut rng = ChaCha20Rng::seed_from_u64(77);
    let requests: Vec<ForecastRequest> = (0..8).map(|_| random_request(&mut rng)).collect();
    let engine = ForecastEngine::new(ForecastConfig::default().with_horizon(4)).expect("valid config");

    let expected: Vec<u64> = requests
        .iter()
        .map(|request| digest(&engine.forecast(request).expect("forecast runs")))
        .collect();

    let concurrent: Vec<u64> = std::thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .map(|request| {
                scope.spawn(move || digest(&engine.forecast(request).expect("forecast runs")))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker finished"))
            .collect()
    });
    assert_eq!(expected, concurrent);
}

#[test]
fn ranking_is_a_stable_permutation() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    for _ in 0..50 {
        let count = rng.gen_range(0..40);
        let paths: Vec<Path> = (0..count)
            .map(|index| Path {
                steps: vec![Step {
                    encounter: None,
                    name_matches: None,
                    state: CharacterState {
                        id: index,
                        health: rng.gen_range(0..6),
                        stats: Stats::default(),
                        ..CharacterState::default()
                    },
                    decision: Decision::Start,
                }],
            })
            .collect();

        let ranked = rank_paths(paths.clone());
        assert_eq!(ranked.len(), paths.len());

        let mut ids: Vec<u64> = ranked
            .iter()
            .filter_map(|path| path.final_state().map(|state| state.id))
            .collect();
        for pair in ranked.windows(2) {
            let (a, b) = (pair[0].final_state(), pair[1].final_state());
            let (a, b) = (a.expect("step"), b.expect("step"));
            assert!(a.health >= b.health);
            if a.health == b.health {
                assert!(a.id < b.id, "equal-health paths must keep input order");
            }
        }
        ids.sort_unstable();
        assert_eq!(ids, (0..count).collect::<Vec<u64>>());
    }
}
