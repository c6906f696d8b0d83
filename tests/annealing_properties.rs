//! Invariants of the partitioning annealer over random instances.

use proptest::prelude::*;
use u_numflow::random::create_rng;
use u_numpart::anneal::{spread, AnnealConfig, AnnealRunner, MovePool, StopReason};
use u_numpart::{Annealer, Instance, Partition};

/// `(group_count, weights)` with at least as many weights as groups.
fn instance_strategy() -> impl Strategy<Value = (usize, Vec<u64>)> {
    (1usize..6).prop_flat_map(|m| (Just(m), prop::collection::vec(0u64..1000, m..m + 20)))
}

fn pool_strategy() -> impl Strategy<Value = MovePool> {
    prop_oneof![Just(MovePool::SkipSeeds), Just(MovePool::All)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mass_and_energy_consistent_every_step(
        (m, weights) in instance_strategy(),
        pool in pool_strategy(),
        t0 in 1.0f64..5000.0,
        seed in any::<u64>(),
    ) {
        let total: u64 = weights.iter().sum();
        let instance = Instance::new(m, weights).unwrap();
        let config = AnnealConfig::default()
            .with_initial_temperature(t0)
            .with_move_pool(pool);
        let mut annealer = Annealer::with_config(instance, &config);
        annealer.initialize();
        let mut rng = create_rng(seed);

        for _ in 0..300 {
            annealer.step(&mut rng);
            prop_assert_eq!(annealer.group_sums().iter().sum::<u64>(), total);
            prop_assert_eq!(annealer.current_energy(), spread(annealer.group_sums()));
            prop_assert!(annealer.assignment().iter().all(|&g| g < m));
        }
    }

    #[test]
    fn best_energy_never_increases_and_bounds_current(
        (m, weights) in instance_strategy(),
        seed in any::<u64>(),
    ) {
        let mut annealer = Annealer::from_weights(m, weights);
        annealer.set_initial_temperature(200.0);
        annealer.initialize();
        let mut rng = create_rng(seed);
        let mut prev = annealer.best_energy();

        for _ in 0..300 {
            annealer.step(&mut rng);
            prop_assert!(annealer.best_energy() <= prev);
            prop_assert!(annealer.best_energy() <= annealer.current_energy());
            prev = annealer.best_energy();
        }

        let best = Partition::from_assignment(
            annealer.items(),
            annealer.best_assignment(),
            annealer.group_count(),
        );
        prop_assert_eq!(best.energy(), annealer.best_energy());
    }

    #[test]
    fn done_iff_zero_energy(
        (m, weights) in instance_strategy(),
        seed in any::<u64>(),
    ) {
        let mut annealer = Annealer::from_weights(m, weights);
        annealer.initialize();
        let mut rng = create_rng(seed);
        prop_assert_eq!(annealer.done(), annealer.current_energy() == 0);
        for _ in 0..200 {
            annealer.step(&mut rng);
            prop_assert_eq!(annealer.done(), annealer.current_energy() == 0);
        }
    }

    #[test]
    fn temperature_strictly_decreasing(
        t0 in 1e-3f64..1e6,
        k in 1e-6f64..1e-1,
        step in 0usize..1_000_000,
    ) {
        let config = AnnealConfig::default()
            .with_initial_temperature(t0)
            .with_decay(k);
        prop_assert!(config.temperature_at(step + 1) < config.temperature_at(step));
        prop_assert!(config.temperature_at(step) > 0.0);
    }

    #[test]
    fn items_sorted_descending(
        (m, weights) in instance_strategy(),
    ) {
        let instance = Instance::new(m, weights.clone()).unwrap();
        prop_assert!(instance.items().windows(2).all(|w| w[0] >= w[1]));
        let mut expected = weights;
        expected.sort_unstable();
        let mut got = instance.items().to_vec();
        got.sort_unstable();
        prop_assert_eq!(got, expected);
    }
}

#[test]
fn balanced_seed_is_done_after_initialize() {
    let mut annealer = Annealer::new(Instance::parse("4 2 1 2 3 4").unwrap());
    annealer.initialize();
    assert!(annealer.done());
    assert_eq!(annealer.current_step(), 0);
    assert_eq!(annealer.best_assignment(), &[0, 1, 1, 0]);
}

#[test]
fn unbalanceable_instance_reports_best_eight() {
    let instance = Instance::parse("3 2 10 1 1").unwrap();
    let config = AnnealConfig::default()
        .with_max_steps(10_000)
        .with_move_pool(MovePool::All)
        .with_seed(2024);
    let result = AnnealRunner::run(instance, &config);

    assert_eq!(result.stop_reason, StopReason::StepLimit);
    assert_eq!(result.best_energy, 8);
    let partition = Partition::from_result(&result);
    let mut sums = partition.sums();
    sums.sort_unstable();
    assert_eq!(sums, vec![2, 10]);
}

#[test]
fn report_lists_every_group() {
    let instance = Instance::parse("6 3 5 5 4 3 2 2").unwrap();
    let config = AnnealConfig::default()
        .with_initial_temperature(5.0)
        .with_max_steps(50_000)
        .with_seed(3);
    let result = AnnealRunner::run(instance, &config);
    let text = Partition::from_result(&result).to_string();

    assert!(text.starts_with(&format!("Energy: {}\n", result.best_energy)));
    for g in 0..3 {
        assert!(text.contains(&format!("Group {g}:")));
    }
}
