//! End-to-end packing behaviour.

use std::f64::consts::PI;

use hypack_core::{distance, norm, Point, RngKey};
use hypack_packing::{
    pack_multistart, pack_spheres_with_observer, repulsion_gradient, HistoryRecorder,
    LogReporter, PackingConfig, PackingOptimizer,
};
use ndarray::array;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn two_point_config() -> PackingConfig {
    PackingConfig::new(2, 2)
        .with_learning_rate(0.1)
        .with_max_angle(PI / 20.0)
        .with_momentum(0.9)
        .with_rounds(100)
}

fn two_points() -> Vec<Point> {
    vec![array![1.0, 0.0], array![0.1f64.cos(), 0.1f64.sin()]]
}

/// Track the pair distance of a two-point optimizer over every round.
fn distance_trace(optimizer: &mut PackingOptimizer, rounds: usize) -> Vec<f64> {
    let mut trace = vec![distance(&optimizer.points()[0], &optimizer.points()[1])];
    for _ in 0..rounds {
        optimizer.step_round().unwrap();
        trace.push(distance(&optimizer.points()[0], &optimizer.points()[1]));
    }
    trace
}

#[test]
fn test_pinned_pair_separates() {
    let config = two_point_config();
    let loss = config.loss();
    let mut optimizer =
        PackingOptimizer::from_points(config, loss, two_points(), RngKey::new(42)).unwrap();
    optimizer.pin(0).unwrap();

    let trace = distance_trace(&mut optimizer, 100);
    let initial = trace[0];
    let last = *trace.last().unwrap();

    println!("initial {:.6}, final {:.6}", initial, last);
    assert!(last > initial);
    assert!(last >= 1.0 - 1e-6, "Pair should be separated, got {}", last);
    for (round, d) in trace.iter().enumerate().skip(40) {
        assert!(*d >= 1.0 - 1e-9, "Round {}: distance {} dropped below 1", round, d);
    }

    assert_eq!(optimizer.points()[0], array![1.0, 0.0]);
    for p in optimizer.points() {
        assert!((norm(p) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_free_pair_separates() {
    let config = two_point_config();
    let loss = config.loss();
    let mut optimizer =
        PackingOptimizer::from_points(config, loss, two_points(), RngKey::new(7)).unwrap();

    let trace = distance_trace(&mut optimizer, 100);
    let last = *trace.last().unwrap();
    assert!(last > trace[0]);
    assert!(last >= 1.0 - 1e-6);
    for d in &trace[40..] {
        assert!(*d >= 1.0 - 1e-9);
    }
}

#[test]
fn test_single_small_step_increases_separation() {
    init_logging();
    for seed in 0..20u64 {
        let config = PackingConfig::new(5, 2).with_learning_rate(0.01);
        let loss = config.loss();
        let a = array![1.0, 0.0, 0.0, 0.0, 0.0];
        let b = array![0.3f64.cos(), 0.3f64.sin(), 0.0, 0.0, 0.0];
        let before = distance(&a, &b);

        let mut optimizer =
            PackingOptimizer::from_points(config, loss, vec![a, b], RngKey::new(seed)).unwrap();
        optimizer.step_round().unwrap();
        let after = distance(&optimizer.points()[0], &optimizer.points()[1]);
        assert!(after > before, "seed {}: {} -> {}", seed, before, after);
    }
}

#[test]
fn test_round_uses_pre_round_positions() {
    let config = PackingConfig::new(3, 3).with_max_angle(PI / 9.0);
    let loss = config.loss();
    let key = RngKey::new(11);
    let start = vec![
        array![1.0, 0.0, 0.0],
        array![0.9, 0.3, 0.0],
        array![0.9, 0.0, 0.3],
    ];

    let mut optimizer = PackingOptimizer::from_points(config.clone(), loss, start, key).unwrap();
    let before: Vec<Point> = optimizer.points().to_vec();
    optimizer.step_round().unwrap();

    // Replay the round by hand: every gradient against the old set, then steps
    // drawn from the same generator in point order.
    let stepper = config.stepper();
    let mut rng = key.to_rng();
    for (i, x) in before.iter().enumerate() {
        let others = before
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, p)| p);
        let grad = repulsion_gradient(x, others, config.min_distance);
        let expected = stepper.step(x, &grad, &mut rng).unwrap();
        for (a, b) in optimizer.points()[i].iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-14, "point {} differs: {} vs {}", i, a, b);
        }
    }
}

#[test]
fn test_same_key_same_trajectory() {
    let config = PackingConfig::new(4, 10).with_rounds(60);

    let mut a = PackingOptimizer::new(config.clone(), RngKey::new(5)).unwrap();
    let mut b = PackingOptimizer::new(config.clone(), RngKey::new(5)).unwrap();
    let mut c = PackingOptimizer::new(config.with_parallel(true), RngKey::new(5)).unwrap();
    let ra = a.run().unwrap();
    let rb = b.run().unwrap();
    let rc = c.run().unwrap();

    assert_eq!(a.points(), b.points());
    assert_eq!(a.points(), c.points(), "Parallel gradients must match sequential");
    assert_eq!(ra, rb);
    assert_eq!(ra, rc);
}

#[test]
fn test_points_stay_on_sphere() {
    let config = PackingConfig::new(6, 30)
        .with_rounds(200)
        .with_max_angle(PI / 9.0);
    let mut optimizer = PackingOptimizer::new(config, RngKey::new(3)).unwrap();
    optimizer.run().unwrap();
    for p in optimizer.points() {
        assert!((norm(p) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_report_schedule() {
    let config = PackingConfig::new(3, 5)
        .with_rounds(25)
        .with_report_interval(10);
    let mut history = HistoryRecorder::new();
    pack_spheres_with_observer(&config, RngKey::new(0), &mut history).unwrap();

    let rounds: Vec<usize> = history.reports().iter().map(|r| r.round).collect();
    assert_eq!(rounds, vec![0, 10, 20, 25]);

    let config = config.with_report_interval(0);
    let mut history = HistoryRecorder::new();
    pack_spheres_with_observer(&config, RngKey::new(0), &mut history).unwrap();
    let rounds: Vec<usize> = history.reports().iter().map(|r| r.round).collect();
    assert_eq!(rounds, vec![0, 25]);
}

#[test]
fn test_log_reporter_alongside_history() {
    init_logging();
    let config = PackingConfig::new(3, 6)
        .with_rounds(30)
        .with_report_interval(10);

    let mut history = HistoryRecorder::new();
    let mut observer = (LogReporter, &mut history);
    let logged = pack_spheres_with_observer(&config, RngKey::new(4), &mut observer).unwrap();

    let rounds: Vec<usize> = history.reports().iter().map(|r| r.round).collect();
    assert_eq!(rounds, vec![0, 10, 20, 30]);

    // Observers only watch; the trajectory is the same without them.
    let mut quiet = PackingOptimizer::new(config, RngKey::new(4)).unwrap();
    quiet.run().unwrap();
    assert_eq!(logged, quiet.into_points());
}

/// 22 points on S^3 with unit separation. Individual starts can jam, so run
/// several and require one that separates and stays separated.
#[test]
fn test_22_points_in_4d_separate() {
    init_logging();
    let config = PackingConfig::new(4, 22)
        .with_learning_rate(0.1)
        .with_max_angle(PI / 9.0)
        .with_momentum(0.9)
        .with_rounds(4000)
        .with_report_interval(1);

    let outcome = pack_multistart(&config, RngKey::new(2024), 40).unwrap();
    println!(
        "best start {} of {}: {}",
        outcome.best_start,
        outcome.starts_run,
        outcome.report.summary()
    );

    assert_eq!(outcome.report.overlaps, 0);
    assert!(outcome.report.min_distance >= 1.0 - 1e-10);
    assert_eq!(outcome.points.len(), 22);

    let first = outcome
        .history
        .iter()
        .position(|r| r.overlaps == 0)
        .unwrap();
    assert!(outcome.history[first..].iter().all(|r| r.overlaps == 0));
}
