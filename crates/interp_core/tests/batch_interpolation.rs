//! Integration tests for batched interpolation.
//!
//! Covers multi-dimensional batches, element types and sharding invariance:
//! a call must produce bit-identical outputs however its rows are split.

use approx::assert_relative_eq;
use interp_core::interp::{
    InterpConfig, InterpOutput, Interpolator, KnotCheck, ShardStrategy,
};
use interp_core::types::{Array, InterpError, ShapeError};
use proptest::prelude::*;

/// Synthetic light curve batch: `rows` rows of `n` queries over `m` knots.
///
/// Odd rows are periodic, even rows are not; queries overshoot the knot range
/// on both sides so every branch is exercised.
fn light_curve_batch(rows: usize, n: usize, m: usize) -> [Array<f64>; 4] {
    let mut t = Vec::with_capacity(rows * n);
    let mut p = Vec::with_capacity(rows);
    let mut x = Vec::with_capacity(rows * m);
    let mut y = Vec::with_capacity(rows * m);

    for k in 0..rows {
        let period = 1.0 + 0.25 * k as f64;
        p.push(if k % 2 == 1 { period } else { 0.0 });
        for j in 0..m {
            let phase = period * j as f64 / (m - 1) as f64;
            x.push(phase);
            y.push((std::f64::consts::TAU * phase / period).sin() + 0.1 * k as f64);
        }
        for i in 0..n {
            t.push(-1.5 * period + 4.0 * period * i as f64 / n as f64);
        }
    }

    [
        Array::new(vec![rows, n], t).unwrap(),
        Array::new(vec![rows], p).unwrap(),
        Array::new(vec![rows, m], x).unwrap(),
        Array::new(vec![rows, m], y).unwrap(),
    ]
}

fn run(config: InterpConfig, [t, p, x, y]: &[Array<f64>; 4]) -> InterpOutput<f64> {
    Interpolator::new(config)
        .unwrap()
        .interp(t.view(), p.view(), x.view(), y.view())
        .unwrap()
}

fn assert_bit_identical(lhs: &InterpOutput<f64>, rhs: &InterpOutput<f64>) {
    let bits = |a: &Array<f64>| a.data().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&lhs.v), bits(&rhs.v));
    assert_eq!(bits(&lhs.a), bits(&rhs.a));
    assert_eq!(lhs.inds, rhs.inds);
}

#[test]
fn test_sharding_invariance_across_strategies() {
    let batch = light_curve_batch(5, 4_000, 64);
    let reference = run(
        InterpConfig::builder()
            .threads(1)
            .strategy(ShardStrategy::Sequential)
            .build()
            .unwrap(),
        &batch,
    );

    let strategies = [
        ShardStrategy::CostModel,
        ShardStrategy::FixedChunks { chunk_size: 1 },
        ShardStrategy::FixedChunks { chunk_size: 333 },
        ShardStrategy::Sequential,
    ];
    for strategy in strategies {
        for threads in [1, 2, 4] {
            let out = run(
                InterpConfig::builder()
                    .threads(threads)
                    .strategy(strategy)
                    .build()
                    .unwrap(),
                &batch,
            );
            assert_bit_identical(&reference, &out);
        }
    }
}

#[test]
fn test_cost_model_actually_splits_large_rows() {
    let interpolator =
        Interpolator::new(InterpConfig::builder().threads(4).build().unwrap()).unwrap();
    let plan = interpolator.sharder().plan(10_000, 64);
    assert_eq!(plan.num_shards, 4);
}

#[test]
fn test_multi_dimensional_batch_rows_are_independent() {
    // shape [2, 3, N]: row k uses knots y = k * x on [0, 1]
    let n = 5;
    let queries = [-0.5, 0.0, 0.25, 0.75, 2.0];
    let t: Vec<f64> = (0..6).flat_map(|_| queries).collect();
    let x: Vec<f64> = (0..6).flat_map(|_| [0.0, 0.5, 1.0]).collect();
    let y: Vec<f64> = (0..6)
        .flat_map(|k| [0.0, 0.5 * k as f64, k as f64])
        .collect();

    let t = Array::new(vec![2, 3, n], t).unwrap();
    let p = Array::new(vec![2, 3], vec![0.0; 6]).unwrap();
    let x = Array::new(vec![2, 3, 3], x).unwrap();
    let y = Array::new(vec![2, 3, 3], y).unwrap();

    let out = Interpolator::default()
        .interp(t.view(), p.view(), x.view(), y.view())
        .unwrap();
    assert_eq!(out.v.shape(), &[2, 3, n]);

    for k in 0..6 {
        let row = out.v.view().row(k, n);
        let slope = k as f64;
        assert_eq!(row[0], 0.0);
        assert_eq!(row[1], 0.0);
        assert_relative_eq!(row[2], 0.25 * slope);
        assert_relative_eq!(row[3], 0.75 * slope);
        assert_eq!(row[4], slope);
        assert_eq!(out.inds.view().row(k, n), &[0, 0, 1, 2, 4]);
    }
}

#[test]
fn test_f32_batch() {
    let t = Array::new(vec![1, 3], vec![0.5_f32, 2.5, -0.5]).unwrap();
    let p = Array::new(vec![1], vec![2.0_f32]).unwrap();
    let x = Array::new(vec![1, 3], vec![0.0_f32, 1.0, 2.0]).unwrap();
    let y = Array::new(vec![1, 3], vec![0.0_f32, 1.0, 2.0]).unwrap();

    let out = Interpolator::default()
        .interp(t.view(), p.view(), x.view(), y.view())
        .unwrap();
    assert_relative_eq!(out.v.data()[0], 0.5_f32);
    assert_relative_eq!(out.v.data()[1], 0.5_f32);
    assert_relative_eq!(out.v.data()[2], 1.5_f32);
    assert_eq!(out.inds.data(), &[1, 1, 2]);
}

#[test]
fn test_clamped_fraction_defaults_to_zero() {
    let [t, p, x, y] = light_curve_batch(2, 200, 8);
    let out = Interpolator::default()
        .interp(t.view(), p.view(), x.view(), y.view())
        .unwrap();
    for (a, ind) in out.a.data().iter().zip(out.inds.data()) {
        if *ind == 0 || *ind == 9 {
            assert_eq!(*a, 0.0);
        } else {
            assert!((0.0..=1.0).contains(a));
        }
    }
}

#[test]
fn test_shape_errors_surface_through_interpolator() {
    let [t, p, x, y] = light_curve_batch(2, 10, 4);
    let wrong_y = Array::new(vec![2, 5], vec![0.0; 10]).unwrap();
    let err = Interpolator::default()
        .interp(t.view(), p.view(), x.view(), wrong_y.view())
        .unwrap_err();
    assert!(matches!(
        err,
        InterpError::InvalidShape(ShapeError::KnotValueShape { .. })
    ));

    let wrong_p = Array::new(vec![3], vec![0.0; 3]).unwrap();
    let err = Interpolator::default()
        .interp(t.view(), wrong_p.view(), x.view(), y.view())
        .unwrap_err();
    assert!(matches!(
        err,
        InterpError::InvalidShape(ShapeError::BatchDimension { axis: 0, .. })
    ));
}

#[test]
fn test_strict_mode_reports_duplicate_row() {
    let [t, p, x, y] = light_curve_batch(3, 10, 4);
    let mut x = x.into_vec();
    x[4 + 2] = x[4 + 1];
    let x = Array::new(vec![3, 4], x).unwrap();

    let strict = Interpolator::new(
        InterpConfig::builder()
            .knot_check(KnotCheck::Strict)
            .build()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(
        strict.interp(t.view(), p.view(), x.view(), y.view()),
        Err(InterpError::DuplicateKnots { row: 1, index: 2 })
    );

    // unchecked mode still evaluates the row
    assert!(Interpolator::default()
        .interp(t.view(), p.view(), x.view(), y.view())
        .is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_sharding_invariance_property(
        rows in 1_usize..4,
        n in 1_usize..3_000,
        m in 2_usize..40,
        chunk_size in 1_usize..500,
    ) {
        let batch = light_curve_batch(rows, n, m);
        let single = run(
            InterpConfig::builder().threads(1).strategy(ShardStrategy::Sequential).build().unwrap(),
            &batch,
        );
        let chunked = run(
            InterpConfig::builder()
                .threads(3)
                .strategy(ShardStrategy::FixedChunks { chunk_size })
                .build()
                .unwrap(),
            &batch,
        );
        let cost_model = run(
            InterpConfig::builder().threads(3).min_cost_per_shard(50).build().unwrap(),
            &batch,
        );
        assert_bit_identical(&single, &chunked);
        assert_bit_identical(&single, &cost_model);
    }
}
