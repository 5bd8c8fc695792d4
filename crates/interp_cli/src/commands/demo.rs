//! Demo command: interpolates a synthetic batch of phase-folded light curves.
//!
//! The batch is evaluated twice, once inline on a single thread and once with
//! the configured interpolator, and the two results are compared bit for bit.

use std::f64::consts::TAU;
use std::time::Instant;

use interp_core::interp::{InterpConfig, InterpOutput, Interpolator, ShardStrategy};
use interp_core::types::{Array, InterpError};
use tracing::info;

use crate::{CliError, Result};

/// Builds `rows` light curves of `knots` samples each, with `queries` times per row.
///
/// Each row has its own period and a box-shaped transit dip; the query times
/// span several periods so the periodic fold is exercised.
pub fn synthetic_batch(
    rows: usize,
    queries: usize,
    knots: usize,
) -> std::result::Result<[Array<f64>; 4], InterpError> {
    let mut t = Vec::with_capacity(rows * queries);
    let mut p = Vec::with_capacity(rows);
    let mut x = Vec::with_capacity(rows * knots);
    let mut y = Vec::with_capacity(rows * knots);

    for k in 0..rows {
        let period = 0.5 + 0.1 * (k % 17) as f64;
        p.push(period);
        for j in 0..knots {
            let phase = period * j as f64 / knots as f64;
            let in_transit = (phase / period - 0.5).abs() < 0.05;
            let depth = if in_transit { 0.01 } else { 0.0 };
            x.push(phase);
            y.push(1.0 - depth + 0.001 * (TAU * phase / period).sin());
        }
        for i in 0..queries {
            t.push(-3.0 * period + 7.0 * period * i as f64 / queries.max(1) as f64);
        }
    }

    Ok([
        Array::new(vec![rows, queries], t)?,
        Array::new(vec![rows], p)?,
        Array::new(vec![rows, knots], x)?,
        Array::new(vec![rows, knots], y)?,
    ])
}

/// Runs the demonstration.
pub fn run(interpolator: &Interpolator, rows: usize, queries: usize, knots: usize) -> Result<()> {
    if knots == 0 {
        return Err(CliError::InvalidArgument(
            "--knots must be at least 1".to_string(),
        ));
    }

    info!(
        "Interpolating {} rows x {} queries over {} knots",
        rows, queries, knots
    );
    let [t, p, x, y] = synthetic_batch(rows, queries, knots)?;

    let baseline = Interpolator::new(
        InterpConfig::builder()
            .threads(1)
            .strategy(ShardStrategy::Sequential)
            .build()
            .map_err(InterpError::from)?,
    )?;

    let started = Instant::now();
    let reference = baseline.interp(t.view(), p.view(), x.view(), y.view())?;
    let sequential = started.elapsed();

    let started = Instant::now();
    let result = interpolator.interp(t.view(), p.view(), x.view(), y.view())?;
    let sharded = started.elapsed();

    let plan = interpolator.sharder().plan(queries, knots);
    info!(
        "Sequential: {:.3} ms | Configured ({} workers, {} shards/row): {:.3} ms",
        sequential.as_secs_f64() * 1e3,
        interpolator.workers(),
        plan.num_shards,
        sharded.as_secs_f64() * 1e3
    );

    verify(&reference, &result)?;
    info!("Outputs are bit-identical across sharding");
    Ok(())
}

fn verify(reference: &InterpOutput<f64>, result: &InterpOutput<f64>) -> Result<()> {
    let same_bits = |lhs: &Array<f64>, rhs: &Array<f64>| {
        lhs.shape() == rhs.shape()
            && lhs
                .data()
                .iter()
                .zip(rhs.data())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    };

    if !same_bits(&reference.v, &result.v) {
        return Err(CliError::Verification("values differ".to_string()));
    }
    if !same_bits(&reference.a, &result.a) {
        return Err(CliError::Verification("fractions differ".to_string()));
    }
    if reference.inds != result.inds {
        return Err(CliError::Verification("indices differ".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_batch_shapes() {
        let [t, p, x, y] = synthetic_batch(3, 10, 8).unwrap();
        assert_eq!(t.shape(), &[3, 10]);
        assert_eq!(p.shape(), &[3]);
        assert_eq!(x.shape(), &[3, 8]);
        assert_eq!(y.shape(), &[3, 8]);
        assert!(x.view().row(1, 8).windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_demo_runs_with_parallel_config() {
        let interpolator = Interpolator::new(
            InterpConfig::builder()
                .threads(2)
                .min_cost_per_shard(100)
                .build()
                .unwrap(),
        )
        .unwrap();
        assert!(run(&interpolator, 4, 500, 32).is_ok());
    }

    #[test]
    fn test_demo_rejects_zero_knots() {
        let err = run(&Interpolator::default(), 1, 1, 0).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[test]
    fn test_verify_detects_mismatch() {
        let [t, p, x, y] = synthetic_batch(1, 5, 4).unwrap();
        let out = Interpolator::default()
            .interp(t.view(), p.view(), x.view(), y.view())
            .unwrap();
        let mut other = out.clone();
        other.inds = Array::new(vec![1, 5], vec![0; 5]).unwrap();
        assert!(verify(&out, &out).is_ok());
        assert!(matches!(
            verify(&out, &other),
            Err(CliError::Verification(_))
        ));
    }
}
