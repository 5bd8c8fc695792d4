//! Batched periodic piecewise-linear interpolation.
//!
//! ## Pipeline
//!
//! 1. [`validate_shapes`] checks `t`, `p`, `x`, `y` and derives a
//!    [`BatchLayout`]; nothing is written if it fails
//! 2. optional [`check_knots`] pass when [`KnotCheck::Strict`] is configured
//! 3. rows are evaluated one after another; within a row the [`Sharder`]
//!    splits the queries into contiguous blocks for the worker pool
//! 4. each query is wrapped into its period, clamped or located by binary
//!    search, and interpolated ([`evaluate_query`])
//!
//! ## Outputs
//!
//! - `v`: interpolated value (boundary value when clamped)
//! - `a`: fraction within the bracketing interval, left at zero when clamped
//! - `inds`: `0` below the first knot, `M + 1` above the last knot, otherwise
//!   the index of the right-hand knot
//!
//! ## Example
//!
//! ```
//! use interp_core::interp::interp;
//! use interp_core::types::Array;
//!
//! let t = Array::from_vec(vec![-1.0, 0.0, 0.5, 1.0, 2.5, 3.0, 10.0]);
//! let p = Array::scalar(0.0);
//! let x = Array::from_vec(vec![0.0, 1.0, 2.0, 3.0]);
//! let y = Array::from_vec(vec![0.0, 10.0, 20.0, 30.0]);
//!
//! let out = interp(t.view(), p.view(), x.view(), y.view()).unwrap();
//! assert_eq!(out.v.data(), &[0.0, 0.0, 5.0, 10.0, 25.0, 30.0, 30.0]);
//! assert_eq!(out.inds.data(), &[0, 0, 1, 2, 3, 5, 5]);
//! ```

mod config;
mod kernel;
mod knots;
mod shape;
mod sharder;

pub use config::{InterpConfig, InterpConfigBuilder};
pub use kernel::{evaluate_query, Evaluation, RowOutputs, UNDEFINED_INDEX};
pub use knots::{check_knots, KnotCheck};
pub use shape::{validate_shapes, BatchLayout};
pub use sharder::{
    plan_shards, ShardPlan, ShardStrategy, Sharder, DEFAULT_CHUNK_SIZE, DEFAULT_COST_PER_KNOT,
    DEFAULT_MIN_COST_PER_SHARD,
};

use kernel::{evaluate_chunk, RowKnots};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, debug_span};

use crate::types::{Array, ArrayView, ArrayViewMut, ConfigError, Element, InterpError, ShapeError};

/// The three outputs of an interpolation call, each shaped like `t`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpOutput<T> {
    /// Interpolated values.
    pub v: Array<T>,
    /// Interpolation fractions (zero for clamped queries).
    pub a: Array<T>,
    /// Knot indices used.
    pub inds: Array<i64>,
}

/// Caller-owned output buffers for [`Interpolator::interp_into`].
#[derive(Debug)]
pub struct OutputsMut<'a, T> {
    /// Interpolated values.
    pub v: ArrayViewMut<'a, T>,
    /// Interpolation fractions.
    pub a: ArrayViewMut<'a, T>,
    /// Knot indices used.
    pub inds: ArrayViewMut<'a, i64>,
}

/// Configured batched interpolator.
///
/// Holds the sharding policy and, when a thread count is configured, a
/// dedicated rayon pool reused across calls. Calls are otherwise stateless.
///
/// # Example
///
/// ```
/// use interp_core::interp::{InterpConfig, Interpolator};
/// use interp_core::types::Array;
///
/// let interpolator = Interpolator::new(InterpConfig::builder().threads(2).build().unwrap()).unwrap();
///
/// let t = Array::new(vec![2, 2], vec![2.5, -0.5, 0.25, 5.0]).unwrap();
/// let p = Array::new(vec![2], vec![2.0, 0.0]).unwrap();
/// let x = Array::new(vec![2, 3], vec![0.0, 1.0, 2.0, 0.0, 0.5, 1.0]).unwrap();
/// let y = Array::new(vec![2, 3], vec![0.0, 1.0, 2.0, 4.0, 2.0, 0.0]).unwrap();
///
/// let out = interpolator.interp(t.view(), p.view(), x.view(), y.view()).unwrap();
/// assert_eq!(out.v.data(), &[0.5, 1.5, 3.0, 0.0]);
/// assert_eq!(out.inds.data(), &[1, 2, 1, 4]);
/// ```
#[derive(Debug)]
pub struct Interpolator {
    config: InterpConfig,
    sharder: Sharder,
    pool: Option<ThreadPool>,
}

impl Default for Interpolator {
    fn default() -> Self {
        let config = InterpConfig::default();
        Self {
            sharder: Self::sharder_for(&config, rayon::current_num_threads()),
            config,
            pool: None,
        }
    }
}

impl Interpolator {
    /// Creates an interpolator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `InterpError::Config` if the configuration is invalid or the
    /// dedicated pool cannot be created.
    pub fn new(config: InterpConfig) -> Result<Self, InterpError> {
        config.validate()?;

        let pool = match config.threads() {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("interp-worker-{}", i))
                    .build()
                    .map_err(|e| ConfigError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };
        let workers = pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads);

        debug!(workers, strategy = ?config.strategy(), "created interpolator");

        Ok(Self {
            sharder: Self::sharder_for(&config, workers),
            config,
            pool,
        })
    }

    fn sharder_for(config: &InterpConfig, workers: usize) -> Sharder {
        Sharder::new(
            config.strategy(),
            config.cost_per_knot(),
            config.min_cost_per_shard(),
            workers,
        )
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &InterpConfig {
        &self.config
    }

    /// Returns the row sharder.
    #[inline]
    pub fn sharder(&self) -> &Sharder {
        &self.sharder
    }

    /// Number of workers available to a row.
    #[inline]
    pub fn workers(&self) -> usize {
        self.sharder.max_parallelism()
    }

    /// Interpolates every query, allocating zeroed outputs shaped like `t`.
    ///
    /// # Errors
    ///
    /// - `InterpError::InvalidShape` if the shapes are inconsistent
    /// - `InterpError::UnsortedKnots` / `DuplicateKnots` under strict checking
    pub fn interp<T: Element>(
        &self,
        t: ArrayView<'_, T>,
        p: ArrayView<'_, T>,
        x: ArrayView<'_, T>,
        y: ArrayView<'_, T>,
    ) -> Result<InterpOutput<T>, InterpError> {
        let layout = self.prepare(t, p, x, y)?;

        let mut v = Array::zeros(layout.output_shape());
        let mut a = Array::zeros(layout.output_shape());
        let mut inds = Array::zeros(layout.output_shape());
        self.fill(
            &layout,
            [t, p, x, y],
            RowOutputs {
                v: v.view_mut().into_data(),
                a: a.view_mut().into_data(),
                inds: inds.view_mut().into_data(),
            },
        );

        Ok(InterpOutput { v, a, inds })
    }

    /// Interpolates every query into caller-owned buffers.
    ///
    /// All shapes, including the outputs', are checked before anything is
    /// written. Fraction slots of clamped queries keep their prior contents.
    pub fn interp_into<T: Element>(
        &self,
        t: ArrayView<'_, T>,
        p: ArrayView<'_, T>,
        x: ArrayView<'_, T>,
        y: ArrayView<'_, T>,
        out: OutputsMut<'_, T>,
    ) -> Result<(), InterpError> {
        let layout = self.prepare(t, p, x, y)?;

        let expected = layout.output_shape();
        for (name, shape) in [
            ("v", out.v.shape()),
            ("a", out.a.shape()),
            ("inds", out.inds.shape()),
        ] {
            if shape != expected {
                return Err(ShapeError::OutputShape {
                    name,
                    expected: expected.to_vec(),
                    got: shape.to_vec(),
                }
                .into());
            }
        }

        self.fill(
            &layout,
            [t, p, x, y],
            RowOutputs {
                v: out.v.into_data(),
                a: out.a.into_data(),
                inds: out.inds.into_data(),
            },
        );
        Ok(())
    }

    /// Interpolates a single row of queries against one knot table.
    ///
    /// Uses the configured sharder and pool, exactly as a batch row would.
    pub fn evaluate_row<T: Element>(
        &self,
        ts: &[T],
        period: T,
        xs: &[T],
        ys: &[T],
        out: RowOutputs<'_, T>,
    ) -> Result<(), InterpError> {
        if xs.len() != ys.len() {
            return Err(ShapeError::KnotValueShape {
                x: vec![xs.len()],
                y: vec![ys.len()],
            }
            .into());
        }
        if xs.is_empty() && !ts.is_empty() {
            return Err(ShapeError::EmptyKnots.into());
        }
        for (name, len) in [("v", out.v.len()), ("a", out.a.len()), ("inds", out.inds.len())] {
            if len != ts.len() {
                return Err(ShapeError::OutputShape {
                    name,
                    expected: vec![ts.len()],
                    got: vec![len],
                }
                .into());
            }
        }
        if self.config.knot_check() == KnotCheck::Strict {
            let shape = [xs.len()];
            check_knots(ArrayView::new(&shape, xs)?, xs.len())?;
        }

        let knots = RowKnots { xs, ys, period };
        let plan = self.sharder.plan(ts.len(), xs.len());
        self.in_pool(|| {
            self.sharder
                .execute(plan, ts, out, |ts, out| evaluate_chunk(&knots, ts, out))
        });
        Ok(())
    }

    /// Validates shapes and, under strict checking, knot ordering.
    fn prepare<T: Element>(
        &self,
        t: ArrayView<'_, T>,
        p: ArrayView<'_, T>,
        x: ArrayView<'_, T>,
        y: ArrayView<'_, T>,
    ) -> Result<BatchLayout, InterpError> {
        let layout = validate_shapes(t.shape(), p.shape(), x.shape(), y.shape())?;
        if self.config.knot_check() == KnotCheck::Strict {
            check_knots(x, layout.m())?;
        }
        Ok(layout)
    }

    /// Evaluates every row of a validated call into `out`.
    fn fill<T: Element>(
        &self,
        layout: &BatchLayout,
        [t, p, x, y]: [ArrayView<'_, T>; 4],
        out: RowOutputs<'_, T>,
    ) {
        let (n, m) = (layout.n(), layout.m());
        let _span = debug_span!("interp", batch = layout.batch_size(), n, m).entered();
        if n == 0 {
            return;
        }

        let plan = self.sharder.plan(n, m);
        debug!(
            block_size = plan.block_size,
            num_shards = plan.num_shards,
            "planned row shards"
        );

        let RowOutputs { v, a, inds } = out;
        self.in_pool(|| {
            let rows = v
                .chunks_exact_mut(n)
                .zip(a.chunks_exact_mut(n))
                .zip(inds.chunks_exact_mut(n));
            for (k, ((v, a), inds)) in rows.enumerate() {
                let knots = RowKnots {
                    xs: x.row(k, m),
                    ys: y.row(k, m),
                    period: p.data()[k],
                };
                self.sharder.execute(
                    plan,
                    t.row(k, n),
                    RowOutputs { v, a, inds },
                    |ts, out| evaluate_chunk(&knots, ts, out),
                );
            }
        });
    }

    fn in_pool<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

/// Interpolates with the default configuration.
///
/// Equivalent to `Interpolator::default().interp(t, p, x, y)`.
pub fn interp<T: Element>(
    t: ArrayView<'_, T>,
    p: ArrayView<'_, T>,
    x: ArrayView<'_, T>,
    y: ArrayView<'_, T>,
) -> Result<InterpOutput<T>, InterpError> {
    Interpolator::default().interp(t, p, x, y)
}
