//! Rayon-based sharding of a row's queries across worker threads.
//!
//! A row of `N` queries is split into contiguous, disjoint blocks. Each
//! block pairs a read-only slice of query times with mutable slices of the
//! three outputs, so every output element is written by exactly one worker
//! and the result does not depend on how many workers ran.
//!
//! # Cost model
//!
//! The default [`ShardStrategy::CostModel`] estimates the cost of one query
//! as `cost_per_knot * M` and only splits a row when each shard carries at
//! least `min_cost_per_shard` units of work.

use rayon::prelude::*;

use super::kernel::RowOutputs;

/// Default cost units charged per knot for one query.
pub const DEFAULT_COST_PER_KNOT: usize = 5;

/// Default minimum cost a shard must carry before a row is split.
pub const DEFAULT_MIN_COST_PER_SHARD: usize = 10_000;

/// Default block size for [`ShardStrategy::FixedChunks`] when none is given.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// How a row's queries are partitioned across workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "kebab-case")
)]
pub enum ShardStrategy {
    /// Evaluate the whole row on the calling thread.
    Sequential,

    /// Split the row into blocks of `chunk_size` queries.
    FixedChunks {
        /// Queries per block.
        chunk_size: usize,
    },

    /// Size blocks from the per-query cost estimate.
    #[default]
    CostModel,
}

/// Partition of a row into equally sized contiguous blocks.
///
/// The final block may be shorter than `block_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShardPlan {
    /// Queries per block.
    pub block_size: usize,
    /// Number of blocks covering the row.
    pub num_shards: usize,
}

impl ShardPlan {
    /// A plan covering `total` queries with blocks of `block_size`.
    pub fn with_block_size(total: usize, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            block_size,
            num_shards: total.div_ceil(block_size),
        }
    }

    /// A plan running all `total` queries as one block.
    pub fn single(total: usize) -> Self {
        Self::with_block_size(total, total)
    }

    /// Returns whether the plan runs inline on the calling thread.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.num_shards <= 1
    }
}

/// Computes the cost-model plan for `total` queries.
///
/// `num_shards = max(1, min(max_parallelism, total * cost_per_unit / min_cost_per_shard))`
/// and the block size is `ceil(total / num_shards)`.
///
/// # Example
///
/// ```
/// use interp_core::interp::plan_shards;
///
/// // 1000 queries against 4 knots: 20_000 cost units, two shards
/// let plan = plan_shards(1000, 20, 8, 10_000);
/// assert_eq!((plan.num_shards, plan.block_size), (2, 500));
///
/// // cheap rows stay inline
/// assert!(plan_shards(10, 20, 8, 10_000).is_inline());
/// ```
pub fn plan_shards(
    total: usize,
    cost_per_unit: usize,
    max_parallelism: usize,
    min_cost_per_shard: usize,
) -> ShardPlan {
    let by_cost = total.saturating_mul(cost_per_unit) / min_cost_per_shard.max(1);
    let num_shards = by_cost.min(max_parallelism).max(1);
    ShardPlan::with_block_size(total, total.div_ceil(num_shards))
}

/// Partitions and executes per-row work according to a [`ShardStrategy`].
#[derive(Clone, Copy, Debug)]
pub struct Sharder {
    strategy: ShardStrategy,
    cost_per_knot: usize,
    min_cost_per_shard: usize,
    max_parallelism: usize,
}

impl Sharder {
    /// Creates a sharder for a pool of `max_parallelism` workers.
    pub fn new(
        strategy: ShardStrategy,
        cost_per_knot: usize,
        min_cost_per_shard: usize,
        max_parallelism: usize,
    ) -> Self {
        Self {
            strategy,
            cost_per_knot,
            min_cost_per_shard,
            max_parallelism: max_parallelism.max(1),
        }
    }

    /// Returns the configured strategy.
    #[inline]
    pub fn strategy(&self) -> ShardStrategy {
        self.strategy
    }

    /// Returns the worker count the cost model plans for.
    #[inline]
    pub fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    /// Plans a row of `total` queries against `knots` knots.
    pub fn plan(&self, total: usize, knots: usize) -> ShardPlan {
        match self.strategy {
            ShardStrategy::Sequential => ShardPlan::single(total),
            ShardStrategy::FixedChunks { chunk_size } => {
                ShardPlan::with_block_size(total, chunk_size)
            }
            ShardStrategy::CostModel => plan_shards(
                total,
                self.cost_per_knot.saturating_mul(knots),
                self.max_parallelism,
                self.min_cost_per_shard,
            ),
        }
    }

    /// Runs `work` over `ts` and `out` split according to `plan`.
    ///
    /// `work` receives a query block and the output slices for exactly that
    /// block. Single-block plans run on the calling thread; otherwise blocks
    /// are distributed over the current rayon pool.
    pub fn execute<T, F>(&self, plan: ShardPlan, ts: &[T], out: RowOutputs<'_, T>, work: F)
    where
        T: Send + Sync,
        F: Fn(&[T], RowOutputs<'_, T>) + Sync,
    {
        if plan.is_inline() {
            work(ts, out);
            return;
        }

        let block = plan.block_size;
        let RowOutputs { v, a, inds } = out;
        ts.par_chunks(block)
            .zip(v.par_chunks_mut(block))
            .zip(a.par_chunks_mut(block))
            .zip(inds.par_chunks_mut(block))
            .for_each(|(((ts, v), a), inds)| work(ts, RowOutputs { v, a, inds }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_shards_inline_below_min_cost() {
        let plan = plan_shards(100, 10, 8, DEFAULT_MIN_COST_PER_SHARD);
        assert_eq!(plan, ShardPlan::single(100));
        assert!(plan.is_inline());
    }

    #[test]
    fn test_plan_shards_capped_by_parallelism() {
        let plan = plan_shards(100_000, 50, 4, DEFAULT_MIN_COST_PER_SHARD);
        assert_eq!(plan.num_shards, 4);
        assert_eq!(plan.block_size, 25_000);
    }

    #[test]
    fn test_plan_shards_uneven_tail() {
        let plan = plan_shards(1001, 30, 3, 10_000);
        assert_eq!(plan.block_size, 334);
        assert_eq!(plan.num_shards, 3);
    }

    #[test]
    fn test_larger_tables_shard_more() {
        let coarse = plan_shards(2000, DEFAULT_COST_PER_KNOT * 2, 16, 10_000);
        let fine = plan_shards(2000, DEFAULT_COST_PER_KNOT * 64, 16, 10_000);
        assert!(coarse.num_shards < fine.num_shards);
    }

    #[test]
    fn test_plan_empty_row() {
        let plan = plan_shards(0, 50, 4, 10_000);
        assert_eq!(plan.num_shards, 0);
        assert!(plan.is_inline());
    }

    #[test]
    fn test_plan_saturates_on_overflow() {
        let plan = plan_shards(usize::MAX / 2, usize::MAX, 8, 10_000);
        assert_eq!(plan.num_shards, 8);
    }

    #[test]
    fn test_sharder_strategies() {
        let seq = Sharder::new(ShardStrategy::Sequential, 5, 10_000, 8);
        assert!(seq.plan(1_000_000, 1000).is_inline());

        let fixed = Sharder::new(ShardStrategy::FixedChunks { chunk_size: 10 }, 5, 10_000, 8);
        assert_eq!(fixed.plan(95, 4).num_shards, 10);

        let cost = Sharder::new(ShardStrategy::CostModel, 5, 10_000, 0);
        assert_eq!(cost.max_parallelism(), 1);
        assert!(cost.plan(1_000_000, 1000).is_inline());
    }

    #[test]
    fn test_execute_covers_every_element_once() {
        let sharder = Sharder::new(ShardStrategy::FixedChunks { chunk_size: 7 }, 5, 10_000, 4);
        let ts: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let mut v = vec![0.0; 50];
        let mut a = vec![0.0; 50];
        let mut inds = vec![0_i64; 50];
        let plan = sharder.plan(ts.len(), 2);
        assert_eq!(plan.num_shards, 8);

        sharder.execute(
            plan,
            &ts,
            RowOutputs {
                v: &mut v,
                a: &mut a,
                inds: &mut inds,
            },
            |ts, out| {
                for (n, &t) in ts.iter().enumerate() {
                    out.v[n] = t * 2.0;
                    out.a[n] += 1.0;
                    out.inds[n] = ts.len() as i64;
                }
            },
        );

        for i in 0..50 {
            assert_eq!(v[i], 2.0 * i as f64);
            assert_eq!(a[i], 1.0);
        }
        assert_eq!(inds[49], 1);
        assert_eq!(inds[0], 7);
    }
}
