//! Interpolator configuration.
//!
//! This module provides [`InterpConfig`] and its builder. Configurations are
//! immutable once built and validated again when an
//! [`Interpolator`](super::Interpolator) is created from them, which covers
//! values deserialised from a file.

use super::knots::KnotCheck;
use super::sharder::{ShardStrategy, DEFAULT_COST_PER_KNOT, DEFAULT_MIN_COST_PER_SHARD};
use crate::types::ConfigError;

/// Interpolation call configuration.
///
/// # Examples
///
/// ```rust
/// use interp_core::interp::{InterpConfig, KnotCheck, ShardStrategy};
///
/// let config = InterpConfig::builder()
///     .threads(4)
///     .strategy(ShardStrategy::FixedChunks { chunk_size: 256 })
///     .knot_check(KnotCheck::Strict)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.threads(), Some(4));
/// assert_eq!(config.cost_per_knot(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct InterpConfig {
    /// Size of a dedicated worker pool; `None` uses the global rayon pool.
    threads: Option<usize>,
    /// Row partitioning strategy.
    strategy: ShardStrategy,
    /// Cost units per knot for one query (cost model only).
    cost_per_knot: usize,
    /// Minimum cost per shard (cost model only).
    min_cost_per_shard: usize,
    /// Knot table validation.
    knot_check: KnotCheck,
}

impl Default for InterpConfig {
    fn default() -> Self {
        Self {
            threads: None,
            strategy: ShardStrategy::default(),
            cost_per_knot: DEFAULT_COST_PER_KNOT,
            min_cost_per_shard: DEFAULT_MIN_COST_PER_SHARD,
            knot_check: KnotCheck::default(),
        }
    }
}

impl InterpConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> InterpConfigBuilder {
        InterpConfigBuilder::default()
    }

    /// Returns the dedicated pool size, if any.
    #[inline]
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// Returns the sharding strategy.
    #[inline]
    pub fn strategy(&self) -> ShardStrategy {
        self.strategy
    }

    /// Returns the cost units charged per knot.
    #[inline]
    pub fn cost_per_knot(&self) -> usize {
        self.cost_per_knot
    }

    /// Returns the minimum cost per shard.
    #[inline]
    pub fn min_cost_per_shard(&self) -> usize {
        self.min_cost_per_shard
    }

    /// Returns the knot validation mode.
    #[inline]
    pub fn knot_check(&self) -> KnotCheck {
        self.knot_check
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any of the thread count, fixed chunk size,
    /// cost per knot or minimum shard cost is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        if let ShardStrategy::FixedChunks { chunk_size: 0 } = self.strategy {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.cost_per_knot == 0 {
            return Err(ConfigError::ZeroCostPerKnot);
        }
        if self.min_cost_per_shard == 0 {
            return Err(ConfigError::ZeroMinCost);
        }
        Ok(())
    }
}

/// Builder for [`InterpConfig`].
///
/// Starts from [`InterpConfig::default`] and validates on [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct InterpConfigBuilder {
    config: InterpConfig,
}

impl InterpConfigBuilder {
    /// Starts from an existing configuration.
    pub fn from_config(config: InterpConfig) -> Self {
        Self { config }
    }

    /// Runs rows on a dedicated pool of `threads` workers.
    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = Some(threads);
        self
    }

    /// Uses the global rayon pool.
    pub fn global_pool(mut self) -> Self {
        self.config.threads = None;
        self
    }

    /// Sets the sharding strategy.
    pub fn strategy(mut self, strategy: ShardStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Sets the cost units charged per knot.
    pub fn cost_per_knot(mut self, cost: usize) -> Self {
        self.config.cost_per_knot = cost;
        self
    }

    /// Sets the minimum cost per shard.
    pub fn min_cost_per_shard(mut self, cost: usize) -> Self {
        self.config.min_cost_per_shard = cost;
        self
    }

    /// Sets the knot validation mode.
    pub fn knot_check(mut self, check: KnotCheck) -> Self {
        self.config.knot_check = check;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<InterpConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
