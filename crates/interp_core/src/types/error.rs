//! Error types for structured error handling.
//!
//! This module provides:
//! - `ShapeError`: Rank and dimension mismatches between input arrays
//! - `InterpError`: Errors returned by an interpolation call
//! - `ConfigError`: Invalid interpolator configuration

use thiserror::Error;

/// Shape constraint violated by the inputs (or outputs) of a call.
///
/// Each variant names exactly one constraint so the caller can tell which
/// array needs fixing.
///
/// # Examples
/// ```
/// use interp_core::types::ShapeError;
///
/// let err = ShapeError::PeriodRank { expected: 1, got: 2 };
/// assert!(format!("{}", err).contains("p must have"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The query array `t` is a scalar.
    #[error("t must be at least 1D")]
    QueryRank,

    /// `p` does not have exactly one dimension fewer than `t`.
    #[error("p must have the dimension len(t.shape) - 1: expected rank {expected}, got {got}")]
    PeriodRank {
        /// Required rank of `p`
        expected: usize,
        /// Actual rank of `p`
        got: usize,
    },

    /// `x` and `t` differ in rank.
    #[error("x and t must have the same number of dimensions: got {x} and {t}")]
    KnotRank {
        /// Rank of `x`
        x: usize,
        /// Rank of `t`
        t: usize,
    },

    /// `x` and `y` are not shape-identical.
    #[error("x and y must be the same shape: got {x:?} and {y:?}")]
    KnotValueShape {
        /// Shape of `x`
        x: Vec<usize>,
        /// Shape of `y`
        y: Vec<usize>,
    },

    /// An outer (batch) axis disagrees between `t`, `x` and `p`.
    #[error("incompatible dimensions on axis {axis}: t={t}, x={x}, p={p}")]
    BatchDimension {
        /// Offending axis
        axis: usize,
        /// Size in `t`
        t: usize,
        /// Size in `x`
        x: usize,
        /// Size in `p`
        p: usize,
    },

    /// Knot rows are empty while queries are present, so there is no
    /// boundary knot to clamp to.
    #[error("x must have at least one knot per row")]
    EmptyKnots,

    /// Backing buffer length does not match the product of the shape.
    #[error("buffer of length {got} does not fit shape {shape:?} (expected {expected})")]
    BufferLength {
        /// Requested shape
        shape: Vec<usize>,
        /// Element count implied by the shape
        expected: usize,
        /// Actual buffer length
        got: usize,
    },

    /// A caller-supplied output buffer does not match the shape of `t`.
    #[error("output {name} has shape {got:?}, expected {expected:?}")]
    OutputShape {
        /// Output name (`v`, `a` or `inds`)
        name: &'static str,
        /// Required shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },
}

/// Errors from an interpolation call.
///
/// Every variant is raised before any output element is written.
///
/// # Examples
/// ```
/// use interp_core::types::{InterpError, ShapeError};
///
/// let err = InterpError::from(ShapeError::QueryRank);
/// assert_eq!(format!("{}", err), "Invalid shape: t must be at least 1D");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpError {
    /// Rank or dimension mismatch among the arrays.
    #[error("Invalid shape: {0}")]
    InvalidShape(#[from] ShapeError),

    /// Knot positions decrease (strict knot checking only).
    #[error("Knots are not sorted in row {row} at index {index}")]
    UnsortedKnots {
        /// Batch row
        row: usize,
        /// Index of the first knot smaller than its predecessor
        index: usize,
    },

    /// Two adjacent knots coincide (strict knot checking only).
    #[error("Duplicate adjacent knots in row {row} at index {index}")]
    DuplicateKnots {
        /// Batch row
        row: usize,
        /// Index of the knot equal to its predecessor
        index: usize,
    },

    /// Interpolator configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Fixed chunk size of zero.
    #[error("chunk size must be positive")]
    ZeroChunkSize,

    /// Cost model weight of zero.
    #[error("cost per knot must be positive")]
    ZeroCostPerKnot,

    /// Minimum shard cost of zero.
    #[error("minimum cost per shard must be positive")]
    ZeroMinCost,

    /// Worker count of zero.
    #[error("thread count must be positive")]
    ZeroThreads,

    /// The dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}
