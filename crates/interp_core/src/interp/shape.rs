//! Shape validation for the four input arrays.

use crate::types::{element_count, ShapeError};

/// Batch geometry derived from validated input shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLayout {
    output_shape: Vec<usize>,
    batch_size: usize,
    n: usize,
    m: usize,
}

impl BatchLayout {
    /// Outer (batch) dimensions shared by `t`, `p`, `x` and `y`.
    #[inline]
    pub fn batch_shape(&self) -> &[usize] {
        &self.output_shape[..self.output_shape.len() - 1]
    }

    /// Number of independent rows (product of the batch dimensions).
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Queries per row.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Knots per row.
    #[inline]
    pub fn m(&self) -> usize {
        self.m
    }

    /// Shape of each of the three outputs, identical to the shape of `t`.
    #[inline]
    pub fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }
}

/// Checks the shapes of `t`, `p`, `x` and `y` against each other.
///
/// Constraints are checked in a fixed order and the first violation is
/// reported:
///
/// 1. `t` has rank at least 1
/// 2. `p` has rank `rank(t) - 1`
/// 3. `x` has the same rank as `t`
/// 4. `y` has exactly the shape of `x`
/// 5. every outer axis agrees between `t`, `x` and `p`
/// 6. knot rows are non-empty
///
/// # Example
///
/// ```
/// use interp_core::interp::validate_shapes;
///
/// let layout = validate_shapes(&[2, 3, 100], &[2, 3], &[2, 3, 8], &[2, 3, 8]).unwrap();
/// assert_eq!(layout.batch_size(), 6);
/// assert_eq!(layout.n(), 100);
/// assert_eq!(layout.m(), 8);
///
/// assert!(validate_shapes(&[2, 100], &[2, 1], &[2, 8], &[2, 8]).is_err());
/// ```
pub fn validate_shapes(
    t: &[usize],
    p: &[usize],
    x: &[usize],
    y: &[usize],
) -> Result<BatchLayout, ShapeError> {
    let ndim = t.len();
    if ndim < 1 {
        return Err(ShapeError::QueryRank);
    }
    if p.len() != ndim - 1 {
        return Err(ShapeError::PeriodRank {
            expected: ndim - 1,
            got: p.len(),
        });
    }
    if x.len() != ndim {
        return Err(ShapeError::KnotRank { x: x.len(), t: ndim });
    }
    if y != x {
        return Err(ShapeError::KnotValueShape {
            x: x.to_vec(),
            y: y.to_vec(),
        });
    }

    for axis in 0..ndim - 1 {
        let dim = t[axis];
        if x[axis] != dim || p[axis] != dim {
            return Err(ShapeError::BatchDimension {
                axis,
                t: dim,
                x: x[axis],
                p: p[axis],
            });
        }
    }

    let batch_size = element_count(&t[..ndim - 1]);
    let n = t[ndim - 1];
    let m = x[ndim - 1];
    // empty knot rows only matter when some query is evaluated against them
    if m == 0 && batch_size * n > 0 {
        return Err(ShapeError::EmptyKnots);
    }

    Ok(BatchLayout {
        output_shape: t.to_vec(),
        batch_size,
        n,
        m,
    })
}
