//! Per-query interpolation kernel.

use crate::math::{search_sorted, wrap};
use crate::types::Element;

/// Result of interpolating a single query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation<T> {
    /// Interpolated (or clamped) value.
    pub value: T,
    /// Position within the bracketing interval; `None` when clamped.
    pub fraction: Option<T>,
    /// `0` when clamped low, `M + 1` when clamped high, otherwise the index
    /// of the right-hand knot of the interval.
    pub index: i64,
}

/// Knot table and period for one batch row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowKnots<'a, T> {
    pub xs: &'a [T],
    pub ys: &'a [T],
    pub period: T,
}

/// Mutable output slices for a contiguous range of queries in one row.
///
/// All three slices have the same length as the query slice they pair with.
#[derive(Debug)]
pub struct RowOutputs<'a, T> {
    /// Interpolated values.
    pub v: &'a mut [T],
    /// Interpolation fractions.
    pub a: &'a mut [T],
    /// Knot indices.
    pub inds: &'a mut [i64],
}

/// Index reported for a query that is NaN after wrapping.
pub const UNDEFINED_INDEX: i64 = -1;

/// Interpolates a single query `t` against one row of knots.
///
/// `xs` must be non-empty and sorted ascending; `ys` must have the same
/// length. Queries at or beyond the outer knots clamp to the boundary value.
/// A NaN query yields a NaN value and [`UNDEFINED_INDEX`].
///
/// # Example
///
/// ```
/// use interp_core::interp::evaluate_query;
///
/// let xs = [0.0, 1.0, 2.0, 3.0];
/// let ys = [0.0, 10.0, 20.0, 30.0];
///
/// let e = evaluate_query(&xs, &ys, 0.0, 2.5);
/// assert_eq!(e.index, 3);
/// assert_eq!(e.fraction, Some(0.5));
/// assert_eq!(e.value, 25.0);
///
/// let e = evaluate_query(&xs, &ys, 0.0, 10.0);
/// assert_eq!((e.value, e.fraction, e.index), (30.0, None, 5));
/// ```
#[inline]
pub fn evaluate_query<T: Element>(xs: &[T], ys: &[T], period: T, t: T) -> Evaluation<T> {
    let m = xs.len();
    let value = wrap(t, period);

    if value.is_nan() {
        Evaluation {
            value,
            fraction: None,
            index: UNDEFINED_INDEX,
        }
    } else if value <= xs[0] {
        Evaluation {
            value: ys[0],
            fraction: None,
            index: 0,
        }
    } else if value < xs[m - 1] {
        // xs[ind - 1] <= value < xs[ind], so the denominator is positive
        let ind = search_sorted(xs, value);
        let a0 = (value - xs[ind - 1]) / (xs[ind] - xs[ind - 1]);
        Evaluation {
            value: a0 * ys[ind] + (T::one() - a0) * ys[ind - 1],
            fraction: Some(a0),
            index: ind as i64,
        }
    } else {
        Evaluation {
            value: ys[m - 1],
            fraction: None,
            index: m as i64 + 1,
        }
    }
}

/// Evaluates a contiguous run of queries, writing one element per output.
///
/// Clamped queries leave their fraction slot untouched.
pub(crate) fn evaluate_chunk<T: Element>(
    knots: &RowKnots<'_, T>,
    ts: &[T],
    out: RowOutputs<'_, T>,
) {
    let RowOutputs { v, a, inds } = out;
    for (n, &t) in ts.iter().enumerate() {
        let e = evaluate_query(knots.xs, knots.ys, knots.period, t);
        v[n] = e.value;
        inds[n] = e.index;
        if let Some(fraction) = e.fraction {
            a[n] = fraction;
        }
    }
}
