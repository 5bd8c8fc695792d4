//! Bounded binary search over sorted knots.

use num_traits::Float;

/// Returns the smallest index `i` with `xs[i] > value`.
///
/// The caller guarantees `xs[0] < value < xs[xs.len() - 1]`, so the result
/// always lies in `[1, xs.len() - 1]`. A value equal to an interior knot
/// `xs[i]` maps to `i + 1`.
///
/// The search keeps an open interval `(low, high)` starting at `(-1, len)`
/// and stops when the bounds are adjacent; the loop carries no equality
/// branch.
///
/// # Example
///
/// ```
/// use interp_core::math::search_sorted;
///
/// let xs = [0.0, 1.0, 2.0, 3.0];
/// assert_eq!(search_sorted(&xs, 0.5), 1);
/// assert_eq!(search_sorted(&xs, 1.0), 2);
/// assert_eq!(search_sorted(&xs, 2.5), 3);
/// ```
#[inline]
pub fn search_sorted<T: Float>(xs: &[T], value: T) -> usize {
    let mut low: isize = -1;
    let mut high = xs.len() as isize;
    while high - low > 1 {
        let probe = (low + high) / 2;
        if xs[probe as usize] > value {
            high = probe;
        } else {
            low = probe;
        }
    }
    high as usize
}
