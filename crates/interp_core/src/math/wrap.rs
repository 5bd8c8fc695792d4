//! Periodic folding of query times.

use num_traits::Float;

/// Folds `value` into the canonical domain `[0, period)`.
///
/// Folding only happens for a positive `period`; zero, negative and NaN
/// periods return `value` unchanged.
///
/// The remainder operator on floats truncates toward zero, so a negative
/// `value` first lands in `(-period, 0]` and needs a second fold after
/// shifting by one period.
///
/// # Example
///
/// ```
/// use interp_core::math::wrap;
///
/// assert_eq!(wrap(2.5_f64, 2.0), 0.5);
/// assert_eq!(wrap(-0.5_f64, 2.0), 1.5);
/// assert_eq!(wrap(-0.5_f64, 0.0), -0.5);
/// ```
#[inline]
pub fn wrap<T: Float>(value: T, period: T) -> T {
    if !(period > T::zero()) {
        return value;
    }
    let trunc_mod = value % period;
    if value >= T::zero() {
        trunc_mod
    } else {
        (trunc_mod + period) % period
    }
}
