//! Optional validation of knot tables.

use std::cmp::Ordering;

use crate::types::{ArrayView, Element, InterpError};

/// Whether knot tables are validated before evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum KnotCheck {
    /// Trust the caller; unsorted knots give unspecified (but memory-safe)
    /// results.
    #[default]
    Unchecked,

    /// Reject rows whose knots are not strictly increasing.
    Strict,
}

/// Checks that every row of `x` (rows of `m` knots) is strictly increasing.
///
/// NaN knots are reported as unsorted. Empty rows (`m == 0`) pass.
pub fn check_knots<T: Element>(x: ArrayView<'_, T>, m: usize) -> Result<(), InterpError> {
    if m == 0 {
        return Ok(());
    }
    for (row, xs) in x.data().chunks_exact(m).enumerate() {
        for (index, pair) in xs.windows(2).enumerate().map(|(i, w)| (i + 1, w)) {
            match pair[1].partial_cmp(&pair[0]) {
                Some(Ordering::Greater) => {}
                Some(Ordering::Equal) => return Err(InterpError::DuplicateKnots { row, index }),
                _ => return Err(InterpError::UnsortedKnots { row, index }),
            }
        }
    }
    Ok(())
}
