//! Per-element numerical helpers used by the interpolation kernel.
//!
//! - [`wrap`]: periodic folding of a query time into `[0, period)`
//! - [`search_sorted`]: bounded binary search for the bracketing knot

mod search;
mod wrap;

pub use search::search_sorted;
pub use wrap::wrap;
