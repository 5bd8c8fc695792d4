//! Element trait for interpolation buffers.

use num_traits::Float;
use std::fmt::Debug;

/// Floating-point element type accepted by the interpolation kernel.
///
/// Implemented for every `Float` that can be zero-initialised and shared
/// across worker threads, which in practice means `f32` and `f64`.
pub trait Element: Float + Default + Debug + Send + Sync + 'static {}

impl<T> Element for T where T: Float + Default + Debug + Send + Sync + 'static {}
