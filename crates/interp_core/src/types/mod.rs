//! Core types: array views and error types.
//!
//! - [`Array`], [`ArrayView`], [`ArrayViewMut`]: row-major buffers with shapes
//! - [`Element`]: floating-point element bound (`f32`, `f64`)
//! - [`ShapeError`], [`InterpError`], [`ConfigError`]: structured errors

pub mod array;
pub mod element;
pub mod error;

pub use array::{element_count, Array, ArrayView, ArrayViewMut};
pub use element::Element;
pub use error::{ConfigError, InterpError, ShapeError};
