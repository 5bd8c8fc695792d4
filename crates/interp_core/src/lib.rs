//! # interp_core: Batched Periodic Linear Interpolation
//!
//! Evaluates piecewise-linear tables for large batches of independent rows,
//! as used when modelling periodic light curves. For every query time the
//! kernel returns the interpolated value, the interpolation fraction and the
//! knot index it used.
//!
//! ## Modules
//!
//! - `types`: row-major [`Array`](types::Array) buffers, views and error types
//! - `math`: periodic folding ([`wrap`](math::wrap)) and the bounded binary
//!   search ([`search_sorted`](math::search_sorted))
//! - `interp`: shape validation, the per-query kernel, row sharding and the
//!   configured [`Interpolator`](interp::Interpolator)
//!
//! ## Usage Examples
//!
//! ```rust
//! use interp_core::interp::{InterpConfig, Interpolator};
//! use interp_core::types::Array;
//!
//! // two rows of four queries, one period per row
//! let t = Array::new(vec![2, 4], vec![0.25, 1.5, 2.75, 4.0, -0.5, 0.5, 1.5, 2.5]).unwrap();
//! let p = Array::new(vec![2], vec![0.0, 2.0]).unwrap();
//! let x = Array::new(vec![2, 3], vec![0.0, 1.0, 3.0, 0.0, 1.0, 2.0]).unwrap();
//! let y = Array::new(vec![2, 3], vec![1.0, 3.0, 7.0, 0.0, 1.0, 0.0]).unwrap();
//!
//! let interpolator = Interpolator::new(InterpConfig::default()).unwrap();
//! let out = interpolator.interp(t.view(), p.view(), x.view(), y.view()).unwrap();
//!
//! assert_eq!(out.v.shape(), &[2, 4]);
//! assert_eq!(out.inds.data(), &[1, 2, 2, 4, 2, 1, 2, 1]);
//! # assert!((out.v.data()[0] - 1.5_f64).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialisation for arrays, outputs and configuration

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod interp;
pub mod math;
pub mod types;
