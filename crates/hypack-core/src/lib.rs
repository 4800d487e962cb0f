//! # hypack-core
//!
//! Core types for the hypack sphere-packing library.
//!
//! - [`Point`] / [`Gradient`]: `f64` vectors in the ambient space R^d
//! - [`sample_unit_vector`]: uniformly-scaled random unit vectors
//! - [`RngKey`]: deterministic, splittable seeds (ChaCha8 underneath)
//! - [`SpackError`]: the typed failure returned by every fallible operation
//!
//! ```rust
//! use hypack_core::{sample_unit_vector, norm, RngKey};
//!
//! let mut rng = RngKey::new(42).to_rng();
//! let x = sample_unit_vector(4, &mut rng).unwrap();
//! assert!((norm(&x) - 1.0).abs() < 1e-12);
//! ```

pub mod error;
pub mod rng;
pub mod vector;

pub use error::*;
pub use rng::*;
pub use vector::*;
