//! # hypack-manifold
//!
//! Riemannian gradient descent on the unit hypersphere S^(d-1) ⊂ R^d.
//!
//! - [`TangentBasis`]: random orthonormal basis of the tangent hyperplane at a point
//! - [`GeodesicStepper`]: projects an ambient gradient and steps along the great circle
//!
//! ```rust
//! use hypack_core::{norm, RngKey};
//! use hypack_manifold::GeodesicStepper;
//! use ndarray::array;
//!
//! let mut rng = RngKey::new(42).to_rng();
//! let stepper = GeodesicStepper::new(0.1, std::f64::consts::PI / 20.0);
//!
//! let x = array![1.0, 0.0, 0.0];
//! let gradient = array![0.0, 1.0, 0.5];
//! let next = stepper.step(&x, &gradient, &mut rng).unwrap();
//! assert!((norm(&next) - 1.0).abs() < 1e-9);
//! ```

pub mod basis;
pub mod geodesic;

pub use basis::*;
pub use geodesic::*;
