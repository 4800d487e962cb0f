//! Points, gradients and random unit vectors.
//!
//! All vectors are CPU `f64` arrays. Unit-norm bookkeeping on the sphere is
//! precision-sensitive (step angles are clamped, near-dependent candidates are
//! rejected at 1e-8), so nothing here goes through `f32`.

use ndarray::Array1;
use rand::Rng;

use crate::error::{Result, SpackError, MAX_RETRIES};

/// A location on the unit sphere embedded in R^d.
pub type Point = Array1<f64>;

/// Partial derivatives of a loss with respect to a point's ambient coordinates.
pub type Gradient = Array1<f64>;

/// Draws below this norm are rejected before normalizing.
pub const MIN_SAMPLE_NORM: f64 = 1e-5;

/// Euclidean norm.
pub fn norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

/// Euclidean distance between two vectors of equal length.
pub fn distance(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Return `v / |v|`, or `None` if the norm is below `min_norm` or not finite.
pub fn normalized(v: &Array1<f64>, min_norm: f64) -> Option<Array1<f64>> {
    let n = norm(v);
    if !n.is_finite() || n < min_norm {
        return None;
    }
    Some(v / n)
}

/// Sample a random unit vector in R^`dimension`.
///
/// Each component is drawn uniformly from `[-0.5, 0.5)`. Draws with norm below
/// [`MIN_SAMPLE_NORM`] are redrawn, up to [`MAX_RETRIES`] times.
///
/// # Errors
///
/// [`SpackError::InvalidDimension`] for `dimension == 0`, and
/// [`SpackError::RetryExhausted`] if every draw was undersized.
pub fn sample_unit_vector<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Point> {
    if dimension == 0 {
        return Err(SpackError::InvalidDimension { dimension });
    }

    for _ in 0..MAX_RETRIES {
        let draw = Array1::from_shape_fn(dimension, |_| rng.gen::<f64>() - 0.5);
        if let Some(unit) = normalized(&draw, MIN_SAMPLE_NORM) {
            return Ok(unit);
        }
    }

    Err(SpackError::RetryExhausted {
        context: "sampling a random unit vector",
        attempts: MAX_RETRIES,
    })
}
