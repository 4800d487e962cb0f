//! Orthonormal bases for the tangent hyperplane of the unit sphere.
//!
//! The basis at `x` is grown by Gram–Schmidt: random unit vectors are
//! orthogonalized against `{x, e_1, .., e_k}` until `d - 1` vectors have been
//! accepted. A basis is built fresh for every geodesic step and never cached.

use hypack_core::{
    norm, normalized, sample_unit_vector, Gradient, Point, Result, SpackError, MAX_RETRIES,
};
use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;

/// Orthogonalized candidates below this norm were nearly dependent on the
/// accumulated set and are redrawn.
pub const MIN_RESIDUAL_NORM: f64 = 1e-8;

/// Base vectors below this norm have no meaningful tangent space.
pub const MIN_BASE_NORM: f64 = 1e-12;

/// Orthonormal basis of the tangent hyperplane at a point.
///
/// Stored as a `[d, d-1]` matrix whose columns are the basis vectors, so
/// `gradient · B` gives tangent coordinates and `B · local` lifts them back.
#[derive(Clone, Debug, PartialEq)]
pub struct TangentBasis {
    vectors: Array2<f64>,
}

impl TangentBasis {
    /// Build a random orthonormal basis for the tangent space at `x`.
    ///
    /// `x` is normalized before use, so the returned columns are orthogonal
    /// to `x` even if it drifted slightly off the sphere. For `d == 1` the
    /// basis is empty.
    ///
    /// # Errors
    ///
    /// - [`SpackError::InvalidDimension`] if `x` is empty
    /// - [`SpackError::ZeroVector`] if `x` is zero or non-finite
    /// - [`SpackError::RetryExhausted`] if a basis vector could not be accepted
    pub fn build<R: Rng + ?Sized>(x: &Point, rng: &mut R) -> Result<Self> {
        let d = x.len();
        if d == 0 {
            return Err(SpackError::InvalidDimension { dimension: 0 });
        }

        let base = normalized(x, MIN_BASE_NORM).ok_or(SpackError::ZeroVector { norm: norm(x) })?;

        let mut accepted: Vec<Array1<f64>> = Vec::with_capacity(d);
        accepted.push(base);
        for _ in 1..d {
            let next = orthonormal_vector(&accepted, rng)?;
            accepted.push(next);
        }

        let columns = &accepted[1..];
        let vectors = Array2::from_shape_fn((d, d - 1), |(row, col)| columns[col][row]);

        Ok(Self { vectors })
    }

    /// Ambient dimension `d`.
    pub fn dim(&self) -> usize {
        self.vectors.nrows()
    }

    /// Number of basis vectors (`d - 1`).
    pub fn len(&self) -> usize {
        self.vectors.ncols()
    }

    /// True for the degenerate 1-D sphere.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k`-th basis vector.
    pub fn column(&self, k: usize) -> ArrayView1<'_, f64> {
        self.vectors.column(k)
    }

    /// Basis vectors as the columns of a `[d, d-1]` matrix.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.vectors
    }

    /// Tangent coordinates of an ambient vector: `gradient · B`.
    pub fn project(&self, gradient: &Gradient) -> Result<Array1<f64>> {
        self.check_dim(gradient.len())?;
        if self.is_empty() {
            return Ok(Array1::zeros(0));
        }
        Ok(gradient.dot(&self.vectors))
    }

    /// Ambient vector for tangent coordinates: `B · local`.
    pub fn lift(&self, local: &Array1<f64>) -> Result<Array1<f64>> {
        if local.len() != self.len() {
            return Err(SpackError::DimensionMismatch {
                expected: self.len(),
                actual: local.len(),
            });
        }
        if self.is_empty() {
            return Ok(Array1::zeros(self.dim()));
        }
        Ok(self.vectors.dot(local))
    }

    fn check_dim(&self, actual: usize) -> Result<()> {
        if actual != self.dim() {
            return Err(SpackError::DimensionMismatch {
                expected: self.dim(),
                actual,
            });
        }
        Ok(())
    }
}

/// Draw a random unit vector orthogonal to every vector in `vectors`.
///
/// `vectors` must be orthonormal. Each candidate has its projection onto every
/// accepted vector removed (`v -= u * dot(v, u)`) and is redrawn if the
/// residual falls below [`MIN_RESIDUAL_NORM`].
///
/// # Errors
///
/// [`SpackError::InvalidDimension`] for an empty set, and
/// [`SpackError::RetryExhausted`] when no candidate survives, which happens
/// when `vectors` already spans the space.
pub fn orthonormal_vector<R: Rng + ?Sized>(
    vectors: &[Array1<f64>],
    rng: &mut R,
) -> Result<Array1<f64>> {
    let dimension = vectors
        .first()
        .map(|v| v.len())
        .ok_or(SpackError::InvalidDimension { dimension: 0 })?;

    for _ in 0..MAX_RETRIES {
        let mut candidate = sample_unit_vector(dimension, rng)?;
        for u in vectors {
            let overlap = candidate.dot(u);
            candidate.scaled_add(-overlap, u);
        }
        if let Some(unit) = normalized(&candidate, MIN_RESIDUAL_NORM) {
            return Ok(unit);
        }
    }

    Err(SpackError::RetryExhausted {
        context: "orthogonalizing a tangent basis candidate",
        attempts: MAX_RETRIES,
    })
}
