//! Geodesic gradient descent on the unit sphere.
//!
//! One step projects an ambient gradient onto a fresh tangent basis, picks the
//! unit descent direction inside the tangent plane, and moves along the great
//! circle toward it:
//!
//! ```text
//! g_local = gradient · B
//! target  = B · (g_local / -|g_local|)
//! angle   = min(learning_rate * |g_local|, max_angle)
//! x_new   = cos(angle) * x + sin(angle) * target
//! ```
//!
//! `x` and `target` are orthonormal, so `x_new` stays on the sphere without
//! renormalization.

use hypack_core::{norm, Gradient, Point, Result, SpackError};
use ndarray::Array1;
use rand::Rng;

use crate::basis::TangentBasis;

/// Tangent gradients below this norm are treated as zero.
pub const DEFAULT_MIN_NORM: f64 = 1e-13;

/// Configuration for geodesic gradient steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodesicStepper {
    /// Radians of travel per unit of tangent gradient norm
    pub learning_rate: f64,
    /// Hard cap on the step angle (radians)
    pub max_angle: f64,
    /// Minimum tangent gradient norm needed to take any step
    pub min_norm: f64,
}

/// Outcome of a single geodesic step.
#[derive(Clone, Debug, PartialEq)]
pub struct GeodesicStep {
    /// The updated point (the input itself when `skipped`)
    pub point: Point,
    /// Angle travelled along the great circle
    pub angle: f64,
    /// Norm of the gradient in tangent coordinates
    pub tangent_norm: f64,
    /// True if the tangent gradient was below `min_norm`
    pub skipped: bool,
}

impl GeodesicStepper {
    /// Create a stepper with the default minimum norm.
    pub const fn new(learning_rate: f64, max_angle: f64) -> Self {
        Self {
            learning_rate,
            max_angle,
            min_norm: DEFAULT_MIN_NORM,
        }
    }

    /// Set the minimum tangent gradient norm.
    pub const fn with_min_norm(mut self, min_norm: f64) -> Self {
        self.min_norm = min_norm;
        self
    }

    /// Step angle for a given tangent gradient norm.
    pub fn angle_for(&self, tangent_norm: f64) -> f64 {
        (self.learning_rate * tangent_norm).min(self.max_angle)
    }

    /// Move `x` one geodesic step against `gradient`.
    ///
    /// Returns `x` unchanged if the tangent part of the gradient is below
    /// `min_norm` (always the case on the 1-D sphere). A gradient with a
    /// NaN or infinite tangent part fails with
    /// [`SpackError::InvalidParameter`].
    pub fn step<R: Rng + ?Sized>(
        &self,
        x: &Point,
        gradient: &Gradient,
        rng: &mut R,
    ) -> Result<Point> {
        self.step_detailed(x, gradient, rng).map(|step| step.point)
    }

    /// Like [`step`](Self::step), also reporting the angle and tangent norm.
    pub fn step_detailed<R: Rng + ?Sized>(
        &self,
        x: &Point,
        gradient: &Gradient,
        rng: &mut R,
    ) -> Result<GeodesicStep> {
        if gradient.len() != x.len() {
            return Err(SpackError::DimensionMismatch {
                expected: x.len(),
                actual: gradient.len(),
            });
        }

        let basis = TangentBasis::build(x, rng)?;
        let local = basis.project(gradient)?;
        let tangent_norm = norm(&local);
        if !tangent_norm.is_finite() {
            return Err(SpackError::invalid_parameter(
                "gradient",
                format!("tangent component is not finite (norm {})", tangent_norm),
            ));
        }

        if basis.is_empty() || tangent_norm < self.min_norm {
            log::trace!("geodesic step skipped: tangent norm {:.3e}", tangent_norm);
            return Ok(GeodesicStep {
                point: x.clone(),
                angle: 0.0,
                tangent_norm,
                skipped: true,
            });
        }

        let target_local = local / -tangent_norm;
        let target = basis.lift(&target_local)?;
        let angle = self.angle_for(tangent_norm);

        Ok(GeodesicStep {
            point: exponential_map(x, &target, angle),
            angle,
            tangent_norm,
            skipped: false,
        })
    }
}

/// Travel `angle` radians from `x` along the great circle toward `direction`.
///
/// `direction` must be a unit vector orthogonal to `x`.
pub fn exponential_map(x: &Point, direction: &Array1<f64>, angle: f64) -> Point {
    x * angle.cos() + direction * angle.sin()
}

/// One geodesic step with the default minimum norm.
pub fn geodesic_step<R: Rng + ?Sized>(
    x: &Point,
    gradient: &Gradient,
    learning_rate: f64,
    max_angle: f64,
    rng: &mut R,
) -> Result<Point> {
    GeodesicStepper::new(learning_rate, max_angle).step(x, gradient, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypack_core::{distance, sample_unit_vector, RngKey};
    use ndarray::array;
    use std::f64::consts::PI;

    #[test]
    fn test_step_stays_on_sphere() {
        let mut rng = RngKey::new(42).to_rng();
        let stepper = GeodesicStepper::new(0.1, PI / 20.0);

        for d in 2..=8 {
            let x = sample_unit_vector(d, &mut rng).unwrap();
            let g = sample_unit_vector(d, &mut rng).unwrap() * 3.0;
            let next = stepper.step(&x, &g, &mut rng).unwrap();
            assert!((norm(&next) - 1.0).abs() < 1e-9, "d={}: norm {}", d, norm(&next));
        }
    }

    #[test]
    fn test_radial_gradient_is_noop() {
        let mut rng = RngKey::new(1).to_rng();
        let x = array![0.0, 1.0, 0.0];
        // Purely radial: no tangent component at all.
        let g = array![0.0, 2.5, 0.0];
        let step = GeodesicStepper::new(0.1, 0.5)
            .step_detailed(&x, &g, &mut rng)
            .unwrap();
        assert!(step.skipped);
        assert_eq!(step.point, x);
        assert_eq!(step.angle, 0.0);
    }

    #[test]
    fn test_zero_gradient_is_exact_noop() {
        let mut rng = RngKey::new(2).to_rng();
        let x = sample_unit_vector(5, &mut rng).unwrap();
        let next = geodesic_step(&x, &Array1::zeros(5), 0.1, 0.5, &mut rng).unwrap();
        assert_eq!(next, x);
    }

    #[test]
    fn test_one_dimension_is_noop() {
        let mut rng = RngKey::new(2).to_rng();
        let x = array![1.0];
        let next = geodesic_step(&x, &array![-4.0], 0.1, 0.5, &mut rng).unwrap();
        assert_eq!(next, x);
    }

    #[test]
    fn test_angle_is_clamped() {
        let mut rng = RngKey::new(3).to_rng();
        let x = array![1.0, 0.0];
        let g = array![0.0, 100.0];
        let max_angle = PI / 20.0;

        let step = GeodesicStepper::new(0.1, max_angle)
            .step_detailed(&x, &g, &mut rng)
            .unwrap();
        assert!((step.angle - max_angle).abs() < 1e-15);
        assert!((step.tangent_norm - 100.0).abs() < 1e-9);

        // Chord length of an arc of `max_angle` on the unit circle.
        let chord = 2.0 * (max_angle / 2.0).sin();
        assert!((distance(&x, &step.point) - chord).abs() < 1e-12);
    }

    #[test]
    fn test_step_moves_against_gradient() {
        let mut rng = RngKey::new(4).to_rng();
        let x = array![1.0, 0.0, 0.0];
        let g = array![0.0, 1.0, 0.0];
        let next = geodesic_step(&x, &g, 0.1, 1.0, &mut rng).unwrap();

        // angle = 0.1, direction = -y
        assert!((next[0] - 0.1f64.cos()).abs() < 1e-12);
        assert!((next[1] + 0.1f64.sin()).abs() < 1e-12);
        assert!(next[2].abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_gradient_rejected() {
        let mut rng = RngKey::new(6).to_rng();
        let stepper = GeodesicStepper::new(0.1, 0.5);
        let x = array![1.0, 0.0, 0.0];

        for g in [array![0.0, f64::NAN, 0.0], array![0.0, f64::INFINITY, 1.0]] {
            let err = stepper.step(&x, &g, &mut rng).unwrap_err();
            assert!(
                matches!(err, SpackError::InvalidParameter { name: "gradient", .. }),
                "unexpected error {:?}",
                err
            );
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut rng = RngKey::new(5).to_rng();
        let err = geodesic_step(&array![1.0, 0.0], &array![1.0], 0.1, 0.5, &mut rng).unwrap_err();
        assert!(matches!(err, SpackError::DimensionMismatch { .. }));
    }
}
