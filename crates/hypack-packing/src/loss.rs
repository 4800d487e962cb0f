//! Pairwise repulsion losses.
//!
//! A [`RepulsionLoss`] describes every pair interaction by a scalar
//! coefficient on the separation vector: a point at distance `dist` from
//! `other` receives `coefficient(dist) * (point - other)`. Descending the
//! resulting gradient pushes overlapping points apart.

use hypack_core::{distance, Gradient, Point};
use ndarray::Array1;

/// Default target separation.
pub const DEFAULT_MIN_DISTANCE: f64 = 1.0;

/// Trait for pairwise repulsion losses.
///
/// Implementations must be `Send + Sync` so the optimizer can evaluate
/// per-point gradients in parallel.
pub trait RepulsionLoss: Send + Sync {
    /// Coefficient on `(point - other)` for a pair at distance `dist`.
    ///
    /// Zero means the pair contributes nothing.
    fn coefficient(&self, dist: f64) -> f64;

    /// Ambient gradient for `point` against `others`.
    ///
    /// `others` must not contain `point` itself. The result is a plain sum
    /// over pairs and does not depend on the order of `others`.
    fn gradient<'a, I>(&self, point: &Point, others: I) -> Gradient
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut grad = Array1::zeros(point.len());
        for other in others {
            let coeff = self.coefficient(distance(point, other));
            if coeff != 0.0 {
                grad.scaled_add(coeff, &(point - other));
            }
        }
        grad
    }
}

/// One-sided hinge repulsion.
///
/// Pairs at or beyond `min_distance` are free. Closer pairs contribute
/// `-(min_distance - dist)^power * (point - other)`; with `power = 1` this is
/// `(dist - min_distance) * (point - other)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HingeRepulsion {
    /// Separation at which the penalty vanishes
    pub min_distance: f64,
    /// Exponent applied to the violation depth
    pub power: u32,
}

impl HingeRepulsion {
    /// Linear hinge at `min_distance`.
    pub const fn new(min_distance: f64) -> Self {
        Self {
            min_distance,
            power: 1,
        }
    }

    /// Set the exponent applied to the violation depth.
    pub const fn with_power(mut self, power: u32) -> Self {
        self.power = power;
        self
    }

    /// How far a pair at `dist` falls short of `min_distance` (0 if it doesn't).
    pub fn violation(&self, dist: f64) -> f64 {
        (self.min_distance - dist).max(0.0)
    }
}

impl Default for HingeRepulsion {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DISTANCE)
    }
}

impl RepulsionLoss for HingeRepulsion {
    fn coefficient(&self, dist: f64) -> f64 {
        if dist >= self.min_distance {
            return 0.0;
        }
        let depth = self.min_distance - dist;
        match i32::try_from(self.power) {
            Ok(power) => -depth.powi(power),
            Err(_) => -depth.powf(f64::from(self.power)),
        }
    }
}

/// Linear hinge gradient of `point` against `others`.
pub fn repulsion_gradient<'a, I>(point: &Point, others: I, min_distance: f64) -> Gradient
where
    I: IntoIterator<Item = &'a Point>,
{
    HingeRepulsion::new(min_distance).gradient(point, others)
}
