//! Configuration for packing runs.

use std::f64::consts::PI;

use hypack_core::{Result, SpackError};
use hypack_manifold::{GeodesicStepper, DEFAULT_MIN_NORM};
use serde::{Deserialize, Serialize};

use crate::loss::{HingeRepulsion, DEFAULT_MIN_DISTANCE};

/// Hyperparameters for a packing run.
///
/// Built with [`PackingConfig::new`] and refined with the `with_*` setters.
/// Call [`validate`](Self::validate) (done automatically by the optimizer)
/// before use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackingConfig {
    /// Ambient dimension d (points live on S^(d-1))
    pub dimensions: usize,
    /// Number of points N
    pub num_points: usize,
    /// Target minimum pairwise distance
    pub min_distance: f64,
    /// Exponent of the hinge violation in the pair gradient
    pub loss_power: u32,
    /// Step angle per unit of tangent gradient norm
    pub learning_rate: f64,
    /// Cap on the per-round step angle (radians)
    pub max_angle: f64,
    /// Momentum carry-over factor (no decay applied to the new gradient)
    pub momentum: f64,
    /// Number of rounds to run
    pub n_rounds: usize,
    /// Rounds between diagnostic reports (0 = only first and last)
    pub report_interval: usize,
    /// Tangent gradients below this norm leave a point in place
    pub min_step_norm: f64,
    /// Compute per-point gradients on the rayon pool
    pub parallel: bool,
}

impl PackingConfig {
    /// Configuration for `num_points` points in R^`dimensions` with default
    /// hyperparameters (learning rate 0.1, max angle π/20, momentum 0.9,
    /// 50 rounds, report every 10).
    pub fn new(dimensions: usize, num_points: usize) -> Self {
        Self {
            dimensions,
            num_points,
            min_distance: DEFAULT_MIN_DISTANCE,
            loss_power: 1,
            learning_rate: 0.1,
            max_angle: PI / 20.0,
            momentum: 0.9,
            n_rounds: 50,
            report_interval: 10,
            min_step_norm: DEFAULT_MIN_NORM,
            parallel: false,
        }
    }

    /// Set the target minimum pairwise distance.
    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Set the hinge exponent.
    pub fn with_loss_power(mut self, power: u32) -> Self {
        self.loss_power = power;
        self
    }

    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the maximum step angle.
    pub fn with_max_angle(mut self, max_angle: f64) -> Self {
        self.max_angle = max_angle;
        self
    }

    /// Set the momentum factor.
    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Set the number of rounds.
    pub fn with_rounds(mut self, n_rounds: usize) -> Self {
        self.n_rounds = n_rounds;
        self
    }

    /// Set the report interval.
    pub fn with_report_interval(mut self, report_interval: usize) -> Self {
        self.report_interval = report_interval;
        self
    }

    /// Set the minimum tangent gradient norm.
    pub fn with_min_step_norm(mut self, min_step_norm: f64) -> Self {
        self.min_step_norm = min_step_norm;
        self
    }

    /// Enable or disable the parallel gradient phase.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check every field against its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions < 1 {
            return Err(SpackError::InvalidDimension {
                dimension: self.dimensions,
            });
        }
        if self.num_points < 2 {
            return Err(SpackError::TooFewPoints {
                count: self.num_points,
            });
        }
        if !(self.min_distance.is_finite() && self.min_distance > 0.0) {
            return Err(SpackError::invalid_parameter(
                "min_distance",
                format!("must be positive and finite, got {}", self.min_distance),
            ));
        }
        if self.loss_power == 0 {
            return Err(SpackError::invalid_parameter("loss_power", "must be at least 1"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate >= 0.0) {
            return Err(SpackError::invalid_parameter(
                "learning_rate",
                format!("must be non-negative and finite, got {}", self.learning_rate),
            ));
        }
        if !(self.max_angle.is_finite() && self.max_angle > 0.0) {
            return Err(SpackError::invalid_parameter(
                "max_angle",
                format!("must be positive and finite, got {}", self.max_angle),
            ));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(SpackError::invalid_parameter(
                "momentum",
                format!("must be in [0, 1), got {}", self.momentum),
            ));
        }
        if !(self.min_step_norm.is_finite() && self.min_step_norm >= 0.0) {
            return Err(SpackError::invalid_parameter(
                "min_step_norm",
                format!("must be non-negative and finite, got {}", self.min_step_norm),
            ));
        }
        Ok(())
    }

    /// The geodesic stepper described by this configuration.
    pub fn stepper(&self) -> GeodesicStepper {
        GeodesicStepper::new(self.learning_rate, self.max_angle).with_min_norm(self.min_step_norm)
    }

    /// The hinge loss described by this configuration.
    pub fn loss(&self) -> HingeRepulsion {
        HingeRepulsion::new(self.min_distance).with_power(self.loss_power)
    }

    /// Whether round `k` (1-based, relative to the start of a run) is reported.
    pub fn should_report(&self, k: usize) -> bool {
        k == self.n_rounds || (self.report_interval > 0 && k % self.report_interval == 0)
    }
}
