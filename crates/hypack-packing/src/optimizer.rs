//! Momentum-driven geodesic descent over a whole point set.
//!
//! Each round runs in two phases separated by a barrier:
//!
//! 1. **Gradients**: every point's repulsion gradient is computed against the
//!    pre-round configuration and blended with its momentum,
//!    `grad_i = raw_i + momentum * prev_i`. The blend is stored as the new
//!    momentum without any `(1 - momentum)` damping.
//! 2. **Steps**: every point takes one geodesic step along its blended
//!    gradient, and the resulting points replace the set in one go.
//!
//! No point ever sees another point's updated position within a round.

use hypack_core::{
    normalized, sample_unit_vector, Gradient, Point, Result, RngKey, SpackError,
};
use hypack_manifold::{GeodesicStepper, MIN_BASE_NORM};
use ndarray::Array1;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::PackingConfig;
use crate::diagnostics::{max_gradient_norm, pair_statistics, PackingReport};
use crate::loss::{HingeRepulsion, RepulsionLoss};
use crate::observer::{ConsoleReporter, NullObserver, PackingObserver};

/// Optimizer that pushes N points on the unit sphere apart.
///
/// # Example
///
/// ```rust
/// use hypack_core::RngKey;
/// use hypack_packing::{PackingConfig, PackingOptimizer};
///
/// let config = PackingConfig::new(3, 4).with_rounds(200);
/// let mut optimizer = PackingOptimizer::new(config, RngKey::new(42)).unwrap();
/// let report = optimizer.run().unwrap();
/// assert_eq!(report.round, 200);
/// ```
pub struct PackingOptimizer<L: RepulsionLoss = HingeRepulsion> {
    config: PackingConfig,
    loss: L,
    stepper: GeodesicStepper,
    points: Vec<Point>,
    momentum: Vec<Gradient>,
    pinned: Vec<bool>,
    rng: ChaCha8Rng,
    round: usize,
    last_gradient_norm: Option<f64>,
}

impl PackingOptimizer<HingeRepulsion> {
    /// Random initial configuration with the hinge loss from `config`.
    ///
    /// Points are drawn with [`sample_unit_vector`] from the generator for
    /// `key`, which then drives every tangent basis of the run.
    pub fn new(config: PackingConfig, key: RngKey) -> Result<Self> {
        let loss = config.loss();
        Self::with_loss(config, loss, key)
    }
}

impl<L: RepulsionLoss> PackingOptimizer<L> {
    /// Random initial configuration with a custom loss.
    pub fn with_loss(config: PackingConfig, loss: L, key: RngKey) -> Result<Self> {
        config.validate()?;

        let mut rng = key.to_rng();
        let points = (0..config.num_points)
            .map(|_| sample_unit_vector(config.dimensions, &mut rng))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::assemble(config, loss, points, rng))
    }

    /// Start from caller-supplied points.
    ///
    /// `config.dimensions` and `config.num_points` are taken from `points`.
    /// Each point is normalized onto the sphere.
    ///
    /// # Errors
    ///
    /// Fails for fewer than two points, mixed dimensions, zero vectors, or an
    /// invalid configuration.
    pub fn from_points(
        mut config: PackingConfig,
        loss: L,
        points: Vec<Point>,
        key: RngKey,
    ) -> Result<Self> {
        if points.len() < 2 {
            return Err(SpackError::TooFewPoints {
                count: points.len(),
            });
        }

        let dimension = points[0].len();
        let points = points
            .iter()
            .map(|p| {
                if p.len() != dimension {
                    return Err(SpackError::DimensionMismatch {
                        expected: dimension,
                        actual: p.len(),
                    });
                }
                normalized(p, MIN_BASE_NORM).ok_or(SpackError::ZeroVector {
                    norm: hypack_core::norm(p),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        config.dimensions = dimension;
        config.num_points = points.len();
        config.validate()?;

        Ok(Self::assemble(config, loss, points, key.to_rng()))
    }

    fn assemble(config: PackingConfig, loss: L, points: Vec<Point>, rng: ChaCha8Rng) -> Self {
        let n = points.len();
        let d = config.dimensions;
        Self {
            stepper: config.stepper(),
            loss,
            momentum: vec![Array1::zeros(d); n],
            pinned: vec![false; n],
            points,
            rng,
            round: 0,
            last_gradient_norm: None,
            config,
        }
    }

    /// Hold point `index` in place.
    ///
    /// A pinned point still repels the others but never moves, and its
    /// momentum stays zero.
    pub fn pin(&mut self, index: usize) -> Result<()> {
        let len = self.points.len();
        let slot = self
            .pinned
            .get_mut(index)
            .ok_or(SpackError::IndexOutOfRange { index, len })?;
        *slot = true;
        self.momentum[index].fill(0.0);
        Ok(())
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.pinned.get(index).copied().unwrap_or(false)
    }

    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    pub fn loss(&self) -> &L {
        &self.loss
    }

    /// Current configuration.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Momentum carried into the next round, one vector per point.
    pub fn momentum(&self) -> &[Gradient] {
        &self.momentum
    }

    /// Rounds completed so far.
    pub fn round(&self) -> usize {
        self.round
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Diagnostics for the current configuration.
    pub fn report(&self) -> PackingReport {
        let stats = pair_statistics(&self.points, self.config.min_distance);
        PackingReport::new(self.round, stats, self.last_gradient_norm)
    }

    /// Raw repulsion gradients of every point against the current set.
    pub fn raw_gradients(&self) -> Vec<Gradient> {
        let points = &self.points;
        let loss = &self.loss;
        let gradient_of = |i: usize| {
            let others = points
                .iter()
                .enumerate()
                .filter(move |(j, _)| *j != i)
                .map(|(_, p)| p);
            loss.gradient(&points[i], others)
        };

        if self.config.parallel {
            (0..points.len()).into_par_iter().map(gradient_of).collect()
        } else {
            (0..points.len()).map(gradient_of).collect()
        }
    }

    /// Advance the configuration by one round.
    ///
    /// On error the configuration and momentum are left as they were.
    pub fn step_round(&mut self) -> Result<()> {
        let raw = self.raw_gradients();

        let factor = self.config.momentum;
        let blended: Vec<Gradient> = raw
            .into_iter()
            .zip(&self.momentum)
            .zip(&self.pinned)
            .map(|((mut grad, prev), &pinned)| {
                if pinned {
                    grad.fill(0.0);
                } else {
                    grad.scaled_add(factor, prev);
                }
                grad
            })
            .collect();

        let mut next = Vec::with_capacity(self.points.len());
        for ((point, grad), &pinned) in self.points.iter().zip(&blended).zip(&self.pinned) {
            if pinned {
                next.push(point.clone());
            } else {
                next.push(self.stepper.step(point, grad, &mut self.rng)?);
            }
        }

        self.last_gradient_norm = max_gradient_norm(&blended);
        self.points = next;
        self.momentum = blended;
        self.round += 1;
        Ok(())
    }

    /// Run `config.n_rounds` rounds without observing.
    pub fn run(&mut self) -> Result<PackingReport> {
        self.run_with_observer(&mut NullObserver)
    }

    /// Run `config.n_rounds` rounds, reporting to `observer`.
    ///
    /// The observer sees the starting configuration, every
    /// `report_interval`-th round, and the last round, then
    /// [`on_finish`](PackingObserver::on_finish) with the final points.
    pub fn run_with_observer<O: PackingObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> Result<PackingReport> {
        log::info!(
            "packing {} points in R^{} for {} rounds (lr={}, max_angle={:.4}, momentum={})",
            self.points.len(),
            self.config.dimensions,
            self.config.n_rounds,
            self.config.learning_rate,
            self.config.max_angle,
            self.config.momentum
        );

        observer.on_report(&self.report())?;

        for k in 1..=self.config.n_rounds {
            self.step_round()?;
            if self.config.should_report(k) {
                let report = self.report();
                log::debug!("{}", report.progress_line());
                observer.on_report(&report)?;
            }
        }

        let report = self.report();
        observer.on_finish(&self.points, &report)?;
        log::info!(
            "finished after {} rounds: {}",
            report.round,
            report.summary()
        );
        Ok(report)
    }
}

/// Pack `config.num_points` points, printing progress to stdout.
///
/// Returns the final configuration.
pub fn pack_spheres(config: &PackingConfig, key: RngKey) -> Result<Vec<Point>> {
    pack_spheres_with_observer(config, key, &mut ConsoleReporter::stdout())
}

/// Pack `config.num_points` points, reporting to `observer`.
pub fn pack_spheres_with_observer<O: PackingObserver + ?Sized>(
    config: &PackingConfig,
    key: RngKey,
    observer: &mut O,
) -> Result<Vec<Point>> {
    let mut optimizer = PackingOptimizer::new(config.clone(), key)?;
    optimizer.run_with_observer(observer)?;
    Ok(optimizer.into_points())
}
