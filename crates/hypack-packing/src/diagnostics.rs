//! Separation diagnostics for point configurations.

use hypack_core::{distance, norm, Gradient, Point};
use serde::{Deserialize, Serialize};

/// Pairs closer than `min_distance - OVERLAP_EPSILON` count as overlaps.
pub const OVERLAP_EPSILON: f64 = 1e-10;

/// Pairwise separation statistics over all C(N, 2) pairs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairStats {
    /// Smallest pairwise distance (infinite for fewer than two points)
    pub min_distance: f64,
    /// Pairs with `dist < min_distance - OVERLAP_EPSILON`
    pub overlaps: usize,
    /// Sum of `max(0, min_distance - dist)` over all pairs
    pub total_violation: f64,
}

/// Snapshot of a packing run at one round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackingReport {
    /// Rounds completed when the snapshot was taken
    pub round: usize,
    /// Smallest pairwise distance
    pub min_distance: f64,
    /// Number of overlapping pairs
    pub overlaps: usize,
    /// Total violation depth
    pub total_violation: f64,
    /// Largest momentum-blended gradient norm of the last round
    pub max_gradient_norm: Option<f64>,
}

impl PackingReport {
    /// Build a report from pair statistics.
    pub fn new(round: usize, stats: PairStats, max_gradient_norm: Option<f64>) -> Self {
        Self {
            round,
            min_distance: stats.min_distance,
            overlaps: stats.overlaps,
            total_violation: stats.total_violation,
            max_gradient_norm,
        }
    }

    /// True when no pair overlaps.
    pub fn is_separated(&self) -> bool {
        self.overlaps == 0
    }

    /// `min dist: <8 decimals>, overlaps: <n>`
    pub fn summary(&self) -> String {
        format!(
            "min dist: {:.8}, overlaps: {}",
            self.min_distance, self.overlaps
        )
    }

    /// Summary prefixed with the right-aligned round number.
    pub fn progress_line(&self) -> String {
        format!("{:5}:  {}", self.round, self.summary())
    }
}

/// Compute separation statistics for `points` against a target distance.
///
/// This is O(N²) in the number of points.
pub fn pair_statistics(points: &[Point], min_distance: f64) -> PairStats {
    let threshold = min_distance - OVERLAP_EPSILON;
    let mut stats = PairStats {
        min_distance: f64::INFINITY,
        overlaps: 0,
        total_violation: 0.0,
    };

    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let dist = distance(&points[i], &points[j]);
            stats.min_distance = stats.min_distance.min(dist);
            if dist < threshold {
                stats.overlaps += 1;
            }
            stats.total_violation += (min_distance - dist).max(0.0);
        }
    }

    stats
}

/// Minimum pairwise distance and overlap count.
pub fn min_distance_and_overlaps(points: &[Point], min_distance: f64) -> (f64, usize) {
    let stats = pair_statistics(points, min_distance);
    (stats.min_distance, stats.overlaps)
}

/// Largest Euclidean norm among `gradients`, or `None` if empty.
pub fn max_gradient_norm(gradients: &[Gradient]) -> Option<f64> {
    gradients.iter().map(norm).reduce(f64::max)
}
