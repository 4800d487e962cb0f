//! # hypack-packing
//!
//! Spreads N points over the unit sphere S^(d-1) so that every pair ends up at
//! least a target distance apart. Each round computes hinge repulsion
//! gradients against the pre-round configuration, blends them with momentum,
//! and moves every point along a great circle.
//!
//! ## Quick Start
//!
//! ```rust
//! use hypack_core::RngKey;
//! use hypack_packing::{pack_spheres_with_observer, HistoryRecorder, PackingConfig};
//!
//! let config = PackingConfig::new(3, 4)
//!     .with_rounds(300)
//!     .with_report_interval(50);
//!
//! let mut history = HistoryRecorder::new();
//! let points = pack_spheres_with_observer(&config, RngKey::new(7), &mut history).unwrap();
//!
//! assert_eq!(points.len(), 4);
//! assert_eq!(history.reports().last().unwrap().round, 300);
//! ```
//!
//! For hard instances, [`pack_multistart`] retries from independent seeds
//! until one start separates every pair.

pub mod config;
pub mod diagnostics;
pub mod export;
pub mod loss;
pub mod multistart;
pub mod observer;
pub mod optimizer;

pub use config::PackingConfig;
pub use diagnostics::{
    max_gradient_norm, min_distance_and_overlaps, pair_statistics, PackingReport, PairStats,
    OVERLAP_EPSILON,
};
pub use export::{load_history_json, load_points_npz, save_history_json, save_points_npz};
pub use loss::{repulsion_gradient, HingeRepulsion, RepulsionLoss, DEFAULT_MIN_DISTANCE};
pub use multistart::{pack_multistart, MultiStartOutcome};
pub use observer::{
    format_point, ConsoleReporter, HistoryRecorder, LogReporter, NullObserver, PackingObserver,
};
pub use optimizer::{pack_spheres, pack_spheres_with_observer, PackingOptimizer};
