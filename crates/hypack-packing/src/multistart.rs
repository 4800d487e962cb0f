//! Repeated packing from independent random starts.
//!
//! Packing is a local search, and many starts stall in a jammed configuration
//! with a handful of pairs creeping toward the target distance. Restarting
//! from fresh seeds is the cheap way around that.

use hypack_core::{Point, Result, RngKey, SpackError};

use crate::config::PackingConfig;
use crate::diagnostics::PackingReport;
use crate::observer::HistoryRecorder;
use crate::optimizer::PackingOptimizer;

/// Best configuration found across several starts.
#[derive(Clone, Debug)]
pub struct MultiStartOutcome {
    /// Final points of the winning start
    pub points: Vec<Point>,
    /// Final report of the winning start
    pub report: PackingReport,
    /// Every report recorded during the winning start
    pub history: Vec<PackingReport>,
    /// Index of the winning start
    pub best_start: usize,
    /// Starts actually run (fewer than requested if one separated early)
    pub starts_run: usize,
}

/// Run up to `n_starts` independent packings and keep the best.
///
/// Start `k` uses the `k`-th key of `key.split(n_starts)`. A start wins over
/// the incumbent with fewer overlaps, or equal overlaps and a larger minimum
/// distance. The search stops at the first start that ends with no overlaps.
pub fn pack_multistart(
    config: &PackingConfig,
    key: RngKey,
    n_starts: usize,
) -> Result<MultiStartOutcome> {
    if n_starts == 0 {
        return Err(SpackError::invalid_parameter("n_starts", "must be at least 1"));
    }
    config.validate()?;

    let keys = key.split(n_starts);
    let mut best = run_start(config, keys[0], 0)?;
    let mut starts_run = 1;

    for (start, start_key) in keys.into_iter().enumerate().skip(1) {
        if best.report.is_separated() {
            break;
        }
        starts_run += 1;
        let candidate = run_start(config, start_key, start)?;
        if is_better(&candidate.report, &best.report) {
            best = candidate;
        }
    }

    best.starts_run = starts_run;
    Ok(best)
}

/// One full optimization from `key`, recorded as a single-start outcome.
fn run_start(config: &PackingConfig, key: RngKey, start: usize) -> Result<MultiStartOutcome> {
    let mut optimizer = PackingOptimizer::new(config.clone(), key)?;
    let mut history = HistoryRecorder::new();
    let report = optimizer.run_with_observer(&mut history)?;

    if report.is_separated() {
        log::info!("start {} separated all pairs", start);
    } else {
        log::warn!(
            "start {} ended with {} overlaps (min dist {:.8})",
            start,
            report.overlaps,
            report.min_distance
        );
    }

    Ok(MultiStartOutcome {
        points: optimizer.into_points(),
        report,
        history: history.into_reports(),
        best_start: start,
        starts_run: 1,
    })
}

fn is_better(candidate: &PackingReport, incumbent: &PackingReport) -> bool {
    candidate.overlaps < incumbent.overlaps
        || (candidate.overlaps == incumbent.overlaps
            && candidate.min_distance > incumbent.min_distance)
}
