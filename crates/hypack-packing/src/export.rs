//! Saving packing results to disk.
//!
//! Point sets go to NPZ so they load directly with `numpy.load`; report
//! histories go to JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use hypack_core::Point;
use ndarray::{Array2, Axis};
use ndarray_npy::{NpzReader, NpzWriter};

use crate::diagnostics::PackingReport;

/// Name of the point array inside saved NPZ archives.
pub const POINTS_ARRAY: &str = "points";

/// Stack points into an `[N, d]` array.
pub fn points_to_array(points: &[Point]) -> Result<Array2<f64>> {
    ensure!(!points.is_empty(), "No points to stack");
    let dim = points[0].len();
    ensure!(
        points.iter().all(|p| p.len() == dim),
        "Points have mixed dimensions"
    );

    let views: Vec<_> = points.iter().map(|p| p.view()).collect();
    ndarray::stack(Axis(0), &views).context("Failed to stack points")
}

/// Save `points` as an `[N, d]` f64 array named `points`.
///
/// # Errors
///
/// Returns an error if the points are empty, have mixed dimensions, or the
/// file cannot be written.
pub fn save_points_npz(points: &[Point], path: &Path) -> Result<()> {
    let array = points_to_array(points)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut npz = NpzWriter::new(file);
    npz.add_array(POINTS_ARRAY, &array)
        .context("Failed to write points array")?;
    npz.finish().context("Failed to finish NPZ archive")?;

    log::debug!("Saved {} points to {}", points.len(), path.display());
    Ok(())
}

/// Load points saved by [`save_points_npz`].
pub fn load_points_npz(path: &Path) -> Result<Vec<Point>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut npz = NpzReader::new(BufReader::new(file)).context("Failed to parse NPZ file")?;
    let array: Array2<f64> = npz
        .by_name(&format!("{}.npy", POINTS_ARRAY))
        .context("Missing 'points' array")?;

    Ok(array.outer_iter().map(|row| row.to_owned()).collect())
}

/// Save a report history as pretty-printed JSON.
pub fn save_history_json(reports: &[PackingReport], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), reports)
        .context("Failed to serialize report history")?;
    Ok(())
}

/// Load a report history saved by [`save_history_json`].
pub fn load_history_json(path: &Path) -> Result<Vec<PackingReport>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).context("Failed to parse report history")
}
