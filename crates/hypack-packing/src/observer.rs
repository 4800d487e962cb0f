//! Observers for packing runs.
//!
//! An observer is handed a [`PackingReport`] at round 0, every
//! `report_interval` rounds, and after the final round, and sees the final
//! point set once the run finishes. Observers never influence the run.

use std::io::{self, Stdout, Write};

use hypack_core::{Point, Result};

use crate::diagnostics::PackingReport;

/// Interface for objects that watch a packing run.
pub trait PackingObserver {
    /// Called for each reported round.
    fn on_report(&mut self, report: &PackingReport) -> Result<()>;

    /// Called once after the last round with the final configuration.
    fn on_finish(&mut self, _points: &[Point], _report: &PackingReport) -> Result<()> {
        Ok(())
    }
}

impl<O: PackingObserver + ?Sized> PackingObserver for &mut O {
    fn on_report(&mut self, report: &PackingReport) -> Result<()> {
        (**self).on_report(report)
    }

    fn on_finish(&mut self, points: &[Point], report: &PackingReport) -> Result<()> {
        (**self).on_finish(points, report)
    }
}

/// Fan out to two observers, first `A` then `B`.
impl<A: PackingObserver, B: PackingObserver> PackingObserver for (A, B) {
    fn on_report(&mut self, report: &PackingReport) -> Result<()> {
        self.0.on_report(report)?;
        self.1.on_report(report)
    }

    fn on_finish(&mut self, points: &[Point], report: &PackingReport) -> Result<()> {
        self.0.on_finish(points, report)?;
        self.1.on_finish(points, report)
    }
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl PackingObserver for NullObserver {
    fn on_report(&mut self, _report: &PackingReport) -> Result<()> {
        Ok(())
    }
}

/// Writes progress lines and the final configuration as plain text.
///
/// ```text
/// min dist: 0.01234567, overlaps: 120
///    10:  min dist: 0.41234567, overlaps: 57
///    ...
///
/// Final Results:
///
/// [0.12345678, -0.50000000, ...]
///
/// min dist: 1.00000000, overlaps: 0
/// ```
#[derive(Debug)]
pub struct ConsoleReporter<W: Write = Stdout> {
    out: W,
}

impl ConsoleReporter<Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PackingObserver for ConsoleReporter<W> {
    fn on_report(&mut self, report: &PackingReport) -> Result<()> {
        if report.round == 0 {
            writeln!(self.out, "{}", report.summary())?;
        } else {
            writeln!(self.out, "{}", report.progress_line())?;
        }
        Ok(())
    }

    fn on_finish(&mut self, points: &[Point], report: &PackingReport) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Final Results:")?;
        writeln!(self.out)?;
        for point in points {
            writeln!(self.out, "{}", format_point(point))?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", report.summary())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Sends reports to the `log` facade at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl PackingObserver for LogReporter {
    fn on_report(&mut self, report: &PackingReport) -> Result<()> {
        log::info!(
            "round {}: min dist {:.8}, overlaps {}, violation {:.3e}",
            report.round,
            report.min_distance,
            report.overlaps,
            report.total_violation
        );
        Ok(())
    }
}

/// Records every report it sees.
#[derive(Clone, Debug, Default)]
pub struct HistoryRecorder {
    reports: Vec<PackingReport>,
}

impl HistoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports in the order they arrived.
    pub fn reports(&self) -> &[PackingReport] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<PackingReport> {
        self.reports
    }

    /// First recorded round with no overlaps.
    pub fn first_separated_round(&self) -> Option<usize> {
        self.reports
            .iter()
            .find(|r| r.is_separated())
            .map(|r| r.round)
    }

    /// True if every report from the first separated one onward is separated.
    pub fn stays_separated(&self) -> bool {
        match self.reports.iter().position(|r| r.is_separated()) {
            Some(first) => self.reports[first..].iter().all(|r| r.is_separated()),
            None => false,
        }
    }
}

impl PackingObserver for HistoryRecorder {
    fn on_report(&mut self, report: &PackingReport) -> Result<()> {
        self.reports.push(*report);
        Ok(())
    }
}

/// `[x0, x1, ...]` with eight decimals per coordinate.
pub fn format_point(point: &Point) -> String {
    let coords: Vec<String> = point.iter().map(|x| format!("{:.8}", x)).collect();
    format!("[{}]", coords.join(", "))
}
