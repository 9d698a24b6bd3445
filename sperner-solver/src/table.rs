//! Per-level bounds table and the exhaustive cross-check.

use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use sperner_core::bounds::{exhaustive_bounds, MAX_EXACT_LEVEL};
use sperner_core::{ConstraintTable, MidpointRule, PolychromeBounds, Triangulation, WinRule};
use tracing::debug;

/// One row of the bounds table.
#[derive(Debug, Clone)]
pub struct LevelRow {
    pub level: u32,
    pub vertices: usize,
    pub triangles: usize,
    pub bounds: PolychromeBounds,
    pub threshold: f64,
    /// False when the level is past the DP and `bounds` is the trivial range.
    pub exact: bool,
    pub elapsed: Duration,
}

impl LevelRow {
    pub fn compute(level: u32) -> Result<LevelRow> {
        let start = Instant::now();
        let triangulation = Triangulation::new(level)?;
        let constraints = ConstraintTable::new(&triangulation);
        let bounds = PolychromeBounds::reachable(
            &triangulation,
            &constraints,
            &constraints.initial_coloring(),
        );
        let elapsed = start.elapsed();
        debug!(level, ?bounds, ?elapsed, "bounds computed");

        Ok(LevelRow {
            level,
            vertices: triangulation.vertex_count(),
            triangles: triangulation.triangles().len(),
            bounds,
            threshold: MidpointRule.threshold(bounds),
            exact: level <= MAX_EXACT_LEVEL,
            elapsed,
        })
    }

    /// Whether the Minimizer wins every game at this level.
    pub fn forced(&self) -> bool {
        self.bounds.min == self.bounds.max
    }
}

pub fn print_header() {
    println!(
        "{:>5} {:>8} {:>9} {:>5} {:>5} {:>9} {:>10}",
        "level", "vertices", "triangles", "min", "max", "threshold", "time"
    );
}

pub fn print_row(row: &LevelRow) {
    println!(
        "{:>5} {:>8} {:>9} {:>5} {:>5} {:>9.1} {:>9.3}s{}",
        row.level,
        row.vertices,
        row.triangles,
        row.bounds.min,
        row.bounds.max,
        row.threshold,
        row.elapsed.as_secs_f64(),
        if !row.exact {
            "  (trivial range)"
        } else if row.forced() {
            "  (forced)"
        } else {
            ""
        }
    );
}

/// Compare the dynamic program against brute-force enumeration.
pub fn verify(level: u32) -> Result<PolychromeBounds> {
    let triangulation = Triangulation::new(level)?;
    let constraints = ConstraintTable::new(&triangulation);
    let start = constraints.initial_coloring();

    let dp = PolychromeBounds::reachable(&triangulation, &constraints, &start);
    let brute = exhaustive_bounds(&triangulation, &constraints, &start);
    ensure!(
        dp == brute,
        "level {}: dynamic program gave {:?}, enumeration gave {:?}",
        level,
        dp,
        brute
    );
    Ok(dp)
}
