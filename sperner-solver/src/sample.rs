//! Random legal colorings, for a feel of the typical polychrome count.

use std::collections::BTreeMap;

use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sperner_core::{polychrome_count, ConstraintTable, PolychromeBounds, Triangulation};

/// Histogram of polychrome counts over random complete colorings.
#[derive(Debug, Default)]
pub struct Sample {
    pub counts: BTreeMap<u32, usize>,
    pub total: usize,
}

impl Sample {
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: usize = self
            .counts
            .iter()
            .map(|(&count, &n)| count as usize * n)
            .sum();
        sum as f64 / self.total as f64
    }

    /// Fraction of samples strictly above `threshold`.
    pub fn above(&self, threshold: f64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let hits: usize = self
            .counts
            .iter()
            .filter(|&(&count, _)| f64::from(count) > threshold)
            .map(|(_, &n)| n)
            .sum();
        hits as f64 / self.total as f64
    }
}

/// Draw `samples` random legal colorings and check each against Sperner's
/// lemma and the level's bounds.
pub fn run(level: u32, samples: usize, seed: u64, bounds: PolychromeBounds) -> Result<Sample> {
    let triangulation = Triangulation::new(level)?;
    let constraints = ConstraintTable::new(&triangulation);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sample = Sample::default();

    for _ in 0..samples {
        let coloring: Vec<_> = constraints
            .random_coloring(&mut rng)
            .into_iter()
            .map(Some)
            .collect();
        let count = polychrome_count(&coloring, triangulation.triangles()) as u32;
        ensure!(count % 2 == 1, "level {}: even polychrome count {}", level, count);
        ensure!(
            bounds.contains(count),
            "level {}: count {} outside {:?}",
            level,
            count,
            bounds
        );
        *sample.counts.entry(count).or_default() += 1;
        sample.total += 1;
    }
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_two_always_one() {
        let bounds = PolychromeBounds { min: 1, max: 1 };
        let sample = run(2, 50, 7, bounds).unwrap();
        assert_eq!(sample.total, 50);
        assert_eq!(sample.counts.get(&1), Some(&50));
        assert_eq!(sample.mean(), 1.0);
        assert_eq!(sample.above(1.0), 0.0);
    }

    #[test]
    fn test_counts_are_odd() {
        let bounds = PolychromeBounds::for_level(4).unwrap();
        let sample = run(4, 200, 42, bounds).unwrap();
        assert!(sample.counts.keys().all(|c| c % 2 == 1));
        assert_eq!(sample.counts.values().sum::<usize>(), 200);
    }

    #[test]
    fn test_bounds_violation_reported() {
        // No coloring of level 3 can reach 99 polychrome faces.
        let bounds = PolychromeBounds { min: 99, max: 99 };
        assert!(run(3, 1, 0, bounds).is_err());
    }

    #[test]
    fn test_empty_sample() {
        let sample = Sample::default();
        assert_eq!(sample.mean(), 0.0);
        assert_eq!(sample.above(0.0), 0.0);
    }
}
