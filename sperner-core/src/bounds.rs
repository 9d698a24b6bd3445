//! Extremes of the polychrome count, and the win rule built on them.
//!
//! # Profile DP
//!
//! Vertices are visited in index order. Placing vertex `(r, c)` closes at most
//! two faces, both made of the vertex itself and vertices at most `r + 1`
//! positions back:
//!
//! ```text
//! up   {(r-1,c-1), (r,c-1), (r,c)}   offsets r+1, 1, 0    when c >= 1
//! down {(r,c), (r-1,c-1), (r-1,c)}   offsets 0, r+1, r    when 1 <= c <= r-1
//! ```
//!
//! So the state is the colors of the last `n + 1` vertices (2 bits each,
//! newest in the low bits), mapped to the (min, max) polychrome count of all
//! prefixes ending in that window. The state space is bounded by `3^(n+1)`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintTable;
use crate::error::Result;
use crate::polychrome::{is_polychrome, polychrome_count};
use crate::triangulation::{triangle_count, Triangulation};
use crate::{Color, ColorSet, VertexId};

/// Highest level the profile DP runs on. Its cost grows about 4x per level;
/// level 10 already takes a few hundred milliseconds.
pub const MAX_EXACT_LEVEL: u32 = 10;

/// Smallest and largest polychrome count over a set of complete colorings.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct PolychromeBounds {
    pub min: u32,
    pub max: u32,
}

impl PolychromeBounds {
    /// Bounds over every complete legal coloring of `level`.
    pub fn for_level(level: u32) -> Result<PolychromeBounds> {
        let triangulation = Triangulation::new(level)?;
        let constraints = ConstraintTable::new(&triangulation);
        Ok(PolychromeBounds::reachable(
            &triangulation,
            &constraints,
            &constraints.initial_coloring(),
        ))
    }

    /// Bounds over every legal completion of a partial coloring.
    ///
    /// Colored vertices keep their color; blank ones range over their legal
    /// set. Levels above `MAX_EXACT_LEVEL` get the trivial range `[1, n²]`.
    pub fn reachable(
        triangulation: &Triangulation,
        constraints: &ConstraintTable,
        coloring: &[Option<Color>],
    ) -> PolychromeBounds {
        let level = triangulation.level();
        if level > MAX_EXACT_LEVEL {
            return PolychromeBounds {
                min: 1,
                max: triangle_count(level) as u32,
            };
        }

        let mask = (1u64 << (2 * (level + 1))) - 1;

        let mut frontier: HashMap<u64, (u32, u32)> = HashMap::from([(0, (0, 0))]);
        for vertex in triangulation.vertices() {
            let choices = match coloring.get(vertex.id.0).copied().flatten() {
                Some(color) => ColorSet::single(color),
                None => constraints.allowed(vertex.id),
            };

            let mut next = HashMap::with_capacity(frontier.len() * choices.len());
            for (&window, &(lo, hi)) in &frontier {
                for color in choices.iter() {
                    let gained = closed_polychrome(window, color, vertex.row, vertex.col);
                    let key = ((window << 2) | color as u64) & mask;
                    next.entry(key)
                        .and_modify(|(min, max): &mut (u32, u32)| {
                            *min = (*min).min(lo + gained);
                            *max = (*max).max(hi + gained);
                        })
                        .or_insert((lo + gained, hi + gained));
                }
            }
            frontier = next;
        }

        frontier.values().fold(
            PolychromeBounds {
                min: u32::MAX,
                max: 0,
            },
            |acc, &(lo, hi)| PolychromeBounds {
                min: acc.min.min(lo),
                max: acc.max.max(hi),
            },
        )
    }

    /// Halfway between `min` and `max`.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        (f64::from(self.min) + f64::from(self.max)) / 2.0
    }

    #[inline]
    pub fn contains(&self, count: u32) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Color `offset` positions back in the window (1 = previous vertex).
#[inline]
fn window_color(window: u64, offset: u32) -> Option<Color> {
    Color::from_index(((window >> (2 * (offset - 1))) & 0b11) as usize)
}

/// Number of polychrome faces closed by placing `color` at `(row, col)`.
fn closed_polychrome(window: u64, color: Color, row: u32, col: u32) -> u32 {
    if col == 0 {
        return 0;
    }
    let up_left = window_color(window, row + 1);
    let left = window_color(window, 1);
    let mut gained = u32::from(is_polychrome([up_left, left, Some(color)]));
    if col < row {
        let up = window_color(window, row);
        gained += u32::from(is_polychrome([Some(color), up_left, up]));
    }
    gained
}

/// Decides the winner once every vertex is colored.
///
/// The Maximizer wins when the final count is strictly above `threshold`;
/// the Minimizer wins otherwise.
pub trait WinRule {
    fn threshold(&self, bounds: PolychromeBounds) -> f64;

    fn maximizer_wins(&self, count: u32, bounds: PolychromeBounds) -> bool {
        f64::from(count) > self.threshold(bounds)
    }
}

/// Threshold at the midpoint of the level's achievable range:
/// the Maximizer wins iff `2 * count > min + max`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MidpointRule;

impl WinRule for MidpointRule {
    fn threshold(&self, bounds: PolychromeBounds) -> f64 {
        bounds.midpoint()
    }
}

/// A threshold that ignores the level's bounds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FixedThreshold(pub u32);

impl WinRule for FixedThreshold {
    fn threshold(&self, _bounds: PolychromeBounds) -> f64 {
        f64::from(self.0)
    }
}

/// Exhaustive min/max over every legal completion. Exponential; small levels only.
pub fn exhaustive_bounds(
    triangulation: &Triangulation,
    constraints: &ConstraintTable,
    coloring: &[Option<Color>],
) -> PolychromeBounds {
    let mut current: Vec<Option<Color>> = (0..triangulation.vertex_count())
        .map(|i| coloring.get(i).copied().flatten())
        .collect();
    let blanks: Vec<VertexId> = (0..current.len())
        .filter(|&i| current[i].is_none())
        .map(VertexId)
        .collect();

    let mut bounds = PolychromeBounds {
        min: u32::MAX,
        max: 0,
    };
    enumerate(triangulation, constraints, &blanks, &mut current, &mut bounds);
    bounds
}

fn enumerate(
    triangulation: &Triangulation,
    constraints: &ConstraintTable,
    blanks: &[VertexId],
    current: &mut [Option<Color>],
    bounds: &mut PolychromeBounds,
) {
    let Some((&vertex, rest)) = blanks.split_first() else {
        let count = polychrome_count(current, triangulation.triangles()) as u32;
        bounds.min = bounds.min.min(count);
        bounds.max = bounds.max.max(count);
        return;
    };
    for color in constraints.allowed(vertex).iter() {
        current[vertex.0] = Some(color);
        enumerate(triangulation, constraints, rest, current, bounds);
    }
    current[vertex.0] = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(level: u32) -> (Triangulation, ConstraintTable) {
        let tri = Triangulation::new(level).unwrap();
        let constraints = ConstraintTable::new(&tri);
        (tri, constraints)
    }

    #[test]
    fn test_level_one() {
        assert_eq!(
            PolychromeBounds::for_level(1).unwrap(),
            PolychromeBounds { min: 1, max: 1 }
        );
    }

    #[test]
    fn test_level_two_is_forced() {
        // Every legal coloring of level 2 has exactly one polychrome face.
        assert_eq!(
            PolychromeBounds::for_level(2).unwrap(),
            PolychromeBounds { min: 1, max: 1 }
        );
    }

    #[test]
    fn test_dp_matches_exhaustive() {
        for level in 1..=4 {
            let (tri, constraints) = setup(level);
            let start = constraints.initial_coloring();
            let dp = PolychromeBounds::reachable(&tri, &constraints, &start);
            let brute = exhaustive_bounds(&tri, &constraints, &start);
            assert_eq!(dp, brute, "level {}", level);
        }
    }

    #[test]
    fn test_bounds_are_odd_and_ordered() {
        for level in 1..=7 {
            let bounds = PolychromeBounds::for_level(level).unwrap();
            assert!(bounds.min >= 1);
            assert!(bounds.min <= bounds.max);
            assert!(bounds.max <= level * level);
            assert_eq!(bounds.min % 2, 1, "level {}", level);
            assert_eq!(bounds.max % 2, 1, "level {}", level);
        }
    }

    #[test]
    fn test_minimum_is_one() {
        // Red everywhere above the bottom row, Blue along the bottom except the
        // Green corner, leaves a single polychrome face.
        for level in 2..=6 {
            assert_eq!(PolychromeBounds::for_level(level).unwrap().min, 1);
        }
    }

    #[test]
    fn test_large_levels_use_trivial_range() {
        let level = MAX_EXACT_LEVEL + 6;
        assert_eq!(
            PolychromeBounds::for_level(level).unwrap(),
            PolychromeBounds {
                min: 1,
                max: level * level
            }
        );
    }

    #[test]
    fn test_reachable_from_partial() {
        let (tri, constraints) = setup(3);
        let mut coloring = constraints.initial_coloring();
        // Fix the interior vertex and one edge vertex.
        coloring[4] = Some(Color::Green);
        coloring[1] = Some(Color::Blue);
        let dp = PolychromeBounds::reachable(&tri, &constraints, &coloring);
        let brute = exhaustive_bounds(&tri, &constraints, &coloring);
        assert_eq!(dp, brute);

        let full = PolychromeBounds::for_level(3).unwrap();
        assert!(full.min <= dp.min && dp.max <= full.max);
    }

    #[test]
    fn test_reachable_from_complete_coloring() {
        let (tri, constraints) = setup(2);
        let coloring = vec![
            Some(Color::Red),
            Some(Color::Blue),
            Some(Color::Green),
            Some(Color::Blue),
            Some(Color::Blue),
            Some(Color::Green),
        ];
        assert_eq!(
            PolychromeBounds::reachable(&tri, &constraints, &coloring),
            PolychromeBounds { min: 1, max: 1 }
        );
    }

    #[test]
    fn test_midpoint_rule() {
        let bounds = PolychromeBounds { min: 1, max: 9 };
        let rule = MidpointRule;
        assert_eq!(rule.threshold(bounds), 5.0);
        assert!(!rule.maximizer_wins(5, bounds));
        assert!(rule.maximizer_wins(7, bounds));
        assert!(!rule.maximizer_wins(3, bounds));
    }

    #[test]
    fn test_midpoint_rule_degenerate_range() {
        // With min == max the Maximizer cannot exceed the midpoint.
        let bounds = PolychromeBounds { min: 1, max: 1 };
        assert!(!MidpointRule.maximizer_wins(1, bounds));
    }

    #[test]
    fn test_fixed_threshold() {
        let bounds = PolychromeBounds { min: 1, max: 9 };
        assert!(FixedThreshold(2).maximizer_wins(3, bounds));
        assert!(!FixedThreshold(3).maximizer_wins(3, bounds));
    }

    #[test]
    fn test_contains() {
        let bounds = PolychromeBounds { min: 3, max: 7 };
        assert!(bounds.contains(3));
        assert!(bounds.contains(7));
        assert!(!bounds.contains(1));
        assert!(!bounds.contains(9));
    }
}
