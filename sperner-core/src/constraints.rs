//! Sperner coloring constraints: which colors each vertex may take.
//!
//! The table is built once per level and indexed by vertex id.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::triangulation::Triangulation;
use crate::{Color, ColorSet, VertexId};

/// Where a vertex sits relative to the master triangle's boundary.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryClass {
    Apex,
    BottomLeft,
    BottomRight,
    /// Apex to bottom-left.
    LeftEdge,
    /// Apex to bottom-right.
    RightEdge,
    /// Bottom-left to bottom-right.
    BottomEdge,
    Interior,
}

impl BoundaryClass {
    /// Classify the vertex at `(row, col)` of a level-`level` grid.
    pub fn classify(row: u32, col: u32, level: u32) -> BoundaryClass {
        debug_assert!(row <= level && col <= row);
        if row == 0 {
            BoundaryClass::Apex
        } else if row == level {
            if col == 0 {
                BoundaryClass::BottomLeft
            } else if col == level {
                BoundaryClass::BottomRight
            } else {
                BoundaryClass::BottomEdge
            }
        } else if col == 0 {
            BoundaryClass::LeftEdge
        } else if col == row {
            BoundaryClass::RightEdge
        } else {
            BoundaryClass::Interior
        }
    }

    /// Colors a vertex of this class may take.
    pub const fn allowed(self) -> ColorSet {
        match self {
            BoundaryClass::Apex => ColorSet::single(Color::Red),
            BoundaryClass::BottomLeft => ColorSet::single(Color::Blue),
            BoundaryClass::BottomRight => ColorSet::single(Color::Green),
            BoundaryClass::LeftEdge => ColorSet::pair(Color::Red, Color::Blue),
            BoundaryClass::RightEdge => ColorSet::pair(Color::Red, Color::Green),
            BoundaryClass::BottomEdge => ColorSet::pair(Color::Blue, Color::Green),
            BoundaryClass::Interior => ColorSet::ALL,
        }
    }

    /// The fixed color of a corner class.
    pub const fn corner_color(self) -> Option<Color> {
        match self {
            BoundaryClass::Apex => Some(Color::Red),
            BoundaryClass::BottomLeft => Some(Color::Blue),
            BoundaryClass::BottomRight => Some(Color::Green),
            _ => None,
        }
    }
}

/// Legal color set per vertex for one level.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ConstraintTable {
    classes: Vec<BoundaryClass>,
}

impl ConstraintTable {
    pub fn new(triangulation: &Triangulation) -> ConstraintTable {
        let level = triangulation.level();
        let classes = triangulation
            .vertices()
            .iter()
            .map(|v| BoundaryClass::classify(v.row, v.col, level))
            .collect();
        ConstraintTable { classes }
    }

    /// Shorthand for building the triangulation and its table together.
    pub fn for_level(level: u32) -> Result<ConstraintTable> {
        Ok(ConstraintTable::new(&Triangulation::new(level)?))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn class(&self, vertex: VertexId) -> Option<BoundaryClass> {
        self.classes.get(vertex.0).copied()
    }

    /// Boundary class of every vertex, indexed by vertex id.
    pub fn classes(&self) -> &[BoundaryClass] {
        &self.classes
    }

    /// Legal colors for `vertex`; empty for a vertex off the grid.
    #[inline]
    pub fn allowed(&self, vertex: VertexId) -> ColorSet {
        self.class(vertex).map_or(ColorSet::EMPTY, BoundaryClass::allowed)
    }

    #[inline]
    pub fn is_legal(&self, vertex: VertexId, color: Color) -> bool {
        self.allowed(vertex).contains(color)
    }

    /// Legal sets in vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, ColorSet)> + '_ {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, class)| (VertexId(i), class.allowed()))
    }

    /// The starting coloring: corners set, everything else blank.
    pub fn initial_coloring(&self) -> Vec<Option<Color>> {
        self.classes.iter().map(|c| c.corner_color()).collect()
    }

    /// A uniformly random complete coloring that respects every constraint.
    pub fn random_coloring<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Color> {
        self.classes
            .iter()
            .map(|class| {
                let choices: Vec<Color> = class.allowed().iter().collect();
                *choices.choose(rng).unwrap_or(&Color::Red)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::triangulation::vertex_index;

    fn table(level: u32) -> ConstraintTable {
        ConstraintTable::for_level(level).unwrap()
    }

    #[test]
    fn test_corners_are_singletons() {
        for level in 1..=8 {
            let t = table(level);
            assert_eq!(t.allowed(VertexId(0)), ColorSet::single(Color::Red));
            assert_eq!(
                t.allowed(VertexId(vertex_index(level, 0))),
                ColorSet::single(Color::Blue)
            );
            assert_eq!(
                t.allowed(VertexId(vertex_index(level, level))),
                ColorSet::single(Color::Green)
            );
        }
    }

    #[test]
    fn test_edges_level_four() {
        let t = table(4);
        for row in 1..4 {
            assert_eq!(
                t.allowed(VertexId(vertex_index(row, 0))),
                ColorSet::pair(Color::Red, Color::Blue)
            );
            assert_eq!(
                t.allowed(VertexId(vertex_index(row, row))),
                ColorSet::pair(Color::Red, Color::Green)
            );
        }
        for col in 1..4 {
            assert_eq!(
                t.allowed(VertexId(vertex_index(4, col))),
                ColorSet::pair(Color::Blue, Color::Green)
            );
        }
    }

    #[test]
    fn test_interior_unrestricted() {
        let t = table(4);
        // (2,1), (3,1), (3,2)
        for id in [4, 7, 8] {
            assert_eq!(t.class(VertexId(id)), Some(BoundaryClass::Interior));
            assert_eq!(t.allowed(VertexId(id)), ColorSet::ALL);
        }
    }

    #[test]
    fn test_class_counts() {
        let level = 6;
        let t = table(level);
        let count = |class: BoundaryClass| t.classes().iter().filter(|&&c| c == class).count();
        let n = level as usize;
        assert_eq!(count(BoundaryClass::LeftEdge), n - 1);
        assert_eq!(count(BoundaryClass::RightEdge), n - 1);
        assert_eq!(count(BoundaryClass::BottomEdge), n - 1);
        assert_eq!(count(BoundaryClass::Interior), (n - 1) * (n - 2) / 2);
    }

    #[test]
    fn test_level_one_is_all_corners() {
        let t = table(1);
        assert_eq!(t.len(), 3);
        assert!(t.iter().all(|(_, set)| set.len() == 1));
        assert_eq!(
            t.initial_coloring(),
            vec![Some(Color::Red), Some(Color::Blue), Some(Color::Green)]
        );
    }

    #[test]
    fn test_initial_coloring() {
        let t = table(3);
        let coloring = t.initial_coloring();
        assert_eq!(coloring.iter().filter(|c| c.is_some()).count(), 3);
        assert_eq!(coloring[0], Some(Color::Red));
        assert_eq!(coloring[6], Some(Color::Blue));
        assert_eq!(coloring[9], Some(Color::Green));
    }

    #[test]
    fn test_off_grid_vertex() {
        let t = table(2);
        assert_eq!(t.class(VertexId(6)), None);
        assert!(t.allowed(VertexId(6)).is_empty());
        assert!(!t.is_legal(VertexId(6), Color::Red));
    }

    #[test]
    fn test_random_coloring_is_legal() {
        let t = table(7);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let coloring = t.random_coloring(&mut rng);
            assert_eq!(coloring.len(), t.len());
            for (i, &color) in coloring.iter().enumerate() {
                assert!(t.is_legal(VertexId(i), color));
            }
        }
    }
}
