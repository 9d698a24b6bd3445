//! Triangular grid geometry: vertices, faces and drawing edges for a level.
//!
//! Geometry is a deterministic function of the level alone. Positions are
//! only consumed by renderers; the game logic works on indices.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::VertexId;

/// Vertical distance between rows (equilateral layout).
const ROW_HEIGHT: f64 = 0.866_025_403_784_438_6; // sqrt(3) / 2

/// Row-major index of the vertex at `(row, col)`.
#[inline]
pub const fn vertex_index(row: u32, col: u32) -> usize {
    (row as usize) * (row as usize + 1) / 2 + col as usize
}

/// Number of vertices in a level-`n` triangulation: `(n+1)(n+2)/2`.
#[inline]
pub const fn vertex_count(level: u32) -> usize {
    vertex_index(level + 1, 0)
}

/// Number of faces in a level-`n` triangulation: `n²`.
#[inline]
pub const fn triangle_count(level: u32) -> usize {
    (level as usize) * (level as usize)
}

/// 2D position for drawing.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Squared Euclidean distance to another point.
    #[inline]
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// A grid vertex.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub row: u32,
    pub col: u32,
    pub position: Point,
}

/// Which way a face points. Informational only.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Up,
    Down,
}

/// A face of the triangulation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [VertexId; 3],
    pub orientation: Orientation,
}

impl Triangle {
    #[inline]
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }
}

/// Vertices, faces and edges of the level-`n` subdivision of the master triangle.
#[derive(Clone, PartialEq, Debug)]
pub struct Triangulation {
    level: u32,
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    edges: Vec<(VertexId, VertexId)>,
    /// incidence[v] = indices of the faces touching vertex v
    incidence: Vec<Vec<usize>>,
}

impl Triangulation {
    /// Build the triangulation for `level`. Fails only for level 0.
    pub fn new(level: u32) -> Result<Triangulation> {
        if level == 0 {
            return Err(GameError::InvalidLevel { level });
        }

        let mut vertices = Vec::with_capacity(vertex_count(level));
        for row in 0..=level {
            for col in 0..=row {
                vertices.push(Vertex {
                    id: VertexId(vertex_index(row, col)),
                    row,
                    col,
                    position: Point {
                        x: col as f64 + (level - row) as f64 / 2.0,
                        y: row as f64 * ROW_HEIGHT,
                    },
                });
            }
        }

        let id = |row: u32, col: u32| VertexId(vertex_index(row, col));
        let mut triangles = Vec::with_capacity(triangle_count(level));
        let mut edges = Vec::with_capacity(3 * vertex_index(level, 0));
        for r in 0..level {
            for c in 0..=r {
                triangles.push(Triangle {
                    vertices: [id(r, c), id(r + 1, c), id(r + 1, c + 1)],
                    orientation: Orientation::Up,
                });
                if c < r {
                    triangles.push(Triangle {
                        vertices: [id(r + 1, c + 1), id(r, c), id(r, c + 1)],
                        orientation: Orientation::Down,
                    });
                }

                // Each upward face contributes its three sides; together they cover the grid once.
                edges.push((id(r, c), id(r + 1, c)));
                edges.push((id(r, c), id(r + 1, c + 1)));
                edges.push((id(r + 1, c), id(r + 1, c + 1)));
            }
        }

        let mut incidence = vec![Vec::new(); vertices.len()];
        for (t, tri) in triangles.iter().enumerate() {
            for v in tri.vertices {
                incidence[v.0].push(t);
            }
        }

        Ok(Triangulation {
            level,
            vertices,
            triangles,
            edges,
            incidence,
        })
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Grid edges for drawing, each listed once.
    pub fn edges(&self) -> &[(VertexId, VertexId)] {
        &self.edges
    }

    /// Indices (into `triangles()`) of the faces touching `vertex`.
    pub fn triangles_of(&self, vertex: VertexId) -> &[usize] {
        self.incidence.get(vertex.0).map_or(&[], Vec::as_slice)
    }

    #[inline]
    pub fn apex(&self) -> VertexId {
        VertexId(0)
    }

    #[inline]
    pub fn bottom_left(&self) -> VertexId {
        VertexId(vertex_index(self.level, 0))
    }

    #[inline]
    pub fn bottom_right(&self) -> VertexId {
        VertexId(vertex_index(self.level, self.level))
    }

    /// Apex, bottom-left and bottom-right corners, in that order.
    pub fn corners(&self) -> [VertexId; 3] {
        [self.apex(), self.bottom_left(), self.bottom_right()]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_vertex_index() {
        assert_eq!(vertex_index(0, 0), 0);
        assert_eq!(vertex_index(1, 0), 1);
        assert_eq!(vertex_index(1, 1), 2);
        assert_eq!(vertex_index(2, 0), 3);
        assert_eq!(vertex_index(3, 3), 9);
    }

    #[test]
    fn test_counts() {
        for level in 1..=10 {
            let tri = Triangulation::new(level).unwrap();
            let n = level as usize;
            assert_eq!(tri.vertex_count(), (n + 1) * (n + 2) / 2);
            assert_eq!(tri.triangles().len(), n * n);
            assert_eq!(tri.edges().len(), 3 * n * (n + 1) / 2);
        }
    }

    #[test]
    fn test_level_zero_rejected() {
        assert_eq!(
            Triangulation::new(0),
            Err(GameError::InvalidLevel { level: 0 })
        );
    }

    #[test]
    fn test_level_two_faces() {
        let tri = Triangulation::new(2).unwrap();
        let faces: Vec<[usize; 3]> = tri
            .triangles()
            .iter()
            .map(|t| t.vertices.map(|v| v.0))
            .collect();
        assert_eq!(faces, vec![[0, 1, 2], [1, 3, 4], [4, 1, 2], [2, 4, 5]]);
        assert_eq!(tri.triangles()[2].orientation, Orientation::Down);
    }

    #[test]
    fn test_corners() {
        let tri = Triangulation::new(4).unwrap();
        assert_eq!(tri.corners(), [VertexId(0), VertexId(10), VertexId(14)]);
    }

    #[test]
    fn test_positions_equilateral() {
        let tri = Triangulation::new(3).unwrap();
        let apex = tri.vertex(tri.apex()).unwrap().position;
        let left = tri.vertex(tri.bottom_left()).unwrap().position;
        let right = tri.vertex(tri.bottom_right()).unwrap().position;

        assert_eq!(apex.x, 1.5);
        assert_eq!(apex.y, 0.0);
        assert_eq!(left.x, 0.0);
        assert_eq!(right.x, 3.0);
        assert!((apex.distance_sq(left) - 9.0).abs() < 1e-9);
        assert!((apex.distance_sq(right) - 9.0).abs() < 1e-9);
        assert!((left.distance_sq(right) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_faces_distinct_and_edges_unique() {
        let tri = Triangulation::new(6).unwrap();

        let faces: HashSet<Vec<usize>> = tri
            .triangles()
            .iter()
            .map(|t| {
                let mut v: Vec<usize> = t.vertices.iter().map(|v| v.0).collect();
                v.sort_unstable();
                v
            })
            .collect();
        assert_eq!(faces.len(), tri.triangles().len());

        let edges: HashSet<(usize, usize)> = tri
            .edges()
            .iter()
            .map(|&(a, b)| (a.0.min(b.0), a.0.max(b.0)))
            .collect();
        assert_eq!(edges.len(), tri.edges().len());
    }

    #[test]
    fn test_incidence() {
        let tri = Triangulation::new(3).unwrap();
        // Corners touch exactly one face; interior vertex 4 touches six.
        for corner in tri.corners() {
            assert_eq!(tri.triangles_of(corner).len(), 1);
        }
        assert_eq!(tri.triangles_of(VertexId(4)).len(), 6);
        for &t in tri.triangles_of(VertexId(4)) {
            assert!(tri.triangles()[t].contains(VertexId(4)));
        }
        assert!(tri.triangles_of(VertexId(99)).is_empty());
    }
}
