//! Polychrome (three-colored) face detection.

use crate::triangulation::Triangle;
use crate::Color;

/// Colors at a face's three corners, `None` where uncolored or off the grid.
#[inline]
pub fn triangle_colors(coloring: &[Option<Color>], triangle: &Triangle) -> [Option<Color>; 3] {
    triangle.vertices.map(|v| coloring.get(v.0).copied().flatten())
}

/// True when all three corners are colored and pairwise distinct.
#[inline]
pub fn is_polychrome(colors: [Option<Color>; 3]) -> bool {
    match colors {
        [Some(a), Some(b), Some(c)] => a != b && b != c && a != c,
        _ => false,
    }
}

/// Indices (ascending) of the polychrome faces under `coloring`.
pub fn polychrome_triangles(coloring: &[Option<Color>], triangles: &[Triangle]) -> Vec<usize> {
    triangles
        .iter()
        .enumerate()
        .filter(|(_, tri)| is_polychrome(triangle_colors(coloring, tri)))
        .map(|(i, _)| i)
        .collect()
}

/// Number of polychrome faces under `coloring`.
pub fn polychrome_count(coloring: &[Option<Color>], triangles: &[Triangle]) -> usize {
    triangles
        .iter()
        .filter(|tri| is_polychrome(triangle_colors(coloring, tri)))
        .count()
}
