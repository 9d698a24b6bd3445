//! Sperner's game logic: a two-player coloring game on a triangulated triangle.
//!
//! # Vertex Indexing
//!
//! A level-`n` triangulation has `n + 1` rows; row `r` holds `r + 1` vertices.
//! Vertices are numbered in row-major order:
//!
//! ```text
//! Row 0:            0              apex (Red)
//! Row 1:          1   2
//! Row 2:        3   4   5
//! Row 3:      6   7   8   9        bottom-left (Blue) .. bottom-right (Green)
//!
//! index(r, c) = r * (r + 1) / 2 + c
//! ```
//!
//! # Coloring Constraints
//!
//! ```text
//! Apex            {Red}
//! Bottom-left     {Blue}
//! Bottom-right    {Green}
//! Left edge       {Red, Blue}      column 0, rows 1..n-1
//! Right edge      {Red, Green}     column r, rows 1..n-1
//! Bottom edge     {Blue, Green}    row n, columns 1..n-1
//! Interior        {Red, Green, Blue}
//! ```
//!
//! # Color Set Encoding (3-bit)
//!
//! ```text
//! Bit 0: Red
//! Bit 1: Green
//! Bit 2: Blue
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod bounds;
pub mod constraints;
pub mod error;
pub mod game;
pub mod polychrome;
pub mod snapshot;
pub mod triangulation;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use bounds::{FixedThreshold, MidpointRule, PolychromeBounds, WinRule};
pub use constraints::{BoundaryClass, ConstraintTable};
pub use error::{GameError, Result};
pub use game::{Game, MoveCheck, MoveOutcome, MoveRecord, Outcome, Phase};
pub use polychrome::{is_polychrome, polychrome_count, polychrome_triangles};
pub use snapshot::GameSnapshot;
pub use triangulation::{Orientation, Point, Triangle, Triangulation, Vertex};

/// Smallest level the web front end offers.
pub const MIN_UI_LEVEL: u32 = 2;
/// Largest level the web front end offers.
pub const MAX_UI_LEVEL: u32 = 8;
/// Level a fresh session starts at when none is given.
pub const DEFAULT_LEVEL: u32 = 5;

/// Vertex color.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Color {
    /// All three colors in bit order.
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    /// Convert from index (0, 1, 2) to Color.
    #[inline]
    pub fn from_index(idx: usize) -> Option<Color> {
        Color::ALL.get(idx).copied()
    }

    /// Get all colors as an iterator.
    pub fn all() -> impl Iterator<Item = Color> {
        Color::ALL.into_iter()
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Lowercase name, as used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of colors packed into 3 bits.
///
/// See module documentation for the bit layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Color>", from = "Vec<Color>")]
pub struct ColorSet(u8);

impl ColorSet {
    pub const EMPTY: ColorSet = ColorSet(0);
    pub const ALL: ColorSet = ColorSet(0b111);

    /// A set holding exactly one color.
    #[inline]
    pub const fn single(color: Color) -> ColorSet {
        ColorSet(color.bit())
    }

    /// A set holding exactly two colors.
    #[inline]
    pub const fn pair(a: Color, b: Color) -> ColorSet {
        ColorSet(a.bit() | b.bit())
    }

    #[inline]
    pub const fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, color: Color) {
        self.0 |= color.bit();
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw 3-bit encoding.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Iterate over the colors in the set, in `Color::ALL` order.
    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::all().filter(move |&c| self.contains(c))
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut set = ColorSet::EMPTY;
        for color in iter {
            set.insert(color);
        }
        set
    }
}

impl From<Vec<Color>> for ColorSet {
    fn from(colors: Vec<Color>) -> Self {
        colors.into_iter().collect()
    }
}

impl From<ColorSet> for Vec<Color> {
    fn from(set: ColorSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Color::name).collect();
        f.write_str(&names.join(", "))
    }
}

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", *self as u8)
    }
}

/// What a player is trying to do with the final polychrome count.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Role {
    Maximizer,
    Minimizer,
}

impl Role {
    /// The role the other player gets.
    #[inline]
    pub fn complement(self) -> Role {
        match self {
            Role::Maximizer => Role::Minimizer,
            Role::Minimizer => Role::Maximizer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Maximizer => f.write_str("Maximizer"),
            Role::Minimizer => f.write_str("Minimizer"),
        }
    }
}

/// Vertex index in row-major order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
