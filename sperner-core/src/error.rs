//! Error types for the game engine.

use thiserror::Error;

use crate::game::Phase;
use crate::{Color, ColorSet, VertexId};

/// Why an engine operation was rejected.
///
/// A rejected operation never mutates the game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The vertex already carries a color. Not a player-facing error.
    #[error("vertex {vertex} is already colored {color}")]
    AlreadyColored { vertex: VertexId, color: Color },

    #[error("vertex {vertex} cannot be colored {color} (allowed: {allowed})")]
    IllegalColor {
        vertex: VertexId,
        color: Color,
        allowed: ColorSet,
    },

    #[error("operation requires phase {expected}, but the game is {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("triangulation level must be at least 1, got {level}")]
    InvalidLevel { level: u32 },

    #[error("vertex {vertex} does not exist (level has {count} vertices)")]
    UnknownVertex { vertex: VertexId, count: usize },
}

impl GameError {
    /// Short machine-readable tag for the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::AlreadyColored { .. } => "already_colored",
            GameError::IllegalColor { .. } => "illegal_color",
            GameError::InvalidPhase { .. } => "invalid_phase",
            GameError::InvalidLevel { .. } => "invalid_level",
            GameError::UnknownVertex { .. } => "unknown_vertex",
        }
    }
}

/// Convenience type alias for Results using the crate's error type.
pub type Result<T> = std::result::Result<T, GameError>;
