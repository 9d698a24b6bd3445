//! WASM bindings for sperner-core
//!
//! Provides a JavaScript-friendly API for the game logic.

use wasm_bindgen::prelude::*;

use crate::{Color, Game, GameError, GameSnapshot, Role, VertexId};

/// Result codes returned by `attemptMove`.
pub const MOVE_OK: u8 = 0;
pub const MOVE_ALREADY_COLORED: u8 = 1;
pub const MOVE_ILLEGAL_COLOR: u8 = 2;
pub const MOVE_INVALID_PHASE: u8 = 3;
pub const MOVE_BAD_INPUT: u8 = 4;

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game at the given level
    #[wasm_bindgen(constructor)]
    pub fn new(level: u32) -> Result<WasmGame, JsError> {
        Ok(WasmGame {
            inner: Game::new(level)?,
        })
    }

    pub fn level(&self) -> u32 {
        self.inner.level()
    }

    /// Current player (1 or 2)
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        self.inner.current_player() as u8
    }

    /// Number of polychrome triangles right now
    #[wasm_bindgen(js_name = polychromeCount)]
    pub fn polychrome_count(&self) -> usize {
        self.inner.polychrome_count()
    }

    /// Indices of the polychrome triangles, for highlighting
    #[wasm_bindgen(js_name = polychromeTriangles)]
    pub fn polychrome_triangles(&self) -> Vec<usize> {
        self.inner.polychrome_triangles().to_vec()
    }

    /// Allowed colors for a vertex as a 3-bit mask (1=red, 2=green, 4=blue)
    #[wasm_bindgen(js_name = allowedColors)]
    pub fn allowed_colors(&self, vertex: usize) -> u8 {
        self.inner.allowed_colors(VertexId(vertex)).bits()
    }

    /// Player 1 picks a role: true for Maximizer, false for Minimizer
    #[wasm_bindgen(js_name = selectRoles)]
    pub fn select_roles(&mut self, player_one_maximizer: bool) -> bool {
        let role = if player_one_maximizer {
            Role::Maximizer
        } else {
            Role::Minimizer
        };
        self.inner.select_roles(role).is_ok()
    }

    /// Color a vertex (color: 0=red, 1=green, 2=blue). Returns a MOVE_* code.
    #[wasm_bindgen(js_name = attemptMove)]
    pub fn attempt_move(&mut self, vertex: usize, color: u8) -> u8 {
        let Some(color) = Color::from_index(color as usize) else {
            return MOVE_BAD_INPUT;
        };
        match self.inner.attempt_move(VertexId(vertex), color) {
            Ok(_) => MOVE_OK,
            Err(GameError::AlreadyColored { .. }) => MOVE_ALREADY_COLORED,
            Err(GameError::IllegalColor { .. }) => MOVE_ILLEGAL_COLOR,
            Err(GameError::InvalidPhase { .. }) => MOVE_INVALID_PHASE,
            Err(_) => MOVE_BAD_INPUT,
        }
    }

    /// Start over, possibly at a new level
    pub fn reset(&mut self, level: u32) -> Result<(), JsError> {
        self.inner.reset(level)?;
        Ok(())
    }

    /// Check if every vertex is colored
    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.is_over()
    }

    /// Full game state for rendering
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        let snapshot = GameSnapshot::of(&self.inner);
        Ok(serde_wasm_bindgen::to_value(&snapshot)?)
    }
}
