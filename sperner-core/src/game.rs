//! The game state machine.
//!
//! ```text
//! AwaitingRoleSelection --select_roles--> InProgress --last vertex colored--> Completed
//!          ^                                                                      |
//!          +------------------------------- reset ---------------------------------+
//! ```
//!
//! Every mutating operation validates fully before touching state, so a
//! rejected call leaves the game exactly as it was.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::bounds::{MidpointRule, PolychromeBounds, WinRule};
use crate::constraints::ConstraintTable;
use crate::error::{GameError, Result};
use crate::polychrome::{is_polychrome, polychrome_triangles, triangle_colors};
use crate::triangulation::Triangulation;
use crate::{Color, ColorSet, Player, Role, VertexId};

/// Lifecycle phase of a game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingRoleSelection,
    InProgress,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::AwaitingRoleSelection => f.write_str("awaiting role selection"),
            Phase::InProgress => f.write_str("in progress"),
            Phase::Completed => f.write_str("completed"),
        }
    }
}

/// One accepted move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based move number.
    pub ply: usize,
    pub player: Player,
    pub vertex: VertexId,
    pub color: Color,
}

/// Final result, fixed when the last vertex is colored.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Outcome {
    pub polychrome_count: u32,
    pub bounds: PolychromeBounds,
    pub threshold: f64,
    pub winner_role: Role,
    pub winner_player: Player,
}

/// What an accepted move changed.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    /// Faces touching the moved vertex that are now polychrome.
    pub closed_polychrome: Vec<usize>,
    pub polychrome_count: usize,
    /// Set when this move completed the game.
    pub outcome: Option<Outcome>,
}

/// Dry-run verdict for a prospective move, for hover hints.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MoveCheck {
    Legal { allowed: ColorSet },
    AlreadyColored { color: Color },
    IllegalColor { allowed: ColorSet },
}

/// A single game session.
///
/// `R` decides the winner at completion; see [`WinRule`].
#[derive(Clone, PartialEq, Debug)]
pub struct Game<R = MidpointRule> {
    rule: R,
    triangulation: Triangulation,
    constraints: ConstraintTable,
    coloring: Vec<Option<Color>>,
    colored: usize,
    current: Player,
    /// roles[0] = Player One, roles[1] = Player Two
    roles: Option<[Role; 2]>,
    phase: Phase,
    polychrome: Vec<usize>,
    moves: Vec<MoveRecord>,
    outcome: Option<Outcome>,
}

impl Game<MidpointRule> {
    /// Create a new game at `level` with the midpoint win rule.
    pub fn new(level: u32) -> Result<Game<MidpointRule>> {
        Game::with_rule(level, MidpointRule)
    }
}

impl<R: WinRule> Game<R> {
    /// Create a new game at `level` decided by `rule`.
    pub fn with_rule(level: u32, rule: R) -> Result<Game<R>> {
        let triangulation = Triangulation::new(level)?;
        let constraints = ConstraintTable::new(&triangulation);
        let coloring = constraints.initial_coloring();
        let colored = coloring.iter().flatten().count();
        let polychrome = polychrome_triangles(&coloring, triangulation.triangles());

        Ok(Game {
            rule,
            triangulation,
            constraints,
            coloring,
            colored,
            current: Player::One,
            roles: None,
            phase: Phase::AwaitingRoleSelection,
            polychrome,
            moves: Vec::new(),
            outcome: None,
        })
    }

    // ========== Queries ==========

    #[inline]
    pub fn level(&self) -> u32 {
        self.triangulation.level()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    pub fn constraints(&self) -> &ConstraintTable {
        &self.constraints
    }

    /// Current coloring, indexed by vertex id.
    pub fn coloring(&self) -> &[Option<Color>] {
        &self.coloring
    }

    pub fn color_of(&self, vertex: VertexId) -> Option<Color> {
        self.coloring.get(vertex.0).copied().flatten()
    }

    #[inline]
    pub fn allowed_colors(&self, vertex: VertexId) -> ColorSet {
        self.constraints.allowed(vertex)
    }

    /// Whose turn it is. Meaningful while `InProgress`.
    #[inline]
    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn role_of(&self, player: Player) -> Option<Role> {
        self.roles.map(|roles| match player {
            Player::One => roles[0],
            Player::Two => roles[1],
        })
    }

    pub fn current_role(&self) -> Option<Role> {
        self.role_of(self.current)
    }

    /// The player holding `role`, once roles are chosen.
    pub fn player_with(&self, role: Role) -> Option<Player> {
        match self.role_of(Player::One)? {
            r if r == role => Some(Player::One),
            _ => Some(Player::Two),
        }
    }

    /// Indices of the polychrome faces, ascending.
    pub fn polychrome_triangles(&self) -> &[usize] {
        &self.polychrome
    }

    #[inline]
    pub fn polychrome_count(&self) -> usize {
        self.polychrome.len()
    }

    #[inline]
    pub fn colored_count(&self) -> usize {
        self.colored
    }

    #[inline]
    pub fn uncolored_count(&self) -> usize {
        self.coloring.len() - self.colored
    }

    /// True once every vertex carries a color.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.colored == self.coloring.len()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Accepted moves, oldest first.
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Would `attempt_move(vertex, color)` be accepted on the board as it stands?
    ///
    /// Ignores the phase; the renderer shows hints before roles are chosen too.
    pub fn check_move(&self, vertex: VertexId, color: Color) -> Result<MoveCheck> {
        self.ensure_vertex(vertex)?;
        let allowed = self.constraints.allowed(vertex);
        Ok(match self.color_of(vertex) {
            Some(existing) => MoveCheck::AlreadyColored { color: existing },
            None if self.constraints.is_legal(vertex, color) => MoveCheck::Legal { allowed },
            None => MoveCheck::IllegalColor { allowed },
        })
    }

    // ========== Transitions ==========

    /// Give `first_player_role` to Player One and the complement to Player Two.
    #[instrument(skip(self), fields(level = self.level()))]
    pub fn select_roles(&mut self, first_player_role: Role) -> Result<()> {
        self.ensure_phase(Phase::AwaitingRoleSelection)?;

        self.roles = Some([first_player_role, first_player_role.complement()]);
        self.phase = Phase::InProgress;
        debug!(player_one = %first_player_role, "roles selected");

        // Level 1 has nothing but corners.
        if self.is_over() {
            self.complete();
        }
        Ok(())
    }

    /// Color `vertex` for the current player.
    #[instrument(skip(self), fields(level = self.level(), player = %self.current))]
    pub fn attempt_move(&mut self, vertex: VertexId, color: Color) -> Result<MoveOutcome> {
        self.ensure_phase(Phase::InProgress)?;
        self.ensure_vertex(vertex)?;
        if let Some(existing) = self.coloring[vertex.0] {
            return Err(GameError::AlreadyColored {
                vertex,
                color: existing,
            });
        }
        let allowed = self.constraints.allowed(vertex);
        if !allowed.contains(color) {
            return Err(GameError::IllegalColor {
                vertex,
                color,
                allowed,
            });
        }

        let record = MoveRecord {
            ply: self.moves.len() + 1,
            player: self.current,
            vertex,
            color,
        };
        self.coloring[vertex.0] = Some(color);
        self.colored += 1;
        self.moves.push(record);
        self.current = self.current.opponent();
        self.polychrome = polychrome_triangles(&self.coloring, self.triangulation.triangles());

        let triangles = self.triangulation.triangles();
        let closed_polychrome: Vec<usize> = self
            .triangulation
            .triangles_of(vertex)
            .iter()
            .copied()
            .filter(|&t| is_polychrome(triangle_colors(&self.coloring, &triangles[t])))
            .collect();
        debug!(
            ply = record.ply,
            polychrome = self.polychrome.len(),
            closed = closed_polychrome.len(),
            "move applied"
        );

        if self.is_over() {
            self.complete();
        }

        Ok(MoveOutcome {
            record,
            closed_polychrome,
            polychrome_count: self.polychrome.len(),
            outcome: self.outcome,
        })
    }

    /// Throw everything away and start over at `level`, keeping the win rule.
    #[instrument(skip(self))]
    pub fn reset(&mut self, level: u32) -> Result<()> {
        let triangulation = Triangulation::new(level)?;
        let constraints = ConstraintTable::new(&triangulation);
        let coloring = constraints.initial_coloring();

        self.colored = coloring.iter().flatten().count();
        self.polychrome = polychrome_triangles(&coloring, triangulation.triangles());
        self.triangulation = triangulation;
        self.constraints = constraints;
        self.coloring = coloring;
        self.current = Player::One;
        self.roles = None;
        self.phase = Phase::AwaitingRoleSelection;
        self.moves.clear();
        self.outcome = None;
        debug!("game reset");
        Ok(())
    }

    // ========== Internals ==========

    fn ensure_phase(&self, expected: Phase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn ensure_vertex(&self, vertex: VertexId) -> Result<()> {
        if vertex.0 < self.coloring.len() {
            Ok(())
        } else {
            Err(GameError::UnknownVertex {
                vertex,
                count: self.coloring.len(),
            })
        }
    }

    fn complete(&mut self) {
        let bounds = PolychromeBounds::reachable(
            &self.triangulation,
            &self.constraints,
            &self.constraints.initial_coloring(),
        );
        let count = self.polychrome.len() as u32;
        let winner_role = if self.rule.maximizer_wins(count, bounds) {
            Role::Maximizer
        } else {
            Role::Minimizer
        };
        let winner_player = self.player_with(winner_role).unwrap_or(Player::One);

        let outcome = Outcome {
            polychrome_count: count,
            bounds,
            threshold: self.rule.threshold(bounds),
            winner_role,
            winner_player,
        };
        info!(
            polychrome = count,
            min = bounds.min,
            max = bounds.max,
            winner = %winner_role,
            "game completed"
        );
        self.outcome = Some(outcome);
        self.phase = Phase::Completed;
    }
}
