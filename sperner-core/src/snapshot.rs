//! Serializable read-only view of a game, for renderers.

use serde::Serialize;

use crate::bounds::WinRule;
use crate::constraints::BoundaryClass;
use crate::game::{Game, MoveRecord, Outcome, Phase};
use crate::triangulation::{Point, Triangle};
use crate::{Color, ColorSet, Player, Role, VertexId};

#[derive(Clone, Debug, Serialize)]
pub struct VertexView {
    pub id: VertexId,
    pub row: u32,
    pub col: u32,
    pub position: Point,
    pub class: BoundaryClass,
    pub allowed: ColorSet,
    pub color: Option<Color>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RolesView {
    pub player_one: Role,
    pub player_two: Role,
}

/// Everything a renderer reads after each action.
#[derive(Clone, Debug, Serialize)]
pub struct GameSnapshot {
    pub level: u32,
    pub phase: Phase,
    pub vertices: Vec<VertexView>,
    pub triangles: Vec<Triangle>,
    pub edges: Vec<(VertexId, VertexId)>,
    pub current_player: Player,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<RolesView>,
    pub polychrome: Vec<usize>,
    pub polychrome_count: usize,
    pub moves: Vec<MoveRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl GameSnapshot {
    pub fn of<R: WinRule>(game: &Game<R>) -> GameSnapshot {
        let triangulation = game.triangulation();
        let constraints = game.constraints();

        let vertices = triangulation
            .vertices()
            .iter()
            .zip(constraints.classes())
            .map(|(v, &class)| VertexView {
                id: v.id,
                row: v.row,
                col: v.col,
                position: v.position,
                class,
                allowed: class.allowed(),
                color: game.color_of(v.id),
            })
            .collect();

        let roles = match (game.role_of(Player::One), game.role_of(Player::Two)) {
            (Some(player_one), Some(player_two)) => Some(RolesView {
                player_one,
                player_two,
            }),
            _ => None,
        };

        GameSnapshot {
            level: game.level(),
            phase: game.phase(),
            vertices,
            triangles: triangulation.triangles().to_vec(),
            edges: triangulation.edges().to_vec(),
            current_player: game.current_player(),
            current_role: game.current_role(),
            roles,
            polychrome: game.polychrome_triangles().to_vec(),
            polychrome_count: game.polychrome_count(),
            moves: game.moves().to_vec(),
            outcome: game.outcome().copied(),
        }
    }
}

impl<R: WinRule> From<&Game<R>> for GameSnapshot {
    fn from(game: &Game<R>) -> Self {
        GameSnapshot::of(game)
    }
}
