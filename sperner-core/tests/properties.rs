//! Property tests for geometry, constraints and move handling.

use proptest::prelude::*;

use sperner_core::triangulation::vertex_index;
use sperner_core::{
    polychrome_triangles, BoundaryClass, Color, ColorSet, ConstraintTable, Game, GameError,
    Phase, Role, Triangulation, VertexId,
};

fn color() -> impl Strategy<Value = Color> {
    prop_oneof![Just(Color::Red), Just(Color::Green), Just(Color::Blue)]
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Maximizer), Just(Role::Minimizer)]
}

proptest! {
    #[test]
    fn prop_vertex_and_triangle_counts(level in 1u32..=24) {
        let tri = Triangulation::new(level).unwrap();
        let n = level as usize;
        prop_assert_eq!(tri.vertices().len(), (n + 1) * (n + 2) / 2);
        prop_assert_eq!(tri.triangles().len(), n * n);
    }

    #[test]
    fn prop_corner_and_edge_sets(level in 1u32..=16) {
        let table = ConstraintTable::for_level(level).unwrap();
        prop_assert_eq!(table.allowed(VertexId(0)), ColorSet::single(Color::Red));
        prop_assert_eq!(table.allowed(VertexId(vertex_index(level, 0))), ColorSet::single(Color::Blue));
        prop_assert_eq!(table.allowed(VertexId(vertex_index(level, level))), ColorSet::single(Color::Green));

        for row in 1..level {
            prop_assert_eq!(
                table.allowed(VertexId(vertex_index(row, 0))),
                ColorSet::pair(Color::Red, Color::Blue)
            );
            prop_assert_eq!(
                table.allowed(VertexId(vertex_index(row, row))),
                ColorSet::pair(Color::Red, Color::Green)
            );
            prop_assert_eq!(
                table.allowed(VertexId(vertex_index(level, row))),
                ColorSet::pair(Color::Blue, Color::Green)
            );
        }
        for (vertex, set) in table.iter() {
            prop_assert!(!set.is_empty());
            if table.class(vertex) == Some(BoundaryClass::Interior) {
                prop_assert_eq!(set, ColorSet::ALL);
            }
        }
    }

    /// Any sequence of move attempts, legal or not, keeps the engine consistent.
    #[test]
    fn prop_move_sequences(
        level in 2u32..=5,
        first in role(),
        attempts in prop::collection::vec((0usize..24, color()), 0..60),
    ) {
        let mut game = Game::new(level).unwrap();
        game.select_roles(first).unwrap();

        for (v, c) in attempts {
            let before = game.clone();
            let vertex = VertexId(v);
            match game.attempt_move(vertex, c) {
                Ok(outcome) => {
                    prop_assert_eq!(game.colored_count(), before.colored_count() + 1);
                    prop_assert_eq!(game.current_player(), before.current_player().opponent());
                    prop_assert_eq!(outcome.record.player, before.current_player());
                    prop_assert_eq!(game.color_of(vertex), Some(c));
                    prop_assert_eq!(game.phase() == Phase::Completed, game.uncolored_count() == 0);
                }
                Err(GameError::AlreadyColored { color, .. }) => {
                    prop_assert_eq!(before.color_of(vertex), Some(color));
                    prop_assert_eq!(&game, &before);
                }
                Err(GameError::IllegalColor { allowed, .. }) => {
                    prop_assert_eq!(allowed, before.allowed_colors(vertex));
                    prop_assert!(!allowed.contains(c));
                    prop_assert_eq!(&game, &before);
                }
                Err(GameError::InvalidPhase { actual, .. }) => {
                    prop_assert_eq!(actual, Phase::Completed);
                    prop_assert_eq!(&game, &before);
                }
                Err(GameError::UnknownVertex { count, .. }) => {
                    prop_assert!(v >= count);
                    prop_assert_eq!(&game, &before);
                }
                Err(GameError::InvalidLevel { .. }) => {
                    unreachable!("attempt_move never reports InvalidLevel")
                }
            }

            let expected = polychrome_triangles(game.coloring(), game.triangulation().triangles());
            prop_assert_eq!(game.polychrome_triangles(), expected.as_slice());
        }
    }

    /// Every complete legal coloring has an odd number of polychrome faces.
    #[test]
    fn prop_sperner_parity(level in 1u32..=8, seed in any::<u64>()) {
        use rand::{rngs::StdRng, SeedableRng};

        let tri = Triangulation::new(level).unwrap();
        let table = ConstraintTable::new(&tri);
        let mut rng = StdRng::seed_from_u64(seed);
        let coloring: Vec<Option<Color>> = table.random_coloring(&mut rng).into_iter().map(Some).collect();
        let count = polychrome_triangles(&coloring, tri.triangles()).len();
        prop_assert_eq!(count % 2, 1);
    }

    #[test]
    fn prop_reset_restores_start(level in 1u32..=6, next in 1u32..=6, first in role()) {
        let mut game = Game::new(level).unwrap();
        game.select_roles(first).unwrap();
        game.reset(next).unwrap();
        prop_assert_eq!(game.phase(), Phase::AwaitingRoleSelection);
        prop_assert_eq!(game.colored_count(), 3);
        prop_assert_eq!(game.color_of(VertexId(0)), Some(Color::Red));
        prop_assert_eq!(game.color_of(VertexId(vertex_index(next, 0))), Some(Color::Blue));
        prop_assert_eq!(game.color_of(VertexId(vertex_index(next, next))), Some(Color::Green));
        prop_assert_eq!(game, Game::new(next).unwrap());
    }
}
