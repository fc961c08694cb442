use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::sliding_moves::{step_targets, Reach};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

#[inline]
pub fn knight_reach(game_state: &GameState, from: Square, color: Color, reach: Reach, out: &mut Vec<Square>) {
    step_targets(game_state, from, color, &KNIGHT_OFFSETS, reach, out);
}

/// True when the two squares are a knight's jump apart.
#[inline]
pub fn knight_related(a: Square, b: Square) -> bool {
    let d_file = (a.file - b.file).abs();
    let d_rank = (a.rank - b.rank).abs();
    (d_file == 2 && d_rank == 1) || (d_file == 1 && d_rank == 2)
}

#[cfg(test)]
mod tests {
    use super::{knight_reach, knight_related};
    use crate::game_state::{chess_types::*, game_state::GameState};
    use crate::moves::sliding_moves::Reach;

    #[test]
    fn knight_from_d4_has_eight_targets() {
        let game = GameState::new_empty();
        let mut out = Vec::new();
        knight_reach(&game, Square::new(4, 4), Color::Light, Reach::Moves, &mut out);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn knight_on_b1_at_start_has_two_targets() {
        let game = GameState::new_game();
        let mut out = Vec::new();
        knight_reach(&game, Square::new(2, 1), Color::Light, Reach::Moves, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn knight_relation_is_symmetric() {
        assert!(knight_related(Square::new(7, 1), Square::new(6, 3)));
        assert!(knight_related(Square::new(6, 3), Square::new(7, 1)));
        assert!(!knight_related(Square::new(1, 1), Square::new(3, 3)));
    }
}
