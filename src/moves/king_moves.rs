use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::sliding_moves::{step_targets, Reach};

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[inline]
pub fn king_reach(game_state: &GameState, from: Square, color: Color, reach: Reach, out: &mut Vec<Square>) {
    step_targets(game_state, from, color, &KING_OFFSETS, reach, out);
}
