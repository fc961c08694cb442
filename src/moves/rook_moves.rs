//! Rook vision: the four orthogonal rays.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::sliding_moves::{trace_ray, Reach};

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[inline]
pub fn rook_reach(game_state: &GameState, from: Square, color: Color, reach: Reach, out: &mut Vec<Square>) {
    for direction in ROOK_DIRECTIONS {
        trace_ray(game_state, from, color, direction, reach, out);
    }
}
