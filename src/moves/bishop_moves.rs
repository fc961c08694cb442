//! Bishop vision: the four diagonal rays.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::sliding_moves::{trace_ray, Reach};

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

#[inline]
pub fn bishop_reach(game_state: &GameState, from: Square, color: Color, reach: Reach, out: &mut Vec<Square>) {
    for direction in BISHOP_DIRECTIONS {
        trace_ray(game_state, from, color, direction, reach, out);
    }
}
