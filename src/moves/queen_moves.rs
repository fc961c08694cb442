//! Queen vision is the rook rays followed by the bishop rays.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::bishop_moves::bishop_reach;
use crate::moves::rook_moves::rook_reach;
use crate::moves::sliding_moves::Reach;

#[inline]
pub fn queen_reach(game_state: &GameState, from: Square, color: Color, reach: Reach, out: &mut Vec<Square>) {
    rook_reach(game_state, from, color, reach, out);
    bishop_reach(game_state, from, color, reach, out);
}
