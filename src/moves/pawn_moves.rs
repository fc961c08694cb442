//! Pawn vision.
//!
//! Forward pushes only onto empty squares, the double advance only for a pawn
//! that still has its first move on its starting rank, diagonal captures only
//! onto enemy-occupied squares. En passant is not part of vision; the legal
//! move generator adds it from the en-passant state.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::sliding_moves::Reach;

pub fn pawn_reach(game_state: &GameState, from: Square, pawn: Piece, reach: Reach, out: &mut Vec<Square>) {
    let forward = pawn.color.forward();

    if reach == Reach::Moves {
        if let Some(one) = from.offset(0, forward) {
            if game_state.is_empty(one) {
                out.push(one);
                if pawn.first_move && from.rank == pawn.color.pawn_rank() {
                    if let Some(two) = one.offset(0, forward) {
                        if game_state.is_empty(two) {
                            out.push(two);
                        }
                    }
                }
            }
        }
    }

    for d_file in [1, -1] {
        let Some(target) = from.offset(d_file, forward) else {
            continue;
        };
        match reach {
            Reach::Control => out.push(target),
            Reach::Moves => {
                if matches!(game_state.color_at(target), Some(owner) if owner != pawn.color) {
                    out.push(target);
                }
            }
        }
    }
}
