//! Per-kind dispatch over the vision primitives.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::bishop_moves::bishop_reach;
use crate::moves::king_moves::king_reach;
use crate::moves::knight_moves::knight_reach;
use crate::moves::pawn_moves::pawn_reach;
use crate::moves::queen_moves::queen_reach;
use crate::moves::rook_moves::rook_reach;
use crate::moves::sliding_moves::Reach;

pub fn piece_reach(game_state: &GameState, from: Square, piece: Piece, reach: Reach, out: &mut Vec<Square>) {
    let color = piece.color;
    match piece.kind {
        PieceKind::Pawn => pawn_reach(game_state, from, piece, reach, out),
        PieceKind::Knight => knight_reach(game_state, from, color, reach, out),
        PieceKind::Bishop => bishop_reach(game_state, from, color, reach, out),
        PieceKind::Rook => rook_reach(game_state, from, color, reach, out),
        PieceKind::Queen => queen_reach(game_state, from, color, reach, out),
        PieceKind::King => king_reach(game_state, from, color, reach, out),
    }
}

/// Squares the piece on `from` could move to, ignoring king safety.
#[inline]
pub fn piece_vision(game_state: &GameState, from: Square, piece: Piece, out: &mut Vec<Square>) {
    piece_reach(game_state, from, piece, Reach::Moves, out);
}

/// Squares the piece on `from` attacks or defends.
#[inline]
pub fn piece_control(game_state: &GameState, from: Square, piece: Piece, out: &mut Vec<Square>) {
    piece_reach(game_state, from, piece, Reach::Control, out);
}
