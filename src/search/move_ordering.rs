//! Cheap static move ordering applied at every search node.

use crate::game_state::{chess_types::PieceKind, game_state::GameState};
use crate::moves::move_descriptions::ChessMove;
use crate::search::board_scoring::piece_value;

/// Captures by victim value, promotions by the new piece, drops just below
/// the dropped piece, castling like a pawn, quiet moves last.
pub fn move_order_score(game_state: &GameState, mv: ChessMove) -> i32 {
    match mv {
        ChessMove::Castle { .. } => piece_value(PieceKind::Pawn),
        ChessMove::DropIn { kind, .. } => piece_value(kind) - 1,
        ChessMove::Promotion { to, kind, .. } => {
            let captured = game_state.kind_at(to).map_or(0, piece_value);
            piece_value(kind).max(captured)
        }
        ChessMove::Simple { to, .. } => game_state.kind_at(to).map_or(0, piece_value),
    }
}

/// Stable sort, best first.
pub fn reorder_moves(game_state: &GameState, moves: &mut [ChessMove]) {
    moves.sort_by_cached_key(|&mv| std::cmp::Reverse(move_order_score(game_state, mv)));
}
