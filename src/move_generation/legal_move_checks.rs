//! Attack detection.
//!
//! `is_square_attacked` scans outward from the target square: eight rays
//! (stopping at the first occupied square), then the knight, king and pawn
//! patterns. This is the hottest primitive in the engine.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::bishop_moves::BISHOP_DIRECTIONS;
use crate::moves::king_moves::KING_OFFSETS;
use crate::moves::knight_moves::{knight_related, KNIGHT_OFFSETS};
use crate::moves::rook_moves::ROOK_DIRECTIONS;

pub fn is_square_attacked(game_state: &GameState, square: Square, attacker: Color) -> bool {
    if ray_hits(game_state, square, attacker, &ROOK_DIRECTIONS, PieceKind::Rook)
        || ray_hits(game_state, square, attacker, &BISHOP_DIRECTIONS, PieceKind::Bishop)
    {
        return true;
    }

    for (d_file, d_rank) in KNIGHT_OFFSETS {
        if let Some(sq) = square.offset(d_file, d_rank) {
            if game_state.holds(sq, attacker, PieceKind::Knight) {
                return true;
            }
        }
    }

    for (d_file, d_rank) in KING_OFFSETS {
        if let Some(sq) = square.offset(d_file, d_rank) {
            if game_state.holds(sq, attacker, PieceKind::King) {
                return true;
            }
        }
    }

    // Attacking pawns sit one rank behind the target from their own point of view.
    let pawn_rank = -attacker.forward();
    for d_file in [1, -1] {
        if let Some(sq) = square.offset(d_file, pawn_rank) {
            if game_state.holds(sq, attacker, PieceKind::Pawn) {
                return true;
            }
        }
    }

    false
}

fn ray_hits(
    game_state: &GameState,
    square: Square,
    attacker: Color,
    directions: &[(i8, i8)],
    slider: PieceKind,
) -> bool {
    for &(d_file, d_rank) in directions {
        let mut cursor = square.offset(d_file, d_rank);
        while let Some(sq) = cursor {
            if let Some(piece) = game_state.piece_at(sq) {
                if piece.color == attacker && (piece.kind == slider || piece.kind == PieceKind::Queen) {
                    return true;
                }
                break;
            }
            cursor = sq.offset(d_file, d_rank);
        }
    }
    false
}

/// Whether `square` is attacked by the opponent of the side to move.
#[inline]
pub fn square_check(game_state: &GameState, square: Square) -> bool {
    is_square_attacked(game_state, square, game_state.side_to_move.opposite())
}

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> MoveGenResult<Square> {
    game_state
        .king_square(color)
        .ok_or(MoveGenerationError::MissingKing { color })
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> MoveGenResult<bool> {
    let king = king_square(game_state, color)?;
    Ok(is_square_attacked(game_state, king, color.opposite()))
}

/// Same file, rank or diagonal.
#[inline]
pub fn same_line(a: Square, b: Square) -> bool {
    a.file == b.file
        || a.rank == b.rank
        || a.file + a.rank == b.file + b.rank
        || a.file - a.rank == b.file - b.rank
}

/// Whether a move ending on `end` could possibly affect a check on `king`.
#[inline]
pub fn could_resolve_check(king: Square, end: Square) -> bool {
    same_line(king, end) || knight_related(king, end)
}
