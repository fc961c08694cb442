//! Full legal move generation pipeline.
//!
//! Piece vision produces candidates; a line-of-sight pre-filter decides which
//! of them can possibly expose or fail to cover the king. Only those are
//! simulated (apply, test the king square, undo). En passant is always
//! simulated because it clears a square off the moving piece's path.
//! Castling (short side) and drop-ins are appended last.

use crate::game_state::chess_rules::*;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{apply_move, undo_move};
use crate::move_generation::legal_move_checks::{
    could_resolve_check, is_square_attacked, king_square, same_line,
};
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerator};
use crate::moves::move_descriptions::ChessMove;
use crate::moves::piece_vision::piece_vision;

pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &mut GameState) -> MoveGenResult<Vec<ChessMove>> {
        generate_legal_moves(game_state)
    }
}

/// Kind a pawn reaching the last rank becomes. Under-promotion is never generated.
pub const PROMOTION_KIND: PieceKind = PieceKind::Queen;

pub fn generate_legal_moves(game_state: &mut GameState) -> MoveGenResult<Vec<ChessMove>> {
    let mover = game_state.side_to_move;
    let enemy = mover.opposite();
    let king = king_square(game_state, mover)?;
    let in_check = is_square_attacked(game_state, king, enemy);

    let mut legal = Vec::with_capacity(64);
    let mut targets = Vec::with_capacity(32);

    for from in Square::all() {
        let piece = match game_state.piece_at(from) {
            Some(piece) if piece.color == mover => piece,
            _ => continue,
        };

        targets.clear();
        piece_vision(game_state, from, piece, &mut targets);
        for &to in &targets {
            let candidate = if piece.kind == PieceKind::Pawn && to.rank == enemy.home_rank() {
                ChessMove::Promotion { from, to, kind: PROMOTION_KIND }
            } else {
                ChessMove::Simple { from, to }
            };
            if passes_filter(game_state, candidate, king, in_check)? {
                legal.push(candidate);
            }
        }
    }

    push_en_passant(game_state, king, &mut legal)?;

    if !in_check {
        push_short_castle(game_state, &mut legal);
    }

    push_drops(game_state, king, in_check, &mut legal)?;

    Ok(legal)
}

fn passes_filter(game_state: &mut GameState, mv: ChessMove, king: Square, in_check: bool) -> MoveGenResult<bool> {
    let start = mv.start();
    let moves_king = start == Some(king);

    if in_check {
        if !moves_king && !could_resolve_check(king, mv.end()) {
            return Ok(false);
        }
    } else if !moves_king {
        match start {
            None => return Ok(true),
            Some(from) if !same_line(king, from) => return Ok(true),
            Some(_) => {}
        }
    }

    leaves_king_safe(game_state, mv, king)
}

/// Simulate `mv` and report whether the mover's king is unattacked afterwards.
fn leaves_king_safe(game_state: &mut GameState, mv: ChessMove, king: Square) -> MoveGenResult<bool> {
    let mover = game_state.side_to_move;
    let king_after = if mv.start() == Some(king) { mv.end() } else { king };

    let undo = apply_move(game_state, mv)?;
    let safe = !is_square_attacked(game_state, king_after, mover.opposite());
    undo_move(game_state, &undo)?;
    Ok(safe)
}

fn push_en_passant(game_state: &mut GameState, king: Square, legal: &mut Vec<ChessMove>) -> MoveGenResult<()> {
    let mover = game_state.side_to_move;
    let Some(target) = game_state.en_passant[mover.index()] else {
        return Ok(());
    };
    if !game_state.is_empty(target) {
        return Ok(());
    }

    for d_file in [-1, 1] {
        let Some(from) = target.offset(d_file, -mover.forward()) else {
            continue;
        };
        let victim = Square::new(target.file, from.rank);
        if !game_state.holds(from, mover, PieceKind::Pawn)
            || !game_state.holds(victim, mover.opposite(), PieceKind::Pawn)
        {
            continue;
        }
        let mv = ChessMove::Simple { from, to: target };
        if leaves_king_safe(game_state, mv, king)? {
            legal.push(mv);
        }
    }
    Ok(())
}

fn push_short_castle(game_state: &GameState, legal: &mut Vec<ChessMove>) {
    let mover = game_state.side_to_move;
    let rank = mover.home_rank();
    let king_home = Square::new(KING_START_FILE, rank);
    let rook_home = Square::new(SHORT_ROOK_FILE, rank);

    let unmoved = |square: Square, kind: PieceKind| {
        matches!(game_state.piece_at(square), Some(p) if p.color == mover && p.kind == kind && p.first_move)
    };
    if !unmoved(king_home, PieceKind::King) || !unmoved(rook_home, PieceKind::Rook) {
        return;
    }

    let path = (KING_START_FILE + 1)..SHORT_ROOK_FILE;
    if path.into_iter().any(|file| !game_state.is_empty(Square::new(file, rank))) {
        return;
    }
    let crossed = KING_START_FILE..=SHORT_CASTLE_KING_FILE;
    if crossed
        .into_iter()
        .any(|file| is_square_attacked(game_state, Square::new(file, rank), mover.opposite()))
    {
        return;
    }

    legal.push(ChessMove::Castle {
        rank,
        king_to_file: SHORT_CASTLE_KING_FILE,
    });
}

fn push_drops(
    game_state: &mut GameState,
    king: Square,
    in_check: bool,
    legal: &mut Vec<ChessMove>,
) -> MoveGenResult<()> {
    let mover = game_state.side_to_move;

    // Distinct kinds, first-seen order.
    let mut kinds: Vec<PieceKind> = Vec::with_capacity(5);
    for piece in game_state.reserve(mover) {
        if !kinds.contains(&piece.kind) {
            kinds.push(piece.kind);
        }
    }
    if kinds.is_empty() {
        return Ok(());
    }

    for to in Square::all() {
        if !game_state.is_empty(to) {
            continue;
        }
        if in_check && !same_line(king, to) {
            continue;
        }
        for &kind in &kinds {
            if kind == PieceKind::Pawn && (to.rank == 1 || to.rank == 8) {
                continue;
            }
            let mv = ChessMove::DropIn { to, kind };
            if !in_check || leaves_king_safe(game_state, mv, king)? {
                legal.push(mv);
            }
        }
    }
    Ok(())
}
