//! In-place move application with exact undo.
//!
//! `apply_move` mutates the board and returns the `UndoState` that
//! `undo_move` consumes to restore the prior position bit for bit,
//! including reserve order and first-move flags.

use crate::game_state::chess_rules::*;
use crate::game_state::{chess_types::*, game_state::GameState, undo_state::*};
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::move_descriptions::ChessMove;

pub fn apply_move(game_state: &mut GameState, mv: ChessMove) -> MoveGenResult<UndoState> {
    let mover = game_state.side_to_move;
    let prev_en_passant = game_state.en_passant;

    let detail = match mv {
        ChessMove::Simple { from, to } => UndoDetail::Simple(apply_simple(game_state, from, to, mover)?),
        ChessMove::Promotion { from, to, kind } => {
            let pawn = game_state
                .piece_at(from)
                .ok_or(MoveGenerationError::EmptySquare { square: from })?;
            game_state.put(from, Piece::promoted_to(kind, mover));
            let inner = apply_simple(game_state, from, to, mover)?;
            UndoDetail::Promotion { pawn, inner }
        }
        ChessMove::DropIn { to, kind } => {
            let reserve = &mut game_state.reserves[mover.index()];
            let reserve_index = reserve
                .iter()
                .position(|piece| piece.kind == kind)
                .ok_or(MoveGenerationError::MissingReserveEntry { color: mover, kind })?;
            let piece = reserve.remove(reserve_index);

            let mut placed = piece;
            placed.set_first_move(kind == PieceKind::Pawn && to.rank == mover.pawn_rank());
            game_state.put(to, placed);
            UndoDetail::DropIn { reserve_index, piece }
        }
        ChessMove::Castle { rank, king_to_file } => {
            let (rook_from, rook_to) = castle_rook_files(king_to_file)?;
            relocate(game_state, Square::new(KING_START_FILE, rank), Square::new(king_to_file, rank))?;
            relocate(game_state, Square::new(rook_from, rank), Square::new(rook_to, rank))?;
            UndoDetail::Castle
        }
    };

    game_state.en_passant = [None; 2];
    if let Some(passed) = double_advance_square(game_state, mv) {
        game_state.en_passant[mover.opposite().index()] = Some(passed);
    }
    game_state.side_to_move = mover.opposite();

    Ok(UndoState {
        mv,
        mover,
        prev_en_passant,
        detail,
    })
}

pub fn undo_move(game_state: &mut GameState, undo: &UndoState) -> MoveGenResult<()> {
    let mover = undo.mover;

    match (undo.mv, undo.detail) {
        (ChessMove::Simple { from, to }, UndoDetail::Simple(memento)) => {
            undo_simple(game_state, from, to, mover, memento)?;
        }
        (ChessMove::Promotion { from, to, .. }, UndoDetail::Promotion { pawn, inner }) => {
            undo_simple(game_state, from, to, mover, inner)?;
            game_state.put(from, pawn);
        }
        (ChessMove::DropIn { to, .. }, UndoDetail::DropIn { reserve_index, piece }) => {
            game_state.take(to);
            let reserve = &mut game_state.reserves[mover.index()];
            if reserve_index > reserve.len() {
                return Err(MoveGenerationError::InvalidState(format!(
                    "reserve index {reserve_index} out of range on undo"
                )));
            }
            reserve.insert(reserve_index, piece);
        }
        (ChessMove::Castle { rank, king_to_file }, UndoDetail::Castle) => {
            let (rook_from, rook_to) = castle_rook_files(king_to_file)?;
            let king_home = Square::new(KING_START_FILE, rank);
            let rook_home = Square::new(rook_from, rank);
            relocate(game_state, Square::new(king_to_file, rank), king_home)?;
            relocate(game_state, Square::new(rook_to, rank), rook_home)?;
            for square in [king_home, rook_home] {
                if let Some(piece) = game_state.piece_at_mut(square) {
                    piece.first_move = true;
                }
            }
        }
        (mv, detail) => {
            return Err(MoveGenerationError::InvalidState(format!(
                "undo record {detail:?} does not match move {mv:?}"
            )));
        }
    }

    game_state.en_passant = undo.prev_en_passant;
    game_state.side_to_move = mover;
    Ok(())
}

fn apply_simple(
    game_state: &mut GameState,
    from: Square,
    to: Square,
    mover: Color,
) -> MoveGenResult<CaptureMemento> {
    let mut moving = game_state
        .take(from)
        .ok_or(MoveGenerationError::EmptySquare { square: from })?;
    let prev_first_move = moving.first_move;

    let mut captured = game_state.take(to);
    let mut en_passant = false;
    if captured.is_none() && moving.kind == PieceKind::Pawn && from.file != to.file {
        captured = game_state.take(Square::new(to.file, from.rank));
        en_passant = captured.is_some();
    }

    if let Some(victim) = captured {
        let kind = if victim.promoted { PieceKind::Pawn } else { victim.kind };
        game_state.reserves[mover.index()].push(Piece::new(kind, mover));
    }

    moving.set_first_move(false);
    game_state.put(to, moving);

    Ok(CaptureMemento {
        captured,
        en_passant,
        prev_first_move,
    })
}

fn undo_simple(
    game_state: &mut GameState,
    from: Square,
    to: Square,
    mover: Color,
    memento: CaptureMemento,
) -> MoveGenResult<()> {
    let mut moving = game_state
        .take(to)
        .ok_or(MoveGenerationError::EmptySquare { square: to })?;
    moving.first_move = memento.prev_first_move;
    game_state.put(from, moving);

    if let Some(victim) = memento.captured {
        game_state.reserves[mover.index()]
            .pop()
            .ok_or(MoveGenerationError::MissingReserveEntry { color: mover, kind: victim.kind })?;
        let square = if memento.en_passant {
            Square::new(to.file, from.rank)
        } else {
            to
        };
        game_state.put(square, victim);
    }
    Ok(())
}

fn relocate(game_state: &mut GameState, from: Square, to: Square) -> MoveGenResult<()> {
    let mut piece = game_state
        .take(from)
        .ok_or(MoveGenerationError::EmptySquare { square: from })?;
    piece.set_first_move(false);
    game_state.put(to, piece);
    Ok(())
}

/// Rook (from, to) files for a castle landing the king on `king_to_file`.
fn castle_rook_files(king_to_file: i8) -> MoveGenResult<(i8, i8)> {
    match king_to_file {
        SHORT_CASTLE_KING_FILE => Ok((SHORT_ROOK_FILE, SHORT_CASTLE_KING_FILE - 1)),
        LONG_CASTLE_KING_FILE => Ok((LONG_ROOK_FILE, LONG_CASTLE_KING_FILE + 1)),
        other => Err(MoveGenerationError::InvalidState(format!(
            "no castle lands the king on file {other}"
        ))),
    }
}

/// Square passed over by a pawn double advance, checked after the move is on the board.
fn double_advance_square(game_state: &GameState, mv: ChessMove) -> Option<Square> {
    let ChessMove::Simple { from, to } = mv else {
        return None;
    };
    if (to.rank - from.rank).abs() != 2 || game_state.kind_at(to) != Some(PieceKind::Pawn) {
        return None;
    }
    Some(Square::new(from.file, (from.rank + to.rank) / 2))
}

#[cfg(test)]
mod tests {
    use super::{apply_move, undo_move};
    use crate::game_state::{chess_types::*, game_state::GameState};
    use crate::moves::move_descriptions::ChessMove;

    fn sq(file: i8, rank: i8) -> Square {
        Square::new(file, rank)
    }

    #[test]
    fn capture_goes_to_mover_reserve_recolored() {
        let mut game = GameState::from_fen("4k3/8/8/3p4/8/4N3/8/4K3[] w - - 0 1").expect("valid fen");
        let before = game.clone();
        let undo = apply_move(&mut game, ChessMove::Simple { from: sq(5, 3), to: sq(4, 5) }).expect("apply");

        assert_eq!(game.reserve(Color::Light).len(), 1);
        assert_eq!(game.reserve(Color::Light)[0].kind, PieceKind::Pawn);
        assert_eq!(game.reserve(Color::Light)[0].color, Color::Light);
        assert_eq!(game.side_to_move, Color::Dark);

        undo_move(&mut game, &undo).expect("undo");
        assert_eq!(game, before);
    }

    #[test]
    fn captured_promoted_piece_returns_as_pawn() {
        let mut game = GameState::from_fen("4k3/8/8/3Q~4/8/4n3/8/4K3[] b - - 0 1").expect("valid fen");
        assert!(game.piece_at(sq(4, 5)).expect("queen").promoted);
        let before = game.clone();

        let undo = apply_move(&mut game, ChessMove::Simple { from: sq(5, 3), to: sq(4, 5) }).expect("apply");
        let reserve = game.reserve(Color::Dark);
        assert_eq!(reserve.len(), 1);
        assert_eq!(reserve[0].kind, PieceKind::Pawn);
        assert!(!reserve[0].promoted);

        undo_move(&mut game, &undo).expect("undo");
        assert_eq!(game, before);
        let queen = game.piece_at(sq(4, 5)).expect("queen restored");
        assert_eq!(queen.kind, PieceKind::Queen);
        assert!(queen.promoted);
    }

    #[test]
    fn en_passant_restores_pawn_beside_destination() {
        let mut game = GameState::from_fen("4k3/3p4/8/4P3/8/8/8/4K3[] b - - 0 1").expect("valid fen");
        apply_move(&mut game, ChessMove::Simple { from: sq(4, 7), to: sq(4, 5) }).expect("double advance");
        assert_eq!(game.en_passant[Color::Light.index()], Some(sq(4, 6)));

        let before = game.clone();
        let undo = apply_move(&mut game, ChessMove::Simple { from: sq(5, 5), to: sq(4, 6) }).expect("ep");
        assert!(game.is_empty(sq(4, 5)));
        assert_eq!(game.reserve_count(Color::Light, PieceKind::Pawn), 1);
        assert_eq!(game.en_passant, [None, None]);

        undo_move(&mut game, &undo).expect("undo");
        assert_eq!(game, before);
    }

    #[test]
    fn pawn_dropped_on_start_rank_regains_double_advance() {
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[PN] w - - 0 1").expect("valid fen");
        let before = game.clone();

        let undo = apply_move(&mut game, ChessMove::DropIn { to: sq(1, 2), kind: PieceKind::Pawn }).expect("drop");
        assert!(game.piece_at(sq(1, 2)).expect("pawn").first_move);
        assert_eq!(game.reserve(Color::Light).len(), 1);
        undo_move(&mut game, &undo).expect("undo");
        assert_eq!(game, before);

        let undo = apply_move(&mut game, ChessMove::DropIn { to: sq(1, 3), kind: PieceKind::Pawn }).expect("drop");
        assert!(!game.piece_at(sq(1, 3)).expect("pawn").first_move);
        undo_move(&mut game, &undo).expect("undo");
        assert_eq!(game, before);
    }

    #[test]
    fn drop_undo_restores_reserve_order() {
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[NBN] w - - 0 1").expect("valid fen");
        let before = game.clone();
        let undo = apply_move(&mut game, ChessMove::DropIn { to: sq(4, 4), kind: PieceKind::Bishop }).expect("drop");
        assert_eq!(game.reserve(Color::Light).len(), 2);
        undo_move(&mut game, &undo).expect("undo");
        assert_eq!(game.reserve(Color::Light), before.reserve(Color::Light));
    }

    #[test]
    fn dropping_missing_kind_is_an_error() {
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[N] w - - 0 1").expect("valid fen");
        assert!(apply_move(&mut game, ChessMove::DropIn { to: sq(4, 4), kind: PieceKind::Rook }).is_err());
    }

    #[test]
    fn castles_restore_first_move_flags() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R[] w KQkq - 0 1").expect("valid fen");
        let before = game.clone();

        for king_to_file in [7, 3] {
            let undo = apply_move(&mut game, ChessMove::Castle { rank: 1, king_to_file }).expect("castle");
            let rook_file = if king_to_file == 7 { 6 } else { 4 };
            assert_eq!(game.kind_at(sq(king_to_file, 1)), Some(PieceKind::King));
            assert_eq!(game.kind_at(sq(rook_file, 1)), Some(PieceKind::Rook));
            assert!(!game.piece_at(sq(king_to_file, 1)).expect("king").first_move);
            undo_move(&mut game, &undo).expect("undo");
            assert_eq!(game, before);
        }
    }

    #[test]
    fn promotion_undo_restores_original_pawn() {
        let mut game = GameState::from_fen("1r2k3/P7/8/8/8/8/8/4K3[] w - - 0 1").expect("valid fen");
        let before = game.clone();
        let undo = apply_move(
            &mut game,
            ChessMove::Promotion { from: sq(1, 7), to: sq(2, 8), kind: PieceKind::Queen },
        )
        .expect("promote");

        let queen = game.piece_at(sq(2, 8)).expect("queen");
        assert_eq!(queen.kind, PieceKind::Queen);
        assert!(queen.promoted);
        assert_eq!(game.reserve_count(Color::Light, PieceKind::Rook), 1);

        undo_move(&mut game, &undo).expect("undo");
        assert_eq!(game, before);
    }
}
