use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::ChessMove;

/// Capture bookkeeping shared by simple moves and promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureMemento {
    /// The piece object that was removed from the board, exactly as it stood.
    pub captured: Option<Piece>,
    /// Set when `captured` came from the en-passant square, not the destination.
    pub en_passant: bool,
    pub prev_first_move: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoDetail {
    Simple(CaptureMemento),
    Castle,
    Promotion {
        pawn: Piece,
        inner: CaptureMemento,
    },
    DropIn {
        reserve_index: usize,
        piece: Piece,
    },
}

/// Single undo record for `apply_move` / `undo_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub mv: ChessMove,
    pub mover: Color,
    pub prev_en_passant: [Option<Square>; 2],
    pub detail: UndoDetail,
}
