//! Error types shared by generation, application, search and notation.

use thiserror::Error;

use crate::game_state::chess_types::{Color, GameState, PieceKind, Square};
use crate::moves::move_descriptions::ChessMove;

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

/// Broken generator/applier contract. Never expected for legal input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveGenerationError {
    #[error("no {kind:?} in the {color:?} reserve to drop")]
    MissingReserveEntry { color: Color, kind: PieceKind },

    #[error("no piece on {square:?} to move")]
    EmptySquare { square: Square },

    #[error("{color:?} king is missing from the board")]
    MissingKing { color: Color },

    #[error("invalid game state: {0}")]
    InvalidState(String),
}

/// Malformed coordinates, move strings or FEN.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid algebraic square: {0}")]
    InvalidSquare(String),

    #[error("invalid piece letter: {0}")]
    InvalidPiece(char),

    #[error("invalid move notation: {0}")]
    InvalidMove(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

/// Legal move source used by perft and by anything that wants to swap generators.
pub trait MoveGenerator {
    fn generate_legal_moves(&self, game_state: &mut GameState) -> MoveGenResult<Vec<ChessMove>>;
}
