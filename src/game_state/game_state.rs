//! Mutable Crazyhouse board state.
//!
//! `GameState` owns an 8x8 grid of optional pieces, one reserve per side,
//! the side to move and the per-side en-passant target. Search never clones
//! it: moves are applied in place and rewound through `UndoState` records.

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::NotationError;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Indexed `[file - 1][rank - 1]`.
    pub board: [[Option<Piece>; 8]; 8],
    /// Captured pieces per side in capture order, already recolored to their owner.
    pub reserves: [Vec<Piece>; 2],
    pub side_to_move: Color,
    /// Square the indexed side may capture onto en passant.
    pub en_passant: [Option<Square>; 2],
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: [[None; 8]; 8],
            reserves: [Vec::with_capacity(32), Vec::with_capacity(32)],
            side_to_move: Color::Light,
            en_passant: [None; 2],
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn new_game() -> Self {
        let mut state = Self::new_empty();
        for file in 1..=8 {
            state.put(Square::new(file, 2), Piece::new(PieceKind::Pawn, Color::Light));
            state.put(Square::new(file, 7), Piece::new(PieceKind::Pawn, Color::Dark));
        }

        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for color in [Color::Light, Color::Dark] {
            for (file, kind) in (1..=8).zip(back_rank) {
                state.put(Square::new(file, color.home_rank()), Piece::new(kind, color));
            }
        }

        state
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, NotationError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn starting_fen() -> &'static str {
        STARTING_POSITION_FEN
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[(square.file - 1) as usize][(square.rank - 1) as usize]
    }

    #[inline]
    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.board[(square.file - 1) as usize][(square.rank - 1) as usize].as_mut()
    }

    #[inline]
    pub fn put(&mut self, square: Square, piece: Piece) {
        self.board[(square.file - 1) as usize][(square.rank - 1) as usize] = Some(piece);
    }

    #[inline]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.board[(square.file - 1) as usize][(square.rank - 1) as usize].take()
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    #[inline]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color)
    }

    #[inline]
    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        self.piece_at(square).map(|piece| piece.kind)
    }

    /// True when `square` holds a piece of the given color and kind.
    #[inline]
    pub fn holds(&self, square: Square, color: Color, kind: PieceKind) -> bool {
        matches!(self.piece_at(square), Some(p) if p.color == color && p.kind == kind)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.holds(sq, color, PieceKind::King))
    }

    /// Every occupied square holding a piece of `color`, file-major order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }

    #[inline]
    pub fn reserve(&self, color: Color) -> &[Piece] {
        &self.reserves[color.index()]
    }

    pub fn reserve_count(&self, color: Color, kind: PieceKind) -> usize {
        self.reserves[color.index()]
            .iter()
            .filter(|piece| piece.kind == kind)
            .count()
    }
}
