//! Core value types shared by every subsystem: sides, piece kinds, squares
//! and the per-piece capability record stored on the board and in reserves.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Rank direction pawns of this side advance in.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => -1,
        }
    }

    /// Rank the side's pieces start on.
    #[inline]
    pub const fn home_rank(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => 8,
        }
    }

    /// Rank the side's pawns start on (and receive double-advance rights on when dropped).
    #[inline]
    pub const fn pawn_rank(self) -> i8 {
        match self {
            Color::Light => 2,
            Color::Dark => 7,
        }
    }
}

/// Piece kind (color is represented separately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

pub const ALL_PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Only these kinds track whether they have moved.
    #[inline]
    pub const fn tracks_first_move(self) -> bool {
        matches!(self, PieceKind::Pawn | PieceKind::Rook | PieceKind::King)
    }
}

/// Board coordinate with file and rank both in `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub file: i8,
    pub rank: i8,
}

impl Square {
    #[inline]
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    #[inline]
    pub const fn is_on_board(file: i8, rank: i8) -> bool {
        file >= 1 && file <= 8 && rank >= 1 && rank <= 8
    }

    /// Step by `(d_file, d_rank)`, returning `None` once off the board.
    #[inline]
    pub const fn offset(self, d_file: i8, d_rank: i8) -> Option<Square> {
        let file = self.file + d_file;
        let rank = self.rank + d_rank;
        if Self::is_on_board(file, rank) {
            Some(Square { file, rank })
        } else {
            None
        }
    }

    /// Dense `0..64` index, `a1 == 0`, `h8 == 63`.
    #[inline]
    pub const fn index(self) -> usize {
        ((self.rank - 1) as usize) * 8 + (self.file - 1) as usize
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (1..=8).flat_map(|file| (1..=8).map(move |rank| Square::new(file, rank)))
    }
}

/// A piece with its Crazyhouse bookkeeping flags.
///
/// `first_move` is only ever true for pawns, rooks and kings that have not
/// moved yet. `promoted` marks pieces created by promotion; they go back to a
/// reserve as plain pawns when captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub first_move: bool,
    pub promoted: bool,
}

impl Piece {
    /// A piece in its initial, unmoved state.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            first_move: kind.tracks_first_move(),
            promoted: false,
        }
    }

    #[inline]
    pub const fn promoted_to(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            first_move: false,
            promoted: true,
        }
    }

    #[inline]
    pub fn set_first_move(&mut self, value: bool) {
        self.first_move = value && self.kind.tracks_first_move();
    }
}
