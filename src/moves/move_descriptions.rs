//! Move representations.
//!
//! `ChessMove` is the engine-internal tagged move the generator produces and
//! `legal_move_apply` executes. `GenericMove` is the controller-facing shape
//! (source/destination/replacement) that notation is translated to and from.

use crate::game_state::chess_rules::KING_START_FILE;
use crate::game_state::chess_types::{PieceKind, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChessMove {
    Simple { from: Square, to: Square },
    /// King moves from the e-file to `king_to_file` on `rank`; the rook jumps over.
    Castle { rank: i8, king_to_file: i8 },
    Promotion { from: Square, to: Square, kind: PieceKind },
    DropIn { to: Square, kind: PieceKind },
}

impl ChessMove {
    /// Square the moving piece leaves, `None` for drops.
    #[inline]
    pub const fn start(self) -> Option<Square> {
        match self {
            ChessMove::Simple { from, .. } | ChessMove::Promotion { from, .. } => Some(from),
            ChessMove::Castle { rank, .. } => Some(Square::new(KING_START_FILE, rank)),
            ChessMove::DropIn { .. } => None,
        }
    }

    /// Square the moving (or dropped) piece lands on. For castles, the king's.
    #[inline]
    pub const fn end(self) -> Square {
        match self {
            ChessMove::Simple { to, .. }
            | ChessMove::Promotion { to, .. }
            | ChessMove::DropIn { to, .. } => to,
            ChessMove::Castle { rank, king_to_file } => Square::new(king_to_file, rank),
        }
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self, ChessMove::Castle { .. })
    }

    #[inline]
    pub const fn dropped_kind(self) -> Option<PieceKind> {
        match self {
            ChessMove::DropIn { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn to_generic(self) -> GenericMove {
        match self {
            ChessMove::Simple { from, to } => GenericMove::move_to(from, to),
            ChessMove::Castle { .. } => match self.start() {
                Some(from) => GenericMove::move_to(from, self.end()),
                None => GenericMove::resign(),
            },
            ChessMove::Promotion { from, to, kind } => GenericMove::promote(from, to, kind),
            ChessMove::DropIn { to, kind } => GenericMove::drop_in(to, kind),
        }
    }
}

/// Controller-facing move: castles are plain king moves, drops have no source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenericMove {
    pub source: Option<Square>,
    pub destination: Option<Square>,
    pub replacement: Option<PieceKind>,
}

impl GenericMove {
    #[inline]
    pub const fn move_to(source: Square, destination: Square) -> Self {
        Self {
            source: Some(source),
            destination: Some(destination),
            replacement: None,
        }
    }

    #[inline]
    pub const fn promote(source: Square, destination: Square, replacement: PieceKind) -> Self {
        Self {
            source: Some(source),
            destination: Some(destination),
            replacement: Some(replacement),
        }
    }

    #[inline]
    pub const fn drop_in(destination: Square, replacement: PieceKind) -> Self {
        Self {
            source: None,
            destination: Some(destination),
            replacement: Some(replacement),
        }
    }

    #[inline]
    pub const fn resign() -> Self {
        Self {
            source: None,
            destination: None,
            replacement: None,
        }
    }

    #[inline]
    pub const fn is_normal(&self) -> bool {
        self.source.is_some() && self.destination.is_some() && self.replacement.is_none()
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.source.is_some() && self.destination.is_some() && self.replacement.is_some()
    }

    #[inline]
    pub const fn is_drop_in(&self) -> bool {
        self.source.is_none() && self.destination.is_some() && self.replacement.is_some()
    }

    #[inline]
    pub const fn is_resign(&self) -> bool {
        self.destination.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChessMove, GenericMove};
    use crate::game_state::chess_types::{PieceKind, Square};

    #[test]
    fn castle_reports_king_squares() {
        let castle = ChessMove::Castle { rank: 8, king_to_file: 7 };
        assert_eq!(castle.start(), Some(Square::new(5, 8)));
        assert_eq!(castle.end(), Square::new(7, 8));
        assert_eq!(
            castle.to_generic(),
            GenericMove::move_to(Square::new(5, 8), Square::new(7, 8))
        );
    }

    #[test]
    fn generic_classification() {
        let drop = ChessMove::DropIn { to: Square::new(6, 3), kind: PieceKind::Knight }.to_generic();
        assert!(drop.is_drop_in());
        assert!(!drop.is_normal());

        let promo = GenericMove::promote(Square::new(5, 7), Square::new(5, 8), PieceKind::Queen);
        assert!(promo.is_promotion());
        assert!(GenericMove::resign().is_resign());
    }
}
