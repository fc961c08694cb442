//! Zobrist hashing of Crazyhouse positions.
//!
//! Keys come from a seeded `StdRng`, so a given seed always yields the same
//! hashes. The engine reseeds at the start of every top-level search; the
//! transposition table is cleared at the same time, so hashes never need to
//! agree across searches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::{chess_types::*, game_state::GameState};

/// Reserve counts at or above this share one key.
const RESERVE_COUNT_SLOTS: usize = 17;

#[derive(Debug, Clone)]
pub struct ZobristKeys {
    piece_square: [[[u64; 64]; 6]; 2],
    reserve_count: [[[u64; RESERVE_COUNT_SLOTS]; 6]; 2],
    side_to_move: u64,
}

impl ZobristKeys {
    pub fn new(seed: u64) -> Self {
        let mut keys = Self {
            piece_square: [[[0; 64]; 6]; 2],
            reserve_count: [[[0; RESERVE_COUNT_SLOTS]; 6]; 2],
            side_to_move: 0,
        };
        keys.reseed(seed);
        keys
    }

    /// Refill every key from a fresh generator seeded with `seed`.
    pub fn reseed(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);

        for color in &mut self.piece_square {
            for kind in color {
                for key in kind {
                    *key = rng.random();
                }
            }
        }
        for color in &mut self.reserve_count {
            for kind in color {
                for key in kind {
                    *key = rng.random();
                }
            }
        }
        self.side_to_move = rng.random();
    }

    #[inline]
    pub fn piece_square_key(&self, color: Color, kind: PieceKind, square: Square) -> u64 {
        self.piece_square[color.index()][kind.index()][square.index()]
    }

    #[inline]
    pub fn reserve_key(&self, color: Color, kind: PieceKind, count: usize) -> u64 {
        self.reserve_count[color.index()][kind.index()][count.min(RESERVE_COUNT_SLOTS - 1)]
    }

    /// XOR in when dark is to move.
    #[inline]
    pub fn side_to_move_key(&self) -> u64 {
        self.side_to_move
    }

    pub fn hash(&self, game_state: &GameState) -> u64 {
        let mut key = 0u64;

        for square in Square::all() {
            if let Some(piece) = game_state.piece_at(square) {
                key ^= self.piece_square_key(piece.color, piece.kind, square);
            }
        }

        for color in [Color::Light, Color::Dark] {
            let mut counts = [0usize; 6];
            for piece in game_state.reserve(color) {
                counts[piece.kind.index()] += 1;
            }
            for kind in ALL_PIECE_KINDS {
                let count = counts[kind.index()];
                if count > 0 {
                    key ^= self.reserve_key(color, kind, count);
                }
            }
        }

        if game_state.side_to_move == Color::Dark {
            key ^= self.side_to_move_key();
        }

        key
    }
}

#[cfg(test)]
mod tests {
    use super::ZobristKeys;
    use crate::game_state::game_state::GameState;

    #[test]
    fn same_seed_same_hash() {
        let game = GameState::new_game();
        assert_eq!(ZobristKeys::new(7).hash(&game), ZobristKeys::new(7).hash(&game));
        assert_ne!(ZobristKeys::new(7).hash(&game), ZobristKeys::new(8).hash(&game));
    }

    #[test]
    fn side_to_move_changes_hash() {
        let keys = ZobristKeys::new(1);
        let w = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[] w - - 0 1").expect("FEN should parse");
        let b = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[] b - - 0 1").expect("FEN should parse");
        assert_ne!(keys.hash(&w), keys.hash(&b));
    }

    #[test]
    fn identical_reserve_pieces_do_not_cancel() {
        let keys = ZobristKeys::new(1);
        let none = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[] w - - 0 1").expect("FEN should parse");
        let two = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[NN] w - - 0 1").expect("FEN should parse");
        let one = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[N] w - - 0 1").expect("FEN should parse");
        assert_ne!(keys.hash(&none), keys.hash(&two));
        assert_ne!(keys.hash(&one), keys.hash(&two));
    }

    #[test]
    fn reserve_order_does_not_matter() {
        let keys = ZobristKeys::new(3);
        let a = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[NBp] w - - 0 1").expect("FEN should parse");
        let b = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[pBN] w - - 0 1").expect("FEN should parse");
        assert_eq!(keys.hash(&a), keys.hash(&b));
    }
}
