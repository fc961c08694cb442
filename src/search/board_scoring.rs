//! Static evaluation of Crazyhouse positions.
//!
//! Search stays modular by delegating position scoring to `BoardScorer`.
//! Scores are always from the perspective of the side to move.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::king_moves::KING_OFFSETS;
use crate::moves::piece_vision::{piece_control, piece_vision};

/// Loss/win sentinel. Also returned by an aborted search.
pub const MATE_SCORE: i32 = 30000;

pub trait BoardScorer {
    /// Score from the perspective of the side to move.
    ///
    /// Takes the board mutably because terminal detection runs the legal
    /// move generator, which simulates moves in place.
    fn score(&self, game_state: &mut GameState) -> MoveGenResult<i32>;
}

#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 300,
        PieceKind::Bishop => 320,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

/// Value of a piece sitting in a reserve, before diminishing returns.
#[inline]
pub const fn reserve_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 110,
        PieceKind::Knight => 330,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 480,
        PieceKind::Queen => 880,
        PieceKind::King => 0,
    }
}

/// Penalty for a piece that is attacked and not defended.
#[inline]
pub const fn hanging_penalty(kind: PieceKind) -> i32 {
    let pawn = piece_value(PieceKind::Pawn);
    match kind {
        PieceKind::Pawn => pawn / 8,
        PieceKind::Knight | PieceKind::Bishop => pawn / 6,
        PieceKind::Rook => pawn / 4,
        PieceKind::Queen => pawn / 2,
        PieceKind::King => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalWeights {
    /// Per square of vision.
    pub mobility: i32,
    pub bishop_pair: i32,
    pub queen_attacked: i32,
    pub king_check: i32,
    /// Doubled for each undefended square next to a king that the enemy attacks.
    pub king_defense: i32,
    /// Per reserve piece, regardless of kind.
    pub big_hand_penalty: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            mobility: 3,
            bishop_pair: 30,
            queen_attacked: piece_value(PieceKind::Pawn) / 2,
            king_check: 25,
            king_defense: 10,
            big_hand_penalty: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CrazyhouseScorer {
    pub weights: EvalWeights,
}

/// Squares each side attacks or defends, indexed `[color][square]`.
struct ControlMap([[bool; 64]; 2]);

impl ControlMap {
    #[inline]
    fn covers(&self, color: Color, square: Square) -> bool {
        self.0[color.index()][square.index()]
    }
}

impl BoardScorer for CrazyhouseScorer {
    fn score(&self, game_state: &mut GameState) -> MoveGenResult<i32> {
        let us = game_state.side_to_move;
        let them = us.opposite();

        if generate_legal_moves(game_state)?.is_empty() {
            return terminal_score(game_state);
        }

        let w = &self.weights;
        let mut score = 0i32;
        let mut control = ControlMap([[false; 64]; 2]);
        let mut bishops = [0u8; 2];
        let mut squares = Vec::with_capacity(32);

        for (square, piece) in Square::all().filter_map(|sq| game_state.piece_at(sq).map(|p| (sq, p))) {
            squares.clear();
            piece_vision(game_state, square, piece, &mut squares);
            let mut piece_score = piece_value(piece.kind)
                + piece_square_bonus(piece.kind, piece.color, square)
                + squares.len() as i32 * w.mobility;

            squares.clear();
            piece_control(game_state, square, piece, &mut squares);
            for &seen in &squares {
                control.0[piece.color.index()][seen.index()] = true;
            }

            if piece.kind == PieceKind::Bishop {
                bishops[piece.color.index()] += 1;
            }
            if piece.color != us {
                piece_score = -piece_score;
            }
            score += piece_score;
        }

        for (square, piece) in Square::all().filter_map(|sq| game_state.piece_at(sq).map(|p| (sq, p))) {
            let sign = if piece.color == us { -1 } else { 1 };
            let enemy = piece.color.opposite();

            if control.covers(enemy, square) && !control.covers(piece.color, square) {
                score += sign * hanging_penalty(piece.kind);
                if piece.kind == PieceKind::Queen {
                    score += sign * w.queen_attacked;
                }
            }
        }

        if bishops[us.index()] > 1 {
            score += w.bishop_pair;
        }
        if bishops[them.index()] > 1 {
            score -= w.bishop_pair;
        }

        score -= king_safety(game_state, &control, us, w)?;
        score += king_safety(game_state, &control, them, w)?;

        score += reserve_term(game_state.reserve(us), w);
        score -= reserve_term(game_state.reserve(them), w);

        Ok(score)
    }
}

/// Score for a side with no legal moves: mated or stalemated.
pub fn terminal_score(game_state: &GameState) -> MoveGenResult<i32> {
    let us = game_state.side_to_move;
    let king = game_state
        .king_square(us)
        .ok_or(MoveGenerationError::MissingKing { color: us })?;
    if is_square_attacked(game_state, king, us.opposite()) {
        Ok(-MATE_SCORE)
    } else {
        Ok(0)
    }
}

/// Danger to `color`'s king; larger is worse for `color`.
fn king_safety(game_state: &GameState, control: &ControlMap, color: Color, w: &EvalWeights) -> MoveGenResult<i32> {
    let king = game_state
        .king_square(color)
        .ok_or(MoveGenerationError::MissingKing { color })?;
    let enemy = color.opposite();

    let mut danger = 0;
    if control.covers(enemy, king) {
        danger += w.king_check;
    }
    for (d_file, d_rank) in KING_OFFSETS {
        if let Some(sq) = king.offset(d_file, d_rank) {
            if control.covers(enemy, sq) && !control.covers(color, sq) {
                danger += w.king_defense * 2;
            }
        }
    }
    Ok(danger)
}

/// Each further piece of a kind is worth less; every piece held costs a flat penalty.
fn reserve_term(reserve: &[Piece], w: &EvalWeights) -> i32 {
    let mut seen = [0i32; 6];
    let mut total = 0;
    for piece in reserve {
        seen[piece.kind.index()] += 1;
        total += reserve_value(piece.kind) / seen[piece.kind.index()];
    }
    total - reserve.len() as i32 * w.big_hand_penalty
}

fn piece_square_bonus(kind: PieceKind, color: Color, square: Square) -> i32 {
    let file = i32::from(square.file - 1);
    // Ranks advanced from the owner's back rank.
    let r = match color {
        Color::Light => i32::from(square.rank - 1),
        Color::Dark => i32::from(8 - square.rank),
    };
    let dist_center = (file * 2 - 7).abs() / 2 + (r * 2 - 7).abs() / 2;
    let center_bonus = 3 - dist_center;

    match kind {
        PieceKind::Pawn => r * 6 - (file * 2 - 7).abs(),
        PieceKind::Knight => center_bonus * 6,
        PieceKind::Bishop => center_bonus * 3 + r,
        PieceKind::Rook => {
            if r == 6 {
                15
            } else {
                0
            }
        }
        PieceKind::Queen => center_bonus * 2,
        PieceKind::King => {
            // Drops make an exposed king fatal; stay home and tucked to a wing.
            if r == 0 {
                (file - 4).abs() * 4
            } else {
                -r * 15
            }
        }
    }
}
