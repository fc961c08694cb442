//! GameState-to-Crazyhouse-FEN writer, the inverse of `fen_parser`.
//!
//! Clocks are not tracked, so they are always written as `0 1`.

use crate::game_state::chess_rules::*;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::{piece_to_char, square_to_algebraic};

pub fn generate_fen(game_state: &GameState) -> String {
    let side_to_move = match game_state.side_to_move {
        Color::Light => "w",
        Color::Dark => "b",
    };
    let en_passant = game_state.en_passant[game_state.side_to_move.index()]
        .map(square_to_algebraic)
        .unwrap_or_else(|| "-".to_owned());

    format!(
        "{}[{}] {} {} {} 0 1",
        generate_board_field(game_state),
        generate_reserve_field(game_state),
        side_to_move,
        generate_castling_field(game_state),
        en_passant,
    )
}

fn generate_board_field(game_state: &GameState) -> String {
    let mut out = String::new();

    for rank in (1..=8).rev() {
        let mut empty_count = 0u8;

        for file in 1..=8 {
            match game_state.piece_at(Square::new(file, rank)) {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece_to_char(piece.kind, piece.color));
                    if piece.promoted {
                        out.push('~');
                    }
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }
        if rank > 1 {
            out.push('/');
        }
    }

    out
}

fn generate_reserve_field(game_state: &GameState) -> String {
    [Color::Light, Color::Dark]
        .into_iter()
        .flat_map(|color| game_state.reserve(color).iter())
        .map(|piece| piece_to_char(piece.kind, piece.color))
        .collect()
}

fn generate_castling_field(game_state: &GameState) -> String {
    let unmoved = |square: Square, color: Color, kind: PieceKind| {
        matches!(game_state.piece_at(square), Some(p) if p.color == color && p.kind == kind && p.first_move)
    };

    let mut out = String::new();
    for color in [Color::Light, Color::Dark] {
        let rank = color.home_rank();
        if !unmoved(Square::new(KING_START_FILE, rank), color, PieceKind::King) {
            continue;
        }
        for (rook_file, letter) in [(SHORT_ROOK_FILE, 'K'), (LONG_ROOK_FILE, 'Q')] {
            if unmoved(Square::new(rook_file, rank), color, PieceKind::Rook) {
                out.push(match color {
                    Color::Light => letter,
                    Color::Dark => letter.to_ascii_lowercase(),
                });
            }
        }
    }

    if out.is_empty() {
        out.push('-');
    }
    out
}
