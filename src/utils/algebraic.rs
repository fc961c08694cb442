//! Coordinate and piece-letter conversions shared by FEN and move notation.

use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::NotationError;

/// Convert a coordinate such as `"e4"` to a square.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, NotationError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(NotationError::InvalidSquare(square.to_owned()));
    }

    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(NotationError::InvalidSquare(square.to_owned()));
    }

    Ok(Square::new((file - b'a') as i8 + 1, (rank - b'1') as i8 + 1))
}

#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let file_char = char::from(b'a' + (square.file - 1) as u8);
    let rank_char = char::from(b'1' + (square.rank - 1) as u8);
    format!("{file_char}{rank_char}")
}

/// FEN letter: uppercase for light, lowercase for dark.
pub fn piece_to_char(kind: PieceKind, color: Color) -> char {
    let upper = match kind {
        PieceKind::Pawn => 'P',
        PieceKind::Knight => 'N',
        PieceKind::Bishop => 'B',
        PieceKind::Rook => 'R',
        PieceKind::Queen => 'Q',
        PieceKind::King => 'K',
    };
    match color {
        Color::Light => upper,
        Color::Dark => upper.to_ascii_lowercase(),
    }
}

pub fn piece_from_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };
    Some((color, kind))
}
