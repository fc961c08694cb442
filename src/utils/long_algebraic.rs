//! Controller move notation: `e2e4`, `e7e8q`, `N@f3` and `resign`.

use crate::game_state::chess_types::{Color, PieceKind};
use crate::move_generation::move_generator::NotationError;
use crate::moves::move_descriptions::{ChessMove, GenericMove};
use crate::utils::algebraic::{algebraic_to_square, piece_from_char, piece_to_char, square_to_algebraic};

pub const RESIGN: &str = "resign";

pub fn parse_generic_move(text: &str) -> Result<GenericMove, NotationError> {
    let text = text.trim();
    if text == RESIGN {
        return Ok(GenericMove::resign());
    }

    if let Some((piece, square)) = text.split_once('@') {
        let mut letters = piece.chars();
        let kind = match (letters.next(), letters.next()) {
            (Some(ch), None) => piece_from_char(ch).map(|(_, kind)| kind),
            _ => None,
        };
        return match kind {
            Some(kind) if kind != PieceKind::King => Ok(GenericMove::drop_in(algebraic_to_square(square)?, kind)),
            _ => Err(NotationError::InvalidMove(text.to_owned())),
        };
    }

    if !text.is_ascii() || !(text.len() == 4 || text.len() == 5) {
        return Err(NotationError::InvalidMove(text.to_owned()));
    }
    let source = algebraic_to_square(&text[0..2])?;
    let destination = algebraic_to_square(&text[2..4])?;

    match text[4..].chars().next() {
        None => Ok(GenericMove::move_to(source, destination)),
        Some(ch) => match piece_from_char(ch) {
            Some((_, kind)) if kind != PieceKind::Pawn && kind != PieceKind::King => {
                Ok(GenericMove::promote(source, destination, kind))
            }
            _ => Err(NotationError::InvalidPiece(ch)),
        },
    }
}

pub fn generic_move_to_string(mv: GenericMove) -> String {
    match (mv.source, mv.destination, mv.replacement) {
        (_, None, _) => RESIGN.to_owned(),
        (None, Some(to), Some(kind)) => format!("{}@{}", piece_to_char(kind, Color::Light), square_to_algebraic(to)),
        (Some(from), Some(to), Some(kind)) => format!(
            "{}{}{}",
            square_to_algebraic(from),
            square_to_algebraic(to),
            piece_to_char(kind, Color::Dark)
        ),
        (Some(from), Some(to), None) => format!("{}{}", square_to_algebraic(from), square_to_algebraic(to)),
        (None, Some(_), None) => RESIGN.to_owned(),
    }
}

#[inline]
pub fn move_to_long_algebraic(mv: ChessMove) -> String {
    generic_move_to_string(mv.to_generic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Square;

    #[test]
    fn parses_every_move_shape() {
        assert_eq!(
            parse_generic_move("e2e4").expect("normal"),
            GenericMove::move_to(Square::new(5, 2), Square::new(5, 4))
        );
        assert_eq!(
            parse_generic_move("e7e8q").expect("promotion"),
            GenericMove::promote(Square::new(5, 7), Square::new(5, 8), PieceKind::Queen)
        );
        assert_eq!(
            parse_generic_move("N@f3").expect("drop"),
            GenericMove::drop_in(Square::new(6, 3), PieceKind::Knight)
        );
        assert!(parse_generic_move("resign").expect("resign").is_resign());
    }

    #[test]
    fn formats_back_to_the_same_text() {
        for text in ["e2e4", "a7a8n", "P@d5", "resign"] {
            let parsed = parse_generic_move(text).expect("valid move text");
            assert_eq!(generic_move_to_string(parsed), text);
        }
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(parse_generic_move("e2").is_err());
        assert!(parse_generic_move("e2e9").is_err());
        assert!(parse_generic_move("e7e8k").is_err());
        assert!(parse_generic_move("K@e4").is_err());
        assert!(parse_generic_move("NN@e4").is_err());
    }

    #[test]
    fn castle_prints_as_king_move() {
        let castle = ChessMove::Castle { rank: 1, king_to_file: 7 };
        assert_eq!(move_to_long_algebraic(castle), "e1g1");
    }
}
