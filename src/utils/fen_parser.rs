//! Crazyhouse FEN-to-GameState parser.
//!
//! Accepts standard FEN with a bracketed reserve appended to the board field
//! (`.../RNBQKBNR[Qn] w KQkq - 0 1`). A `~` after a piece letter marks a
//! promoted piece. First-move flags are derived: pawns on their starting
//! rank keep the double advance, kings and rooks keep theirs only where the
//! castling field says so. The clock fields are optional and ignored.

use crate::game_state::chess_rules::*;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::move_generator::NotationError;
use crate::utils::algebraic::{algebraic_to_square, piece_from_char};

fn invalid(msg: impl Into<String>) -> NotationError {
    NotationError::InvalidFen(msg.into())
}

pub fn parse_fen(fen: &str) -> Result<GameState, NotationError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side to move"))?;
    let castling_part = parts.next().unwrap_or("-");
    let en_passant_part = parts.next().unwrap_or("-");

    for clock in parts.by_ref().take(2) {
        clock
            .parse::<u32>()
            .map_err(|_| invalid(format!("invalid clock field: {clock}")))?;
    }
    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let mut game_state = GameState::new_empty();

    let (layout, reserve) = split_reserve(board_part)?;
    parse_board(layout, &mut game_state)?;
    parse_reserve(reserve, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    apply_castling_rights(castling_part, &mut game_state)?;

    if en_passant_part != "-" {
        let square = algebraic_to_square(en_passant_part)?;
        game_state.en_passant[game_state.side_to_move.index()] = Some(square);
    }

    Ok(game_state)
}

/// Split `layout[reserve]` into its two halves; a missing reserve is empty.
fn split_reserve(board_part: &str) -> Result<(&str, &str), NotationError> {
    match board_part.find('[') {
        None => Ok((board_part, "")),
        Some(open) => {
            let rest = &board_part[open + 1..];
            let reserve = rest
                .strip_suffix(']')
                .ok_or_else(|| invalid("unterminated reserve"))?;
            Ok((&board_part[..open], reserve))
        }
    }
}

fn parse_board(layout: &str, game_state: &mut GameState) -> Result<(), NotationError> {
    let ranks: Vec<&str> = layout.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 8 - fen_rank_idx as i8;
        let mut file = 1i8;
        let mut last_placed: Option<Square> = None;

        for ch in rank_str.chars() {
            if ch == '~' {
                let square = last_placed.ok_or_else(|| invalid("'~' must follow a piece"))?;
                if let Some(piece) = game_state.piece_at_mut(square) {
                    piece.promoted = true;
                    piece.first_move = false;
                }
                last_placed = None;
                continue;
            }

            if let Some(empty) = ch.to_digit(10) {
                if !(1..=8).contains(&empty) {
                    return Err(invalid(format!("invalid empty-square count '{ch}'")));
                }
                file += empty as i8;
                if file > 9 {
                    return Err(invalid("board rank has too many files"));
                }
                last_placed = None;
                continue;
            }

            let (color, kind) = piece_from_char(ch).ok_or(NotationError::InvalidPiece(ch))?;
            if file > 8 {
                return Err(invalid("board rank has too many files"));
            }

            let square = Square::new(file, rank);
            let mut piece = Piece::new(kind, color);
            // Kings and rooks get their flag back from the castling field.
            piece.set_first_move(kind == PieceKind::Pawn && rank == color.pawn_rank());
            game_state.put(square, piece);
            last_placed = Some(square);
            file += 1;
        }

        if file != 9 {
            return Err(invalid("board rank does not sum to 8 files"));
        }
    }

    Ok(())
}

fn parse_reserve(reserve: &str, game_state: &mut GameState) -> Result<(), NotationError> {
    if reserve == "-" {
        return Ok(());
    }
    for ch in reserve.chars() {
        let (color, kind) = piece_from_char(ch).ok_or(NotationError::InvalidPiece(ch))?;
        if kind == PieceKind::King {
            return Err(NotationError::InvalidPiece(ch));
        }
        game_state.reserves[color.index()].push(Piece::new(kind, color));
    }
    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, NotationError> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(invalid(format!("invalid side-to-move field: {side_part}"))),
    }
}

fn apply_castling_rights(castling_part: &str, game_state: &mut GameState) -> Result<(), NotationError> {
    if castling_part == "-" {
        return Ok(());
    }

    for ch in castling_part.chars() {
        let (color, rook_file) = match ch {
            'K' => (Color::Light, SHORT_ROOK_FILE),
            'Q' => (Color::Light, LONG_ROOK_FILE),
            'k' => (Color::Dark, SHORT_ROOK_FILE),
            'q' => (Color::Dark, LONG_ROOK_FILE),
            _ => return Err(invalid(format!("invalid castling rights character: {ch}"))),
        };
        let rank = color.home_rank();
        for (file, kind) in [(KING_START_FILE, PieceKind::King), (rook_file, PieceKind::Rook)] {
            let square = Square::new(file, rank);
            if !game_state.holds(square, color, kind) {
                return Err(invalid(format!("castling right '{ch}' without {kind:?} on its home square")));
            }
            if let Some(piece) = game_state.piece_at_mut(square) {
                piece.first_move = true;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::game_state::{chess_types::*, game_state::GameState};

    #[test]
    fn parses_starting_position() {
        let game = parse_fen(GameState::starting_fen()).expect("starting FEN should parse");
        assert_eq!(game, GameState::new_game());
    }

    #[test]
    fn parses_reserve_and_promoted_markers() {
        let game = parse_fen("4k3/8/8/3Q~4/8/8/8/4K3[PPn] b - - 0 30").expect("FEN should parse");
        let queen = game.piece_at(Square::new(4, 5)).expect("queen on d5");
        assert!(queen.promoted);
        assert_eq!(game.reserve_count(Color::Light, PieceKind::Pawn), 2);
        assert_eq!(game.reserve_count(Color::Dark, PieceKind::Knight), 1);
        assert_eq!(game.side_to_move, Color::Dark);
    }

    #[test]
    fn castling_field_controls_first_move_flags() {
        let game = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R[] w Kq - 0 1").expect("FEN should parse");
        assert!(game.piece_at(Square::new(8, 1)).expect("h1 rook").first_move);
        assert!(!game.piece_at(Square::new(1, 1)).expect("a1 rook").first_move);
        assert!(game.piece_at(Square::new(5, 1)).expect("e1 king").first_move);
        assert!(game.piece_at(Square::new(1, 8)).expect("a8 rook").first_move);
        assert!(!game.piece_at(Square::new(8, 8)).expect("h8 rook").first_move);
    }

    #[test]
    fn en_passant_target_belongs_to_side_to_move() {
        let game = parse_fen("4k3/8/8/3pP3/8/8/8/4K3[] w - d6 0 2").expect("FEN should parse");
        assert_eq!(game.en_passant[Color::Light.index()], Some(Square::new(4, 6)));
        assert_eq!(game.en_passant[Color::Dark.index()], None);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_fen("8/8/8 w - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3[Kx] w - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3[ w - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3[] x - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3[] w K - 0 1").is_err());
    }

    #[test]
    fn long_run_of_empty_counts_is_an_error() {
        let fen = format!("{}/8/8/8/8/8/8/4K3[] w - - 0 1", "8".repeat(16));
        assert!(parse_fen(&fen).is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K2r1[] w - - 0 1").is_err());
    }
}
