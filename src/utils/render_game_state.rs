//! Terminal-oriented Unicode board renderer for trace logs and debugging.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Render the board, light's reserve below it and dark's above.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();

    out.push_str(&render_reserve(game_state, Color::Dark));
    out.push_str("  a b c d e f g h\n");

    for rank in (1..=8).rev() {
        out.push(char::from(b'0' + rank as u8));
        out.push(' ');

        for file in 1..=8 {
            match game_state.piece_at(Square::new(file, rank)) {
                Some(piece) => out.push(piece_to_unicode(piece.color, piece.kind)),
                None => out.push('·'),
            }
            if file < 8 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'0' + rank as u8));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h\n");
    out.push_str(&render_reserve(game_state, Color::Light));
    out
}

fn render_reserve(game_state: &GameState, color: Color) -> String {
    let pieces: String = game_state
        .reserve(color)
        .iter()
        .map(|piece| piece_to_unicode(piece.color, piece.kind))
        .collect();
    format!("[{pieces}]\n")
}

fn piece_to_unicode(color: Color, piece: PieceKind) -> char {
    match (color, piece) {
        (Color::Light, PieceKind::Pawn) => '♙',
        (Color::Light, PieceKind::Knight) => '♘',
        (Color::Light, PieceKind::Bishop) => '♗',
        (Color::Light, PieceKind::Rook) => '♖',
        (Color::Light, PieceKind::Queen) => '♕',
        (Color::Light, PieceKind::King) => '♔',
        (Color::Dark, PieceKind::Pawn) => '♟',
        (Color::Dark, PieceKind::Knight) => '♞',
        (Color::Dark, PieceKind::Bishop) => '♝',
        (Color::Dark, PieceKind::Rook) => '♜',
        (Color::Dark, PieceKind::Queen) => '♛',
        (Color::Dark, PieceKind::King) => '♚',
    }
}

#[cfg(test)]
mod tests {
    use super::render_game_state;
    use crate::game_state::game_state::GameState;

    #[test]
    fn renders_board_and_reserves() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/4K3[Nq] w - - 0 1").expect("FEN should parse");
        let text = render_game_state(&game);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "[♛]");
        assert_eq!(lines[2], "8 · · · · ♚ · · · 8");
        assert_eq!(lines[11], "[♘]");
    }
}
