//! Perft: exhaustive legal-move tree counts over make/undo.

use crate::game_state::game_state::GameState;
use crate::game_state::undo_state::{UndoDetail, UndoState};
use crate::move_generation::legal_move_apply::{apply_move, undo_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub drops: usize,
    pub checks: usize,
}

impl PerftCounts {
    fn tally(&mut self, undo: &UndoState) {
        self.nodes += 1;
        match undo.detail {
            UndoDetail::Simple(memento) | UndoDetail::Promotion { inner: memento, .. } => {
                if memento.captured.is_some() {
                    self.captures += 1;
                }
                if memento.en_passant {
                    self.en_passant += 1;
                }
                if matches!(undo.detail, UndoDetail::Promotion { .. }) {
                    self.promotions += 1;
                }
            }
            UndoDetail::Castle => self.castles += 1,
            UndoDetail::DropIn { .. } => self.drops += 1,
        }
    }
}

pub fn perft<G: MoveGenerator>(generator: &G, game_state: &mut GameState, depth: u8) -> MoveGenResult<PerftCounts> {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return Ok(total);
    }
    perft_recurse(generator, game_state, depth, &mut total)?;
    Ok(total)
}

fn perft_recurse<G: MoveGenerator>(
    generator: &G,
    game_state: &mut GameState,
    depth: u8,
    total: &mut PerftCounts,
) -> MoveGenResult<()> {
    let moves = generator.generate_legal_moves(game_state)?;

    for mv in moves {
        let undo = apply_move(game_state, mv)?;
        if depth == 1 {
            total.tally(&undo);
            if is_king_in_check(game_state, game_state.side_to_move)? {
                total.checks += 1;
            }
        } else {
            perft_recurse(generator, game_state, depth - 1, total)?;
        }
        undo_move(game_state, &undo)?;
    }
    Ok(())
}

/// Per-root-move node counts, sorted by move for stable diffs against other engines.
pub fn perft_divide<G: MoveGenerator>(
    generator: &G,
    game_state: &mut GameState,
    depth: u8,
) -> MoveGenResult<Vec<(String, usize)>> {
    let moves = generator.generate_legal_moves(game_state)?;
    let mut out = Vec::with_capacity(moves.len());
    for mv in moves {
        let undo = apply_move(game_state, mv)?;
        let nodes = perft(generator, game_state, depth.saturating_sub(1))?.nodes;
        undo_move(game_state, &undo)?;
        out.push((crate::utils::long_algebraic::move_to_long_algebraic(mv), nodes));
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{perft, perft_divide};
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;

    #[test]
    fn start_position_perft_matches_reference_counts() {
        let mut game = GameState::new_game();
        assert_eq!(perft(&LegalMoveGenerator, &mut game, 1).expect("perft").nodes, 20);
        assert_eq!(perft(&LegalMoveGenerator, &mut game, 2).expect("perft").nodes, 400);

        let depth3 = perft(&LegalMoveGenerator, &mut game, 3).expect("perft");
        assert_eq!(depth3.nodes, 8902);
        assert_eq!(depth3.captures, 34);
        assert_eq!(depth3.checks, 12);
        assert_eq!(game, GameState::new_game());
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut game = GameState::new_game();
        let divide = perft_divide(&LegalMoveGenerator, &mut game, 2).expect("divide");
        assert_eq!(divide.len(), 20);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<usize>(), 400);
    }
}
