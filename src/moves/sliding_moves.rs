//! Shared ray and step walkers used by every piece's vision.
//!
//! Sliding pieces walk a ray until blocked; knights and kings visit a fixed
//! offset table. Both primitives clip to the board and never wrap. `Reach`
//! selects between move targets (friendly blockers excluded) and controlled
//! squares (friendly blockers included, used for defense maps).

use crate::game_state::{chess_types::*, game_state::GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    /// Squares the piece may move to, ignoring king safety.
    Moves,
    /// Squares the piece attacks or defends.
    Control,
}

/// Walk from `from` in `(d_file, d_rank)` steps until the first occupied square.
pub fn trace_ray(
    game_state: &GameState,
    from: Square,
    color: Color,
    (d_file, d_rank): (i8, i8),
    reach: Reach,
    out: &mut Vec<Square>,
) {
    let mut cursor = from.offset(d_file, d_rank);
    while let Some(sq) = cursor {
        match game_state.piece_at(sq) {
            None => out.push(sq),
            Some(blocker) => {
                if blocker.color != color || reach == Reach::Control {
                    out.push(sq);
                }
                break;
            }
        }
        cursor = sq.offset(d_file, d_rank);
    }
}

/// Visit each on-board offset once.
pub fn step_targets(
    game_state: &GameState,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    reach: Reach,
    out: &mut Vec<Square>,
) {
    for &(d_file, d_rank) in offsets {
        let Some(sq) = from.offset(d_file, d_rank) else {
            continue;
        };
        match game_state.color_at(sq) {
            Some(owner) if owner == color && reach == Reach::Moves => {}
            _ => out.push(sq),
        }
    }
}
