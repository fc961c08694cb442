//! Forced-win detection by checks only.
//!
//! The attacker may only play moves that give check; the defender is
//! searched in full but only while it has few replies. A line where the
//! defender has many replies is cut short: near the root it is scored by the
//! evaluator, deeper down it is abandoned. Table entries are stored under a
//! horizon tag offset from ordinary search horizons.

use tracing::trace;

use crate::game_state::{chess_types::Color, game_state::GameState};
use crate::move_generation::legal_move_apply::{apply_move, undo_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::move_generation::move_generator::MoveGenResult;
use crate::moves::move_descriptions::ChessMove;
use crate::search::board_scoring::{terminal_score, BoardScorer, MATE_SCORE};
use crate::search::iterative_deepening::{unswap_best, SearchContext, TableHint};
use crate::search::move_ordering::reorder_moves;
use crate::search::transposition_table::{TTEntry, TTFlag};

/// Added to the forced depth to form the table horizon tag.
pub const FORCED_HORIZON_OFFSET: u32 = 128;

/// A wide defender node at or below this remaining depth is scored statically.
const FORCED_EVAL_DEPTH: u32 = 5;

/// Root scores at or above this count as a forced win.
pub const FORCED_WIN_THRESHOLD: i32 = MATE_SCORE / 2;

#[derive(Debug, Clone, Copy)]
pub struct ForcedLimits {
    pub attacker: Color,
    pub max_replies: usize,
    pub horizon: u32,
}

/// Whether the side that just moved left the opponent in check.
#[inline]
fn gives_check(game_state: &GameState) -> MoveGenResult<bool> {
    is_king_in_check(game_state, game_state.side_to_move)
}

pub fn negamax_forced<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    game_state: &mut GameState,
    depth: u32,
    mut alpha: i32,
    beta: i32,
    limits: ForcedLimits,
) -> MoveGenResult<i32> {
    if ctx.timed_out {
        return Ok(-MATE_SCORE);
    }
    ctx.nodes += 1;

    if depth == 0 {
        ctx.check_clock();
        return ctx.scorer.score(game_state);
    }
    ctx.poll_clock();

    let mut moves = generate_legal_moves(game_state)?;
    if moves.is_empty() {
        return terminal_score(game_state);
    }

    let attacking = game_state.side_to_move == limits.attacker;
    if !attacking && moves.len() > limits.max_replies {
        ctx.check_clock();
        if depth <= FORCED_EVAL_DEPTH {
            return ctx.scorer.score(game_state);
        }
        return Ok(MATE_SCORE);
    }

    let hash = ctx.keys.hash(game_state);
    reorder_moves(game_state, &mut moves);
    let hint = ctx.probe(hash, &mut moves, depth, beta, limits.horizon);
    if let TableHint::Cutoff(score) = hint {
        return Ok(score);
    }
    let swapped_from = hint.swapped_from();

    let alpha_orig = alpha;
    let mut best = -MATE_SCORE;
    let mut best_pos = 0;
    let mut searched_any = false;

    for (pos, &mv) in moves.iter().enumerate() {
        let undo = apply_move(game_state, mv)?;
        if attacking && !gives_check(game_state)? {
            undo_move(game_state, &undo)?;
            continue;
        }

        let score = if !searched_any {
            -negamax_forced(ctx, game_state, depth - 1, -beta, -alpha, limits)?
        } else {
            let probe = -negamax_forced(ctx, game_state, depth - 1, -(alpha + 1), -alpha, limits)?;
            if probe > alpha && probe < beta && !ctx.timed_out {
                -negamax_forced(ctx, game_state, depth - 1, -beta, -alpha, limits)?
            } else {
                probe
            }
        };
        searched_any = true;
        undo_move(game_state, &undo)?;

        if ctx.timed_out {
            break;
        }
        if score > best {
            best = score;
            best_pos = pos;
            alpha = alpha.max(score);
        }
        if alpha >= beta {
            break;
        }
    }

    if ctx.timed_out {
        return Ok(-MATE_SCORE);
    }
    // Out of checks: the attack has fizzled.
    if !searched_any {
        return Ok(-MATE_SCORE);
    }

    let exact = swapped_from.is_none() && alpha_orig < best && best < beta;
    ctx.table.insert(TTEntry {
        hash,
        depth,
        max_depth: limits.horizon,
        score: best,
        best_index: unswap_best(best_pos, swapped_from),
        flag: if exact { TTFlag::Exact } else { TTFlag::UpperBound },
    });
    Ok(best)
}

/// Look for a checking root move that wins by force.
///
/// Clears the table first. Returns the first root move whose forced score
/// reaches `FORCED_WIN_THRESHOLD`, or `None` when no such move is proven
/// before the context's budget runs out.
pub fn try_force<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    game_state: &mut GameState,
    root_moves: &[ChessMove],
    forced_depth: u32,
    max_replies: usize,
) -> MoveGenResult<Option<(ChessMove, i32)>> {
    ctx.reset_timeout();
    ctx.table.clear();

    let limits = ForcedLimits {
        attacker: game_state.side_to_move,
        max_replies,
        horizon: FORCED_HORIZON_OFFSET + forced_depth,
    };
    let mut alpha = -MATE_SCORE;
    let beta = MATE_SCORE;
    let mut first = true;

    for &mv in root_moves {
        let undo = apply_move(game_state, mv)?;
        if !gives_check(game_state)? {
            undo_move(game_state, &undo)?;
            continue;
        }

        let score = if first {
            -negamax_forced(ctx, game_state, forced_depth, -beta, -alpha, limits)?
        } else {
            let probe = -negamax_forced(ctx, game_state, forced_depth, -(alpha + 1), -alpha, limits)?;
            if probe > alpha && !ctx.timed_out {
                -negamax_forced(ctx, game_state, forced_depth, -beta, -alpha, limits)?
            } else {
                probe
            }
        };
        first = false;
        undo_move(game_state, &undo)?;

        if ctx.timed_out {
            break;
        }
        trace!(score, "forced root move scored");
        if score >= FORCED_WIN_THRESHOLD {
            return Ok(Some((mv, score)));
        }
        alpha = alpha.max(score);
    }

    Ok(None)
}
