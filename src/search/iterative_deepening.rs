//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Every node searches its first move with the full window and the rest with
//! a null window, re-searching when the null-window result lands strictly
//! inside `(alpha, beta)`. The board is mutated in place and rewound after
//! each child. Cancellation is cooperative: once the clock runs out every
//! node returns the `-MATE_SCORE` sentinel and stores nothing.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{apply_move, undo_move};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::move_generation::move_generator::MoveGenResult;
use crate::moves::move_descriptions::ChessMove;
use crate::search::board_scoring::{terminal_score, BoardScorer, MATE_SCORE};
use crate::search::forced_mate::try_force;
use crate::search::move_ordering::reorder_moves;
use crate::search::transposition_table::{TTEntry, TTFlag, TranspositionTable};
use crate::search::zobrist::ZobristKeys;
use crate::utils::long_algebraic::move_to_long_algebraic;

/// The clock is read at every leaf and additionally once per this many nodes.
const CLOCK_POLL_MASK: u64 = 2047;

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub max_depth: u32,
    pub move_time: Duration,
    pub forced_search: bool,
    pub forced_depth: u32,
    /// Defender nodes with more replies than this are not treated as forced.
    pub forced_max_replies: usize,
    pub forced_time: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 20,
            move_time: Duration::from_millis(7000),
            forced_search: true,
            forced_depth: 7,
            forced_max_replies: 4,
            forced_time: Duration::from_millis(600),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResult {
    pub best_move: Option<ChessMove>,
    pub best_score: i32,
    /// Deepest iteration that ran to completion.
    pub reached_depth: u32,
    pub nodes: u64,
    pub timed_out: bool,
    /// Chosen by the forced-mate pre-search.
    pub forced: bool,
}

/// Per-search resources and the cooperative timeout flag.
pub struct SearchContext<'a, S: BoardScorer> {
    pub scorer: &'a S,
    pub table: &'a mut TranspositionTable,
    pub keys: &'a ZobristKeys,
    pub nodes: u64,
    pub timed_out: bool,
    start: Instant,
    budget: Duration,
}

impl<'a, S: BoardScorer> SearchContext<'a, S> {
    pub fn new(scorer: &'a S, table: &'a mut TranspositionTable, keys: &'a ZobristKeys, budget: Duration) -> Self {
        Self {
            scorer,
            table,
            keys,
            nodes: 0,
            timed_out: false,
            start: Instant::now(),
            budget,
        }
    }

    /// Budget measured from the moment the context was created.
    pub fn set_budget(&mut self, budget: Duration) {
        self.budget = budget;
    }

    pub fn reset_timeout(&mut self) {
        self.timed_out = false;
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn check_clock(&mut self) {
        if self.start.elapsed() >= self.budget {
            self.timed_out = true;
        }
    }

    #[inline]
    pub fn poll_clock(&mut self) {
        if self.nodes & CLOCK_POLL_MASK == 0 {
            self.check_clock();
        }
    }

    /// Consult the table before searching a node.
    pub(crate) fn probe(
        &mut self,
        hash: u64,
        moves: &mut [ChessMove],
        remaining: u32,
        beta: i32,
        max_depth: u32,
    ) -> TableHint {
        let Some(entry) = self.table.lookup(hash) else {
            return TableHint::Miss;
        };
        if entry.best_index >= moves.len() {
            return TableHint::Miss;
        }
        if entry.usable_for_cutoff(max_depth, remaining, beta, moves.len()) {
            return TableHint::Cutoff(entry.score);
        }
        moves.swap(0, entry.best_index);
        TableHint::Reordered(entry.best_index)
    }
}

/// Outcome of a table probe at a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableHint {
    Miss,
    /// The stored score settles the node.
    Cutoff(i32),
    /// The stored best move was swapped to the front from this index.
    Reordered(usize),
}

impl TableHint {
    #[inline]
    pub(crate) fn swapped_from(self) -> Option<usize> {
        match self {
            TableHint::Reordered(idx) => Some(idx),
            _ => None,
        }
    }
}

/// Translate a best-move position found after the table swap back to the
/// order the move list had before it.
#[inline]
pub(crate) fn unswap_best(best_pos: usize, swapped_from: Option<usize>) -> usize {
    match swapped_from {
        Some(tt_best) if best_pos == 0 => tt_best,
        Some(tt_best) if best_pos == tt_best => 0,
        _ => best_pos,
    }
}

/// Full move choice: optional forced-mate pre-search, then iterative deepening.
///
/// The table is cleared before each phase. Returns no move only when the
/// side to move has no legal moves.
pub fn search_best_move<S: BoardScorer>(
    game_state: &mut GameState,
    scorer: &S,
    table: &mut TranspositionTable,
    keys: &ZobristKeys,
    config: SearchConfig,
) -> MoveGenResult<SearchResult> {
    let mut ctx = SearchContext::new(scorer, table, keys, config.move_time);

    let mut moves = generate_legal_moves(game_state)?;
    if moves.is_empty() {
        return Ok(SearchResult {
            best_score: terminal_score(game_state)?,
            nodes: 1,
            ..SearchResult::default()
        });
    }
    reorder_moves(game_state, &mut moves);

    if config.forced_search {
        ctx.set_budget(config.forced_time);
        let forced = try_force(&mut ctx, game_state, &moves, config.forced_depth, config.forced_max_replies)?;
        let elapsed_ms = ctx.elapsed().as_millis() as u64;
        if let Some((mv, score)) = forced {
            debug!(
                best = %move_to_long_algebraic(mv),
                score,
                nodes = ctx.nodes,
                elapsed_ms,
                "forced win found"
            );
            return Ok(SearchResult {
                best_move: Some(mv),
                best_score: score,
                reached_depth: config.forced_depth,
                nodes: ctx.nodes,
                timed_out: false,
                forced: true,
            });
        }
        debug!(elapsed_ms, "no forced win");
        ctx.reset_timeout();
        ctx.set_budget(config.move_time);
    }

    ctx.table.clear();
    iterative_deepening(&mut ctx, game_state, moves, config.max_depth)
}

/// Root loop over increasing depth limits starting at 2.
pub fn iterative_deepening<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    game_state: &mut GameState,
    moves: Vec<ChessMove>,
    max_depth: u32,
) -> MoveGenResult<SearchResult> {
    let mut scored: Vec<(ChessMove, i32)> = moves.into_iter().map(|mv| (mv, 0)).collect();
    let mut result = SearchResult::default();

    for depth in 2..=max_depth.max(2) {
        let mut alpha = -MATE_SCORE;
        let beta = MATE_SCORE;
        let mut completed: Vec<usize> = Vec::with_capacity(scored.len());

        for (idx, entry) in scored.iter_mut().enumerate() {
            if entry.1 == -MATE_SCORE {
                continue;
            }

            let undo = apply_move(game_state, entry.0)?;
            let score = if completed.is_empty() || depth == 2 {
                -negamax(ctx, game_state, depth - 1, -beta, -alpha, depth)?
            } else {
                let probe = -negamax(ctx, game_state, depth - 1, -(alpha + 1), -alpha, depth)?;
                if probe > alpha && !ctx.timed_out {
                    -negamax(ctx, game_state, depth - 1, -beta, -alpha, depth)?
                } else {
                    probe
                }
            };
            undo_move(game_state, &undo)?;

            if ctx.timed_out {
                break;
            }
            entry.1 = score;
            completed.push(idx);
            alpha = alpha.max(score);
        }

        let elapsed_ms = ctx.elapsed().as_millis() as u64;
        if ctx.timed_out {
            if let Some(&best) = completed.iter().find(|&&i| scored[i].1 == alpha) {
                scored.swap(0, best);
            }
            result.timed_out = true;
            let (best, score) = scored[0];
            debug!(
                depth,
                completed = completed.len(),
                best = %move_to_long_algebraic(best),
                score,
                nodes = ctx.nodes,
                elapsed_ms,
                "iteration aborted"
            );
            break;
        }

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        result.reached_depth = depth;
        let (best, score) = scored[0];
        debug!(
            depth,
            best = %move_to_long_algebraic(best),
            score,
            nodes = ctx.nodes,
            elapsed_ms,
            "iteration complete"
        );

        // A proven win cannot improve with depth.
        if score >= MATE_SCORE {
            break;
        }
    }

    if let Some(&(best_move, best_score)) = scored.first() {
        result.best_move = Some(best_move);
        result.best_score = best_score;
    }
    result.nodes = ctx.nodes;
    Ok(result)
}

/// Negamax with alpha-beta, principal-variation windows and table reuse.
///
/// `max_depth` is the horizon of the current iteration; table entries from
/// other horizons only influence move order.
pub fn negamax<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    game_state: &mut GameState,
    depth: u32,
    mut alpha: i32,
    beta: i32,
    max_depth: u32,
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

    let hash = ctx.keys.hash(game_state);
    reorder_moves(game_state, &mut moves);
    let hint = ctx.probe(hash, &mut moves, depth, beta, max_depth);
    if let TableHint::Cutoff(score) = hint {
        return Ok(score);
    }
    let swapped_from = hint.swapped_from();

    let alpha_orig = alpha;
    let mut best = -MATE_SCORE;
    let mut best_pos = 0;

    for (pos, &mv) in moves.iter().enumerate() {
        let undo = apply_move(game_state, mv)?;
        let score = if pos == 0 {
            -negamax(ctx, game_state, depth - 1, -beta, -alpha, max_depth)?
        } else {
            let probe = -negamax(ctx, game_state, depth - 1, -(alpha + 1), -alpha, max_depth)?;
            if probe > alpha && probe < beta && !ctx.timed_out {
                -negamax(ctx, game_state, depth - 1, -beta, -alpha, max_depth)?
            } else {
                probe
            }
        };
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

    let exact = swapped_from.is_none() && alpha_orig < best && best < beta;
    ctx.table.insert(TTEntry {
        hash,
        depth,
        max_depth,
        score: best,
        best_index: unswap_best(best_pos, swapped_from),
        flag: if exact { TTFlag::Exact } else { TTFlag::UpperBound },
    });
    Ok(best)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{negamax, search_best_move, SearchConfig, SearchContext};
    use crate::game_state::{chess_types::*, game_state::GameState};
    use crate::move_generation::legal_move_apply::apply_move;
    use crate::moves::move_descriptions::ChessMove;
    use crate::search::board_scoring::{BoardScorer, CrazyhouseScorer, MATE_SCORE};
    use crate::search::transposition_table::{TTEntry, TTFlag, TranspositionTable};
    use crate::search::zobrist::ZobristKeys;

    fn quick_config(max_depth: u32) -> SearchConfig {
        SearchConfig {
            max_depth,
            move_time: Duration::from_secs(30),
            forced_search: false,
            ..SearchConfig::default()
        }
    }

    fn search(fen: &str, config: SearchConfig) -> (GameState, super::SearchResult) {
        let mut game = GameState::from_fen(fen).expect("valid fen");
        let mut table = TranspositionTable::new(1 << 12, 4);
        let keys = ZobristKeys::new(11);
        let result = search_best_move(&mut game, &CrazyhouseScorer::default(), &mut table, &keys, config)
            .expect("search succeeds");
        (game, result)
    }

    #[test]
    fn finds_back_rank_mate_in_one() {
        let fen = "7k/8/6K1/8/8/8/8/R7[] w - - 0 1";
        let (game, result) = search(fen, quick_config(3));
        assert_eq!(
            result.best_move,
            Some(ChessMove::Simple { from: Square::new(1, 1), to: Square::new(1, 8) })
        );
        assert_eq!(result.best_score, MATE_SCORE);
        assert_eq!(game, GameState::from_fen(fen).expect("valid fen"));
    }

    #[test]
    fn takes_a_hanging_queen() {
        let fen = "4k3/8/8/3q4/8/8/3R4/4K3[] w - - 0 1";
        let (_, result) = search(fen, quick_config(2));
        assert_eq!(
            result.best_move,
            Some(ChessMove::Simple { from: Square::new(4, 2), to: Square::new(4, 5) })
        );
        assert!(result.best_score > 500);
        assert_eq!(result.reached_depth, 2);
    }

    #[test]
    fn deeper_search_keeps_a_dominant_best_move() {
        let fen = "4k3/8/8/3q4/8/8/3R4/4K3[] w - - 0 1";
        let (_, shallow) = search(fen, quick_config(2));
        let (_, deep) = search(fen, quick_config(3));
        assert_eq!(deep.reached_depth, 3);

        let static_after = |mv: ChessMove| {
            let mut game = GameState::from_fen(fen).expect("valid fen");
            apply_move(&mut game, mv).expect("apply");
            -CrazyhouseScorer::default().score(&mut game).expect("eval")
        };
        let shallow_best = shallow.best_move.expect("move at depth 2");
        let deep_best = deep.best_move.expect("move at depth 3");
        assert_eq!(deep_best, shallow_best);
        assert!(static_after(deep_best) >= static_after(shallow_best));
        assert!(deep.best_score > 500);
    }

    #[test]
    fn no_moves_returns_no_move() {
        let (_, result) = search("7k/5Q2/6K1/8/8/8/8/8[] b - - 0 1", quick_config(3));
        assert_eq!(result.best_move, None);
        assert_eq!(result.best_score, 0);
    }

    #[test]
    fn zero_budget_still_returns_a_move() {
        let config = SearchConfig {
            move_time: Duration::ZERO,
            ..quick_config(20)
        };
        let (game, result) = search(GameState::starting_fen(), config);
        assert!(result.best_move.is_some());
        assert!(result.timed_out);
        assert_eq!(game, GameState::new_game());
    }

    #[test]
    fn depth_zero_is_static_eval() {
        let mut game = GameState::new_game();
        let mut table = TranspositionTable::new(64, 4);
        let keys = ZobristKeys::new(1);
        let scorer = CrazyhouseScorer::default();
        let mut ctx = SearchContext::new(&scorer, &mut table, &keys, Duration::from_secs(5));
        let score = negamax(&mut ctx, &mut game, 0, -MATE_SCORE, MATE_SCORE, 0).expect("search");
        assert_eq!(score, scorer.score(&mut GameState::new_game()).expect("eval"));
    }

    #[test]
    fn exact_entry_settles_node_only_for_its_horizon() {
        let fen = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R[] w KQkq - 4 4";
        let mut game = GameState::from_fen(fen).expect("valid fen");
        let scorer = CrazyhouseScorer::default();
        let keys = ZobristKeys::new(5);
        let mut table = TranspositionTable::new(1 << 12, 4);
        table.insert(TTEntry {
            hash: keys.hash(&game),
            depth: 1,
            max_depth: 1,
            score: 1234,
            best_index: 0,
            flag: TTFlag::Exact,
        });

        let mut ctx = SearchContext::new(&scorer, &mut table, &keys, Duration::from_secs(60));
        let cached = negamax(&mut ctx, &mut game, 1, -MATE_SCORE, MATE_SCORE, 1).expect("search");
        assert_eq!(cached, 1234);

        let other_horizon = negamax(&mut ctx, &mut game, 1, -MATE_SCORE, MATE_SCORE, 2).expect("search");
        assert_ne!(other_horizon, 1234);
        assert_eq!(game, GameState::from_fen(fen).expect("valid fen"));
    }

    #[test]
    fn repeated_searches_are_deterministic() {
        let fen = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R[] w KQkq - 4 4";
        let (_, a) = search(fen, quick_config(2));
        let (_, b) = search(fen, quick_config(2));
        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.best_score, b.best_score);
        assert_eq!(a.nodes, b.nodes);
    }
}
