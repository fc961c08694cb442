//! The engine behind the controller: owns the board, the transposition
//! table and the hash keys, and turns search results into played moves.

use tracing::{error, info, trace};

use crate::engines::engine_config::{EngineConfig, OptionError};
use crate::engines::engine_trait::{Engine, GoParams};
use crate::engines::time_management::resolve_move_budget;
use crate::game_state::chess_rules::KING_START_FILE;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::move_descriptions::{ChessMove, GenericMove};
use crate::search::board_scoring::CrazyhouseScorer;
use crate::search::iterative_deepening::{search_best_move, SearchResult};
use crate::search::transposition_table::TranspositionTable;
use crate::search::zobrist::ZobristKeys;
use crate::utils::long_algebraic::generic_move_to_string;
use crate::utils::render_game_state::render_game_state;

pub struct CrazyhouseEngine {
    game_state: GameState,
    config: EngineConfig,
    scorer: CrazyhouseScorer,
    table: TranspositionTable,
    keys: ZobristKeys,
    /// Moves chosen by the engine this game.
    engine_moves: u32,
    last_result: Option<SearchResult>,
}

impl Default for CrazyhouseEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CrazyhouseEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            game_state: GameState::new_game(),
            config,
            scorer: CrazyhouseScorer::default(),
            table: TranspositionTable::new(config.tt_buckets, config.tt_bucket_capacity),
            keys: ZobristKeys::new(config.hash_seed),
            engine_moves: 0,
            last_result: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Outcome of the most recent `do_move` search.
    #[inline]
    pub fn last_result(&self) -> Option<SearchResult> {
        self.last_result
    }

    /// Replace the board, e.g. from a FEN the controller sent.
    pub fn set_game_state(&mut self, game_state: GameState) {
        self.game_state = game_state;
    }

    fn search(&mut self, params: &GoParams) -> MoveGenResult<SearchResult> {
        self.engine_moves += 1;
        let budget = resolve_move_budget(&self.config, self.engine_moves, params);
        let mut search_config = self.config.search_config(budget);
        if let Some(depth) = params.max_depth {
            search_config.max_depth = depth.max(2);
        }

        self.keys
            .reseed(self.config.hash_seed.wrapping_add(u64::from(self.engine_moves)));
        search_best_move(
            &mut self.game_state,
            &self.scorer,
            &mut self.table,
            &self.keys,
            search_config,
        )
    }
}

/// Turn a controller move into the engine's move kind for the current board.
///
/// A king stepping two files from its start square is a castle.
pub fn classify_move(game_state: &GameState, mv: GenericMove) -> MoveGenResult<ChessMove> {
    let invalid = || MoveGenerationError::InvalidState(format!("cannot classify move {mv:?}"));

    match (mv.source, mv.destination, mv.replacement) {
        (None, Some(to), Some(kind)) => Ok(ChessMove::DropIn { to, kind }),
        (Some(from), Some(to), Some(kind)) => Ok(ChessMove::Promotion { from, to, kind }),
        (Some(from), Some(to), None) => {
            let piece = game_state
                .piece_at(from)
                .ok_or(MoveGenerationError::EmptySquare { square: from })?;
            let is_castle = piece.kind == PieceKind::King
                && from.file == KING_START_FILE
                && from.rank == to.rank
                && (to.file - from.file).abs() == 2;
            if is_castle {
                Ok(ChessMove::Castle {
                    rank: from.rank,
                    king_to_file: to.file,
                })
            } else {
                Ok(ChessMove::Simple { from, to })
            }
        }
        _ => Err(invalid()),
    }
}

impl Engine for CrazyhouseEngine {
    fn new_game(&mut self) {
        self.game_state = GameState::new_game();
        self.engine_moves = 0;
        self.last_result = None;
        self.table.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        self.config.set_option(name, value)?;
        if matches!(name, "HashBuckets" | "HashBucketSize") {
            self.table = TranspositionTable::new(self.config.tt_buckets, self.config.tt_bucket_capacity);
        }
        Ok(())
    }

    fn game_state(&self) -> &GameState {
        &self.game_state
    }

    fn record_move(&mut self, mv: GenericMove, side: Color) -> MoveGenResult<()> {
        self.game_state.side_to_move = side;
        let chess_move = classify_move(&self.game_state, mv)?;
        apply_move(&mut self.game_state, chess_move)?;
        trace!(mv = %generic_move_to_string(mv), board = %render_game_state(&self.game_state), "recorded move");
        Ok(())
    }

    fn do_move(&mut self, side: Color, params: &GoParams) -> GenericMove {
        self.game_state.side_to_move = side;

        let result = match self.search(params) {
            Ok(result) => result,
            Err(err) => {
                error!(%err, "search failed, resigning");
                return GenericMove::resign();
            }
        };
        self.last_result = Some(result);

        let Some(best) = result.best_move else {
            info!(score = result.best_score, "no legal moves, resigning");
            return GenericMove::resign();
        };

        if let Err(err) = apply_move(&mut self.game_state, best) {
            error!(%err, "could not play chosen move, resigning");
            return GenericMove::resign();
        }

        let reply = best.to_generic();
        info!(
            mv = %generic_move_to_string(reply),
            score = result.best_score,
            depth = result.reached_depth,
            nodes = result.nodes,
            forced = result.forced,
            "engine move"
        );
        trace!(board = %render_game_state(&self.game_state), "after engine move");
        reply
    }
}
