//! Engine abstraction used by the protocol front-end.
//!
//! The controller only records moves that were played and asks for replies;
//! everything else stays behind this trait.

use crate::engines::engine_config::OptionError;
use crate::game_state::{chess_types::Color, game_state::GameState};
use crate::move_generation::move_generator::MoveGenResult;
use crate::moves::move_descriptions::GenericMove;

/// Per-request limits supplied by the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoParams {
    /// Exact time to spend on this move.
    pub move_time_ms: Option<u64>,
    /// Engine's remaining clock.
    pub time_left_ms: Option<u64>,
    pub max_depth: Option<u32>,
}

pub trait Engine {
    fn new_game(&mut self);

    fn set_option(&mut self, _name: &str, _value: &str) -> Result<(), OptionError> {
        Ok(())
    }

    fn game_state(&self) -> &GameState;

    /// Apply a move already played by `side`. The move is trusted to be legal.
    fn record_move(&mut self, mv: GenericMove, side: Color) -> MoveGenResult<()>;

    /// Choose, play and return a move for `side`. Resigns when there is none.
    fn do_move(&mut self, side: Color, params: &GoParams) -> GenericMove;
}
