//! Crate root module declarations for the zh_chess Crazyhouse engine.
//!
//! Exposes the board model, move generation, search, the engine wrapper and
//! the XBoard front-end so the binary, benches and tests share stable paths.

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod undo_state;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod move_descriptions;
    pub mod pawn_moves;
    pub mod piece_vision;
    pub mod queen_moves;
    pub mod rook_moves;
    pub mod sliding_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod forced_mate;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod engines {
    pub mod crazyhouse_engine;
    pub mod engine_config;
    pub mod engine_trait;
    pub mod time_management;
}

pub mod xboard {
    pub mod xboard_top;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
