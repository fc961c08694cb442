//! Canonical chess-rule constants.
//!
//! This module stores static rule-related literals such as the Crazyhouse
//! starting position FEN used to initialize and validate game state setup.

/// Crazyhouse starting position: standard setup, both reserves empty.
pub const STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[] w KQkq - 0 1";

/// Files the king lands on when castling.
pub const SHORT_CASTLE_KING_FILE: i8 = 7;
pub const LONG_CASTLE_KING_FILE: i8 = 3;

/// Kings and rooks start on these files.
pub const KING_START_FILE: i8 = 5;
pub const SHORT_ROOK_FILE: i8 = 8;
pub const LONG_ROOK_FILE: i8 = 1;
