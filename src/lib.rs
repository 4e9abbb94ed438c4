//! Crate root module declarations for the Duel Chess game.
//!
//! The rules engine (board model, per-piece movement, check evaluation and
//! move execution) lives under `game_state`, `moves` and `move_generation`.
//! The `session` modules wrap it into two-player rooms driven by relayed
//! events.

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod queen_moves;
    pub mod rook_moves;
    pub mod sliding;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod move_generator;
    pub mod notation;
}

pub mod session {
    pub mod events;
    pub mod game_record;
    pub mod game_session;
    pub mod relay;
    pub mod rooms;
    pub mod session_config;
}

pub mod utils {
    pub mod algebraic;
    pub mod render_game_state;
    pub mod room_code;
}
