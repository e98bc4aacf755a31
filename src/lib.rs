//! Crate root module declarations for the chess position and move-generation core.
//!
//! This file exposes the position model, precomputed geometry, legal move
//! generation, hashing and the text interfaces so binaries, benches, and
//! external tooling can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod line_of_sight;
    pub mod piece;
    pub mod undo_state;
}

pub mod moves {
    pub mod geometry;
    pub mod move_descriptions;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_slider;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod zobrist;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
