//! Long algebraic move text (`e2e4`, `e7e8q`).
//!
//! Text is resolved against the legal moves of the given position, so the
//! returned `Move` carries the right kind (castle, en passant, promotion).

use crate::errors::NotationError;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_moves;
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::algebraic_to_square;

pub fn move_to_long_algebraic(mv: Move) -> String {
    mv.to_string()
}

pub fn long_algebraic_to_move(
    long_algebraic: &str,
    game_state: &GameState,
) -> Result<Move, NotationError> {
    if !long_algebraic.is_ascii() || !(4..=5).contains(&long_algebraic.len()) {
        return Err(NotationError::InvalidLength(long_algebraic.to_owned()));
    }

    let from = algebraic_to_square(&long_algebraic[0..2])?;
    let to = algebraic_to_square(&long_algebraic[2..4])?;
    let promotion = match long_algebraic[4..].chars().next() {
        Some(ch) => Some(parse_promotion(ch)?),
        None => None,
    };

    generate_moves(game_state)
        .into_iter()
        .find(|mv| mv.start() == from && mv.end() == to && mv.promotion() == promotion)
        .ok_or_else(|| NotationError::IllegalMove(long_algebraic.to_owned()))
}

fn parse_promotion(ch: char) -> Result<PieceKind, NotationError> {
    match PieceKind::from_letter(ch) {
        Some(kind) if ch.is_ascii_lowercase() && PROMOTION_KINDS.contains(&kind) => Ok(kind),
        _ => Err(NotationError::InvalidPromotion(ch)),
    }
}
