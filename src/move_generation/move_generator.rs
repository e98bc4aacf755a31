use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::Move;

/// Seam for callers that want to swap the move source, e.g. perft drivers.
pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, game_state: &GameState) -> Vec<Move>;
}
