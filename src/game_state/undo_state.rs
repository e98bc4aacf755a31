use crate::game_state::chess_types::*;
use crate::game_state::piece::Piece;
use crate::moves::move_descriptions::Move;

/// Single undo record for `apply_move` / `undo_move`.
#[derive(Debug, Clone)]
pub struct UndoState {
    pub mv: Move,
    /// The moving piece as it stood on the start square (a pawn for promotions).
    pub moved_piece: Piece,
    /// Captured piece with the live index it held, and where it stood.
    pub captured_piece: Option<Piece>,
    pub captured_square: Square,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,
    pub prev_game_over: Option<GameOverReason>,

    pub prev_zobrist_key: u64,
}
