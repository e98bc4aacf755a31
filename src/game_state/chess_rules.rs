//! Canonical chess-rule constants.
//!
//! Starting position, castling geometry and the draw thresholds used by
//! game-over detection.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Slots in each color's live-piece list.
pub const MAX_PIECES_PER_COLOR: usize = 16;

/// Half-moves without capture or pawn move that end the game.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// A position seen more often than this is a draw.
pub const REPETITION_LIMIT: u8 = 2;

/// Home squares that must hold the king and rook for a castling right to exist.
pub const LIGHT_KING_HOME: Square = 60;
pub const DARK_KING_HOME: Square = 4;

/// One castling option: king and rook paths plus the squares that must be
/// empty and unattacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingSide {
    pub right: CastlingRights,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    pub must_be_empty: u64,
    pub king_path: u64,
}

const fn bits(squares: &[Square]) -> u64 {
    let mut mask = 0u64;
    let mut i = 0;
    while i < squares.len() {
        mask |= square_bit(squares[i]);
        i += 1;
    }
    mask
}

/// Castling options per color, king side first.
pub static CASTLING_SIDES: [[CastlingSide; 2]; 2] = [
    [
        CastlingSide {
            right: CASTLE_LIGHT_KINGSIDE,
            king_from: 60,
            king_to: 62,
            rook_from: 63,
            rook_to: 61,
            must_be_empty: bits(&[61, 62]),
            king_path: bits(&[61, 62]),
        },
        CastlingSide {
            right: CASTLE_LIGHT_QUEENSIDE,
            king_from: 60,
            king_to: 58,
            rook_from: 56,
            rook_to: 59,
            must_be_empty: bits(&[57, 58, 59]),
            king_path: bits(&[58, 59]),
        },
    ],
    [
        CastlingSide {
            right: CASTLE_DARK_KINGSIDE,
            king_from: 4,
            king_to: 6,
            rook_from: 7,
            rook_to: 5,
            must_be_empty: bits(&[5, 6]),
            king_path: bits(&[5, 6]),
        },
        CastlingSide {
            right: CASTLE_DARK_QUEENSIDE,
            king_from: 4,
            king_to: 2,
            rook_from: 0,
            rook_to: 3,
            must_be_empty: bits(&[1, 2, 3]),
            king_path: bits(&[2, 3]),
        },
    ],
];

/// Castling option whose king lands on `king_to`.
#[inline]
pub fn castling_side_for(color: Color, king_to: Square) -> Option<&'static CastlingSide> {
    CASTLING_SIDES[color.index()]
        .iter()
        .find(|side| side.king_to == king_to)
}

/// Row on which a pawn of `color` promotes.
#[inline]
pub const fn promotion_row(color: Color) -> u8 {
    match color {
        Color::Light => 0,
        Color::Dark => 7,
    }
}

/// Row from which a pawn of `color` may advance two squares.
#[inline]
pub const fn pawn_start_row(color: Color) -> u8 {
    match color {
        Color::Light => 6,
        Color::Dark => 1,
    }
}
