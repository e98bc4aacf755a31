//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! Keys are drawn once per process from a seeded `StdRng`. The default seed is
//! fixed so hashes are reproducible across runs; a different seed can be
//! installed with [`initialize_with_seed`] before the first position is built.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::game_state::{chess_types::*, game_state::GameState};

pub const DEFAULT_ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random key tables for every hashed facet of a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristKeys {
    piece_square: [[[u64; 64]; 6]; 2],
    castling: [u64; 16],
    en_passant_file: [u64; 8],
    side_to_move: [u64; 2],
}

impl ZobristKeys {
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut piece_square = [[[0u64; 64]; 6]; 2];
        for color in &mut piece_square {
            for piece in color {
                for sq in piece {
                    *sq = rng.next_u64();
                }
            }
        }

        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = rng.next_u64();
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.next_u64();
        }

        let side_to_move = [rng.next_u64(), rng.next_u64()];

        ZobristKeys {
            piece_square,
            castling,
            en_passant_file,
            side_to_move,
        }
    }

    #[inline]
    pub fn piece_square(&self, color: Color, piece: PieceKind, square: Square) -> u64 {
        self.piece_square[color.index()][piece.index()][square as usize]
    }

    #[inline]
    pub fn castling(&self, castling_rights: CastlingRights) -> u64 {
        self.castling[(castling_rights & CASTLE_ALL) as usize]
    }

    #[inline]
    pub fn en_passant_file(&self, file: u8) -> u64 {
        self.en_passant_file[file as usize]
    }

    #[inline]
    pub fn side_to_move(&self, color: Color) -> u64 {
        self.side_to_move[color.index()]
    }

    /// Hash a position from scratch with these keys.
    pub fn hash_position(&self, game_state: &GameState) -> u64 {
        let mut key = 0u64;

        for sq in 0..64u8 {
            if let Some(piece) = game_state.piece_on(sq) {
                key ^= self.piece_square(piece.color(), piece.kind(), sq);
            }
        }

        key ^= self.side_to_move(game_state.side_to_move());
        key ^= self.castling(game_state.castling_rights());

        if let Some(ep_square) = game_state.en_passant_square() {
            key ^= self.en_passant_file(file_of(ep_square));
        }

        key
    }
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

/// Process-wide key tables, built from the default seed on first use.
#[inline]
pub fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(|| ZobristKeys::from_seed(DEFAULT_ZOBRIST_SEED))
}

/// Install keys built from `seed`. Returns `false` if keys were already in use.
pub fn initialize_with_seed(seed: u64) -> bool {
    KEYS.set(ZobristKeys::from_seed(seed)).is_ok()
}

/// Compute the full position Zobrist key from the complete game state.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    keys().hash_position(game_state)
}
