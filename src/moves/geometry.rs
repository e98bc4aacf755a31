//! Precomputed board geometry.
//!
//! For each of the 16 piece directions (4 orthogonal, 4 diagonal, 8 knight
//! jumps) and each square, the number of steps available before leaving the
//! board. Leaper reachability sets, sliding rays and castling masks are all
//! derived from that table at compile time and are read-only afterwards.

use crate::game_state::chess_types::*;

pub const DIRECTION_COUNT: usize = 16;

/// `(file delta, row delta)` per direction. Rows grow toward rank 1.
const DELTAS: [(i8, i8); DIRECTION_COUNT] = [
    // orthogonal: north, south, east, west
    (0, -1),
    (0, 1),
    (1, 0),
    (-1, 0),
    // diagonal: north-east, north-west, south-east, south-west
    (1, -1),
    (-1, -1),
    (1, 1),
    (-1, 1),
    // knight jumps
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];

pub const NORTH: usize = 0;
pub const SOUTH: usize = 1;
pub const EAST: usize = 2;
pub const WEST: usize = 3;
pub const NORTH_EAST: usize = 4;
pub const NORTH_WEST: usize = 5;
pub const SOUTH_EAST: usize = 6;
pub const SOUTH_WEST: usize = 7;

pub const ROOK_DIRECTIONS: [usize; 4] = [NORTH, SOUTH, EAST, WEST];
pub const BISHOP_DIRECTIONS: [usize; 4] = [NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST];
pub const QUEEN_DIRECTIONS: [usize; 8] = [
    NORTH, SOUTH, EAST, WEST, NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST,
];
pub const KNIGHT_DIRECTIONS: [usize; 8] = [8, 9, 10, 11, 12, 13, 14, 15];

#[derive(Debug)]
pub struct Geometry {
    edge_distance: [[u8; 64]; DIRECTION_COUNT],
    rays: [[u64; 64]; 8],
    knight_attacks: [u64; 64],
    king_attacks: [u64; 64],
    pawn_attacks: [[u64; 64]; 2],
    castle_clear: [CastlingRights; 64],
}

pub static GEOMETRY: Geometry = Geometry::build();

#[inline]
pub fn geometry() -> &'static Geometry {
    &GEOMETRY
}

impl Geometry {
    const fn build() -> Self {
        let mut edge_distance = [[0u8; 64]; DIRECTION_COUNT];
        let mut dir = 0usize;
        while dir < DIRECTION_COUNT {
            let (df, dr) = DELTAS[dir];
            let mut sq = 0usize;
            while sq < 64 {
                let mut file = (sq % 8) as i8 + df;
                let mut row = (sq / 8) as i8 + dr;
                let mut steps = 0u8;
                while file >= 0 && file < 8 && row >= 0 && row < 8 {
                    steps += 1;
                    // Knights jump once.
                    if dir >= 8 {
                        break;
                    }
                    file += df;
                    row += dr;
                }
                edge_distance[dir][sq] = steps;
                sq += 1;
            }
            dir += 1;
        }

        let mut rays = [[0u64; 64]; 8];
        let mut knight_attacks = [0u64; 64];
        let mut king_attacks = [0u64; 64];
        let mut pawn_attacks = [[0u64; 64]; 2];

        let mut sq = 0usize;
        while sq < 64 {
            let mut dir = 0usize;
            while dir < DIRECTION_COUNT {
                let steps = edge_distance[dir][sq];
                let offset = offset_of(dir);
                let first = (sq as i16 + offset as i16) as u32;
                if dir < 8 {
                    let mut target = sq as i16;
                    let mut step = 0u8;
                    while step < steps {
                        target += offset as i16;
                        rays[dir][sq] |= 1u64 << (target as u32);
                        step += 1;
                    }
                    if steps > 0 {
                        king_attacks[sq] |= 1u64 << first;
                    }
                } else if steps > 0 {
                    knight_attacks[sq] |= 1u64 << first;
                }
                dir += 1;
            }

            let light = Color::Light.index();
            let dark = Color::Dark.index();
            if edge_distance[NORTH_EAST][sq] > 0 {
                pawn_attacks[light][sq] |= 1u64 << ((sq - 7) as u32);
            }
            if edge_distance[NORTH_WEST][sq] > 0 {
                pawn_attacks[light][sq] |= 1u64 << ((sq - 9) as u32);
            }
            if edge_distance[SOUTH_EAST][sq] > 0 {
                pawn_attacks[dark][sq] |= 1u64 << ((sq + 9) as u32);
            }
            if edge_distance[SOUTH_WEST][sq] > 0 {
                pawn_attacks[dark][sq] |= 1u64 << ((sq + 7) as u32);
            }
            sq += 1;
        }

        let mut castle_clear = [0u8; 64];
        castle_clear[60] = CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE;
        castle_clear[63] = CASTLE_LIGHT_KINGSIDE;
        castle_clear[56] = CASTLE_LIGHT_QUEENSIDE;
        castle_clear[4] = CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE;
        castle_clear[7] = CASTLE_DARK_KINGSIDE;
        castle_clear[0] = CASTLE_DARK_QUEENSIDE;

        Geometry {
            edge_distance,
            rays,
            knight_attacks,
            king_attacks,
            pawn_attacks,
            castle_clear,
        }
    }

    /// Steps available from `square` in `direction` before the board edge.
    #[inline]
    pub fn edge_distance(&self, direction: usize, square: Square) -> u8 {
        self.edge_distance[direction][square as usize]
    }

    /// Every square from `square` (exclusive) to the edge in a sliding direction.
    #[inline]
    pub fn ray(&self, direction: usize, square: Square) -> u64 {
        self.rays[direction][square as usize]
    }

    #[inline]
    pub fn knight_attacks(&self, square: Square) -> u64 {
        self.knight_attacks[square as usize]
    }

    #[inline]
    pub fn king_attacks(&self, square: Square) -> u64 {
        self.king_attacks[square as usize]
    }

    #[inline]
    pub fn pawn_attacks(&self, color: Color, square: Square) -> u64 {
        self.pawn_attacks[color.index()][square as usize]
    }

    /// Castling rights revoked when a move starts or ends on `square`.
    #[inline]
    pub fn castle_clear_mask(&self, square: Square) -> CastlingRights {
        self.castle_clear[square as usize]
    }

    /// The sliding direction leading from `from` to `to`, if they share a line.
    #[inline]
    pub fn direction_between(&self, from: Square, to: Square) -> Option<usize> {
        QUEEN_DIRECTIONS
            .into_iter()
            .find(|&dir| self.ray(dir, from) & square_bit(to) != 0)
    }

    /// Squares strictly between two aligned squares; empty if not aligned.
    #[inline]
    pub fn between(&self, from: Square, to: Square) -> u64 {
        match self.direction_between(from, to) {
            Some(dir) => self.ray(dir, from) & !self.ray(dir, to) & !square_bit(to),
            None => 0,
        }
    }
}

/// Square index offset of one step in `direction`.
#[inline]
pub const fn offset_of(direction: usize) -> i8 {
    let (df, dr) = DELTAS[direction];
    dr * 8 + df
}

/// Step once from `square`; the caller has checked the edge distance.
#[inline]
pub fn step(square: Square, direction: usize) -> Square {
    (square as i8 + offset_of(direction)) as Square
}

/// Sliding directions a piece kind moves along.
#[inline]
pub fn slider_directions(kind: PieceKind) -> &'static [usize] {
    match kind {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen => &QUEEN_DIRECTIONS,
        _ => &[],
    }
}

/// Whether a slider of `kind` moves along `direction`.
#[inline]
pub fn slides_along(kind: PieceKind, direction: usize) -> bool {
    match kind {
        PieceKind::Rook => direction < 4,
        PieceKind::Bishop => (4..8).contains(&direction),
        PieceKind::Queen => direction < 8,
        _ => false,
    }
}
