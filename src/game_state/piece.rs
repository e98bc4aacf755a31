//! Packed piece values.
//!
//! A piece is `kind (3 bits) | color (1 bit) | live index (5 bits)`. The live
//! index is the piece's slot in its color's live-piece list, which lets the
//! board find a piece's attack bitboard without scanning.

use crate::game_state::chess_types::{Color, PieceKind};

const KIND_MASK: u16 = 0x7;
const COLOR_BIT: u16 = 1 << 3;
const INDEX_SHIFT: u16 = 4;
const INDEX_MASK: u16 = 0x1F << INDEX_SHIFT;

/// Largest live index the codec can carry.
pub const MAX_LIVE_INDEX: u8 = 0x1F;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece(u16);

impl Piece {
    /// Create a piece with live index 0.
    #[inline]
    pub const fn create(kind: PieceKind, color: Color) -> Self {
        let color_bits = match color {
            Color::Light => 0,
            Color::Dark => COLOR_BIT,
        };
        Piece(kind.code() | color_bits)
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        match PieceKind::from_code(self.0 & KIND_MASK) {
            Some(kind) => kind,
            // Every constructor writes a valid kind code.
            None => PieceKind::Pawn,
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 & COLOR_BIT == 0 {
            Color::Light
        } else {
            Color::Dark
        }
    }

    #[inline]
    pub const fn live_index(self) -> usize {
        ((self.0 & INDEX_MASK) >> INDEX_SHIFT) as usize
    }

    #[inline]
    pub const fn with_live_index(self, index: usize) -> Self {
        debug_assert!(index <= MAX_LIVE_INDEX as usize);
        Piece((self.0 & !INDEX_MASK) | (((index as u16) << INDEX_SHIFT) & INDEX_MASK))
    }

    /// Strip the live index, leaving a key that identifies kind and color only.
    #[inline]
    pub const fn without_index(self) -> Self {
        Piece(self.0 & !INDEX_MASK)
    }

    /// Same color and live index, different kind. Used by promotion.
    #[inline]
    pub const fn with_kind(self, kind: PieceKind) -> Self {
        Piece((self.0 & !KIND_MASK) | kind.code())
    }

    #[inline]
    pub const fn is(self, kind: PieceKind, color: Color) -> bool {
        self.without_index().0 == Piece::create(kind, color).0
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// FEN letter: uppercase for Light, lowercase for Dark.
    pub fn to_char(self) -> char {
        let letter = self.kind().letter();
        match self.color() {
            Color::Light => letter.to_ascii_uppercase(),
            Color::Dark => letter,
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        let kind = PieceKind::from_letter(ch)?;
        let color = if ch.is_ascii_uppercase() {
            Color::Light
        } else {
            Color::Dark
        };
        Some(Piece::create(kind, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::ALL_PIECE_KINDS;

    #[test]
    fn fields_survive_packing() {
        for color in [Color::Light, Color::Dark] {
            for kind in ALL_PIECE_KINDS {
                let piece = Piece::create(kind, color).with_live_index(13);
                assert_eq!(piece.kind(), kind);
                assert_eq!(piece.color(), color);
                assert_eq!(piece.live_index(), 13);
                assert_ne!(piece.bits(), 0);
            }
        }
    }

    #[test]
    fn without_index_is_a_stable_map_key() {
        let a = Piece::create(PieceKind::Knight, Color::Dark).with_live_index(3);
        let b = Piece::create(PieceKind::Knight, Color::Dark).with_live_index(9);
        assert_ne!(a, b);
        assert_eq!(a.without_index(), b.without_index());
        assert_eq!(a.without_index().live_index(), 0);
    }

    #[test]
    fn promotion_keeps_slot() {
        let pawn = Piece::create(PieceKind::Pawn, Color::Light).with_live_index(7);
        let queen = pawn.with_kind(PieceKind::Queen);
        assert_eq!(queen.kind(), PieceKind::Queen);
        assert_eq!(queen.live_index(), 7);
        assert_eq!(queen.color(), Color::Light);
    }

    #[test]
    fn letters_follow_fen_case() {
        assert_eq!(Piece::create(PieceKind::King, Color::Light).to_char(), 'K');
        assert_eq!(Piece::create(PieceKind::Pawn, Color::Dark).to_char(), 'p');
        assert_eq!(
            Piece::from_char('r'),
            Some(Piece::create(PieceKind::Rook, Color::Dark))
        );
        assert_eq!(Piece::from_char('x'), None);
    }
}
