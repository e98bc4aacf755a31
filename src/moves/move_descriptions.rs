use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

const START_SHIFT: u32 = 0;
const END_SHIFT: u32 = 6;
const KIND_SHIFT: u32 = 12;
const PROMOTION_SHIFT: u32 = 14;

const SQUARE_MASK: u32 = 0x3F;
const KIND_MASK: u32 = 0x3;
const PROMOTION_MASK: u32 = 0x7 << PROMOTION_SHIFT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    Castle,
    EnPassant,
    Promotion,
}

impl MoveKind {
    #[inline]
    const fn code(self) -> u32 {
        match self {
            MoveKind::Normal => 0,
            MoveKind::Castle => 1,
            MoveKind::EnPassant => 2,
            MoveKind::Promotion => 3,
        }
    }

    #[inline]
    const fn from_code(code: u32) -> Self {
        match code & KIND_MASK {
            1 => MoveKind::Castle,
            2 => MoveKind::EnPassant,
            3 => MoveKind::Promotion,
            _ => MoveKind::Normal,
        }
    }
}

/// Packed move: `start (6) | end (6) | kind (2) | promotion kind (3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    #[inline]
    pub const fn new(
        start: Square,
        end: Square,
        kind: MoveKind,
        promotion: Option<PieceKind>,
    ) -> Self {
        let promotion_code = match promotion {
            Some(piece) => piece.code() as u32,
            None => 0,
        };
        Move(
            ((start as u32 & SQUARE_MASK) << START_SHIFT)
                | ((end as u32 & SQUARE_MASK) << END_SHIFT)
                | (kind.code() << KIND_SHIFT)
                | (promotion_code << PROMOTION_SHIFT),
        )
    }

    #[inline]
    pub const fn normal(start: Square, end: Square) -> Self {
        Move::new(start, end, MoveKind::Normal, None)
    }

    #[inline]
    pub const fn start(self) -> Square {
        ((self.0 >> START_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn end(self) -> Square {
        ((self.0 >> END_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        MoveKind::from_code(self.0 >> KIND_SHIFT)
    }

    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        PieceKind::from_code(((self.0 & PROMOTION_MASK) >> PROMOTION_SHIFT) as u16)
    }

    /// Override the promotion target of a generated promotion move.
    #[inline]
    pub fn set_promotion(&mut self, piece: PieceKind) {
        self.0 = (self.0 & !PROMOTION_MASK) | ((piece.code() as u32) << PROMOTION_SHIFT);
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&square_to_algebraic(self.start()))?;
        f.write_str(&square_to_algebraic(self.end()))?;
        if self.kind() == MoveKind::Promotion {
            if let Some(piece) = self.promotion() {
                write!(f, "{}", piece.letter())?;
            }
        }
        Ok(())
    }
}
