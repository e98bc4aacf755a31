//! Error types for the string interfaces of the crate.
//!
//! Move generation and make/unmake are infallible on a well-formed position;
//! only parsing external text can fail.

use std::error::Error;
use std::fmt;

use crate::game_state::chess_types::Color;

/// A position string that could not be turned into a `GameState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    MissingField(&'static str),
    ExtraFields,
    BadRankCount(usize),
    BadRankWidth { rank: usize, files: usize },
    InvalidPiece(char),
    InvalidEmptyRun(char),
    InvalidSideToMove(String),
    InvalidCastling(char),
    InvalidEnPassant(String),
    InvalidCounter { field: &'static str, value: String },
    KingCount { color: Color, count: usize },
    TooManyPieces(Color),
    PawnOnBackRank(usize),
    KingCapturable(Color),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::MissingField(field) => write!(f, "missing {field} field in FEN"),
            FenError::ExtraFields => write!(f, "FEN has extra trailing fields"),
            FenError::BadRankCount(count) => {
                write!(f, "board layout must contain 8 ranks, found {count}")
            }
            FenError::BadRankWidth { rank, files } => {
                write!(f, "rank {rank} describes {files} files instead of 8")
            }
            FenError::InvalidPiece(ch) => write!(f, "invalid piece character '{ch}'"),
            FenError::InvalidEmptyRun(ch) => write!(f, "invalid empty-square count '{ch}'"),
            FenError::InvalidSideToMove(side) => write!(f, "invalid side-to-move field: {side}"),
            FenError::InvalidCastling(ch) => write!(f, "invalid castling rights character: {ch}"),
            FenError::InvalidEnPassant(square) => write!(f, "invalid en-passant square: {square}"),
            FenError::InvalidCounter { field, value } => write!(f, "invalid {field}: {value}"),
            FenError::KingCount { color, count } => {
                write!(f, "{color:?} must have exactly one king, found {count}")
            }
            FenError::TooManyPieces(color) => write!(f, "{color:?} has more than 16 pieces"),
            FenError::PawnOnBackRank(rank) => write!(f, "pawn placed on rank {rank}"),
            FenError::KingCapturable(color) => {
                write!(f, "{color:?} king is in check but it is not {color:?}'s turn")
            }
        }
    }
}

impl Error for FenError {}

/// Move or square text that does not name anything on the current board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    InvalidSquare(String),
    InvalidLength(String),
    InvalidPromotion(char),
    IllegalMove(String),
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationError::InvalidSquare(square) => write!(f, "invalid algebraic square: {square}"),
            NotationError::InvalidLength(text) => write!(f, "invalid long algebraic move: {text}"),
            NotationError::InvalidPromotion(ch) => {
                write!(f, "invalid promotion piece character: {ch}")
            }
            NotationError::IllegalMove(text) => {
                write!(f, "move {text} is not legal in this position")
            }
        }
    }
}

impl Error for NotationError {}

/// Failure of a perft run driven across worker threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerftError {
    WorkerPanicked,
}

impl fmt::Display for PerftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerftError::WorkerPanicked => write!(f, "perft worker thread panicked"),
        }
    }
}

impl Error for PerftError {}
