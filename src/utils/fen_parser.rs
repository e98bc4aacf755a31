//! FEN-to-GameState parser.
//!
//! Builds a fully-populated position from a Forsyth-Edwards Notation string:
//! live-piece lists, remaining-piece counts, king squares, rights, clocks,
//! then hash and attack/pin/check data derived from scratch.

use crate::errors::FenError;
use crate::game_state::{chess_types::*, game_state::GameState, piece::Piece};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, FenError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or(FenError::MissingField("board layout"))?;
    let side_part = parts.next().ok_or(FenError::MissingField("side to move"))?;
    let castling_part = parts.next().ok_or(FenError::MissingField("castling rights"))?;
    let en_passant_part = parts.next().ok_or(FenError::MissingField("en-passant square"))?;
    let halfmove_part = parts.next().ok_or(FenError::MissingField("halfmove clock"))?;
    let fullmove_part = parts.next().ok_or(FenError::MissingField("fullmove number"))?;

    if parts.next().is_some() {
        return Err(FenError::ExtraFields);
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part, &game_state)?;
    game_state.halfmove_clock = parse_counter("halfmove clock", halfmove_part)?;
    game_state.fullmove_number = parse_counter("fullmove number", fullmove_part)?;

    game_state.finish_setup()?;
    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::BadRankCount(ranks.len()));
    }

    let mut kings = [0usize; 2];

    // FEN lists rank 8 first, which is row 0 here.
    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = 8 - row;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(FenError::InvalidEmptyRun(ch));
                }
                file += empty_count as usize;
                continue;
            }

            let piece = Piece::from_char(ch).ok_or(FenError::InvalidPiece(ch))?;
            if file >= 8 {
                return Err(FenError::BadRankWidth { rank, files: file + 1 });
            }

            match piece.kind() {
                PieceKind::King => kings[piece.color().index()] += 1,
                PieceKind::Pawn if rank == 1 || rank == 8 => {
                    return Err(FenError::PawnOnBackRank(rank));
                }
                _ => {}
            }
            game_state.add_setup_piece(piece, (row * 8 + file) as Square)?;
            file += 1;
        }

        if file != 8 {
            return Err(FenError::BadRankWidth { rank, files: file });
        }
    }

    for color in [Color::Light, Color::Dark] {
        let count = kings[color.index()];
        if count != 1 {
            return Err(FenError::KingCount { color, count });
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, FenError> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(FenError::InvalidSideToMove(side_part.to_owned())),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, FenError> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => return Err(FenError::InvalidCastling(ch)),
        }
    }

    Ok(rights)
}

/// The target must be the empty square just passed over by an opponent pawn
/// that double-stepped on the previous move.
fn parse_en_passant_square(
    en_passant_part: &str,
    game_state: &GameState,
) -> Result<Option<Square>, FenError> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let invalid = || FenError::InvalidEnPassant(en_passant_part.to_owned());
    let square = algebraic_to_square(en_passant_part).map_err(|_| invalid())?;

    let side = game_state.side_to_move;
    let target_row = match side {
        Color::Light => 2,
        Color::Dark => 5,
    };
    if row_of(square) != target_row || game_state.piece_on(square).is_some() {
        return Err(invalid());
    }

    // The pushed pawn stands one step further along its own direction.
    let pawn_square = (square as i8 - side.pawn_push()) as Square;
    let pushed_pawn = game_state
        .piece_on(pawn_square)
        .is_some_and(|p| p.is(PieceKind::Pawn, side.opposite()));
    if !pushed_pawn {
        return Err(invalid());
    }

    Ok(Some(square))
}

fn parse_counter(field: &'static str, value: &str) -> Result<u16, FenError> {
    value.parse::<u16>().map_err(|_| FenError::InvalidCounter {
        field,
        value: value.to_owned(),
    })
}
