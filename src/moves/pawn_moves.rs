use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::moves::sliding::mask_squares;

pub const WHITE_PAWN_ATTACKS: [u64; 64] = generate_white_pawn_attacks();
pub const BLACK_PAWN_ATTACKS: [u64; 64] = generate_black_pawn_attacks();

/// Diagonal squares a pawn threatens, whether or not anything stands there.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square as usize],
        Color::Black => BLACK_PAWN_ATTACKS[square as usize],
    }
}

/// Forward pushes onto empty squares (two from the starting row when the
/// first step is also empty) plus diagonal captures of enemy pieces.
pub fn pawn_moves(board: &Board, piece: &Piece) -> Vec<Square> {
    let mut moves = Vec::with_capacity(4);
    let step = piece.color.pawn_direction();

    if let Some(one) = offset_square(piece.position, step, 0) {
        if board.is_empty(one) {
            moves.push(one);
            if square_row(piece.position) == piece.color.pawn_start_row() {
                if let Some(two) = offset_square(one, step, 0) {
                    if board.is_empty(two) {
                        moves.push(two);
                    }
                }
            }
        }
    }

    moves.extend(pawn_captures(board, piece));
    moves
}

/// Capture-only subset of [`pawn_moves`].
pub fn pawn_captures(board: &Board, piece: &Piece) -> Vec<Square> {
    mask_squares(pawn_attacks(piece.color, piece.position))
        .filter(|&sq| board.color_at(sq) == Some(piece.color.opposite()))
        .collect()
}

const fn generate_white_pawn_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = sq % 8;
        let row = sq / 8;
        let mut attacks = 0u64;

        if row > 0 {
            if file > 0 {
                attacks |= 1u64 << (sq - 9);
            }
            if file < 7 {
                attacks |= 1u64 << (sq - 7);
            }
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

const fn generate_black_pawn_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = sq % 8;
        let row = sq / 8;
        let mut attacks = 0u64;

        if row < 7 {
            if file > 0 {
                attacks |= 1u64 << (sq + 7);
            }
            if file < 7 {
                attacks |= 1u64 << (sq + 9);
            }
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}
