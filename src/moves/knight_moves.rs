use crate::game_state::board::Board;
use crate::game_state::chess_rules::KNIGHT_OFFSETS;
use crate::game_state::chess_types::{Piece, Square};
use crate::moves::sliding::{leaper_targets, offsets_mask};

pub const KNIGHT_ATTACKS: [u64; 64] = generate_knight_attacks();

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

/// Knight jumps onto empty or enemy squares.
#[inline]
pub fn knight_moves(board: &Board, piece: &Piece) -> Vec<Square> {
    leaper_targets(board, knight_attacks(piece.position), piece.color)
}

const fn generate_knight_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        table[sq] = offsets_mask(sq, &KNIGHT_OFFSETS);
        sq += 1;
    }

    table
}
