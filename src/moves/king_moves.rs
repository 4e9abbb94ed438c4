//! King steps and castling eligibility.
//!
//! Castling destinations are encoded as the square of the rook the king
//! castles with; the executor recognises a king landing on its own rook as the
//! castle trigger.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::{KING_OFFSETS, KINGSIDE_ROOK_DISTANCE, QUEENSIDE_ROOK_DISTANCE};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::sliding::{leaper_targets, offsets_mask};

pub const KING_ATTACKS: [u64; 64] = generate_king_attacks();

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}

/// Adjacent steps onto empty or enemy squares, never onto the enemy king.
pub fn king_steps(board: &Board, piece: &Piece) -> Vec<Square> {
    let mut steps = leaper_targets(board, king_attacks(piece.position), piece.color);
    steps.retain(|&sq| {
        board
            .piece_at(sq)
            .map_or(true, |target| target.kind != PieceKind::King)
    });
    steps
}

/// Steps plus castling destinations.
pub fn king_moves(board: &Board, piece: &Piece) -> Vec<Square> {
    let mut moves = king_steps(board, piece);
    moves.extend(castling_moves(board, piece));
    moves
}

/// Rook squares the king may castle with. Empty unless the king has never
/// moved; each side is checked independently.
pub fn castling_moves(board: &Board, king: &Piece) -> Vec<Square> {
    let mut moves = Vec::with_capacity(2);
    if king.num_moves != 0 {
        return moves;
    }

    for distance in [KINGSIDE_ROOK_DISTANCE, -QUEENSIDE_ROOK_DISTANCE] {
        let Some(rook_square) = offset_square(king.position, 0, distance) else {
            continue;
        };
        if castle_possible(board, king, rook_square) {
            moves.push(rook_square);
        }
    }

    moves
}

fn castle_possible(board: &Board, king: &Piece, rook_square: Square) -> bool {
    let rook_ready = board.piece_at(rook_square).is_some_and(|rook| {
        rook.color == king.color && rook.kind == PieceKind::Rook && rook.num_moves == 0
    });
    if !rook_ready {
        return false;
    }

    let low = king.position.min(rook_square) + 1;
    let high = king.position.max(rook_square);
    if !(low..high).all(|sq| board.is_empty(sq)) {
        return false;
    }

    // The king's square and the two it crosses must be unattacked.
    let direction: i8 = if rook_square > king.position { 1 } else { -1 };
    let attacker = king.color.opposite();
    (0..=2).all(|step| {
        offset_square(king.position, 0, direction * step)
            .is_some_and(|sq| !is_square_attacked(board, sq, attacker))
    })
}

const fn generate_king_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        table[sq] = offsets_mask(sq, &KING_OFFSETS);
        sq += 1;
    }

    table
}
