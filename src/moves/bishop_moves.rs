use crate::game_state::board::Board;
use crate::game_state::chess_rules::BISHOP_DIRECTIONS;
use crate::game_state::chess_types::{Piece, Square};
use crate::moves::sliding::slide;

#[inline]
pub fn bishop_moves(board: &Board, piece: &Piece) -> Vec<Square> {
    slide(board, piece, &BISHOP_DIRECTIONS)
}
