use crate::game_state::board::Board;
use crate::game_state::chess_rules::ROOK_DIRECTIONS;
use crate::game_state::chess_types::{Piece, Square};
use crate::moves::sliding::slide;

/// Orthogonal slides until the edge, a friendly piece (excluded) or an enemy
/// piece (included).
#[inline]
pub fn rook_moves(board: &Board, piece: &Piece) -> Vec<Square> {
    slide(board, piece, &ROOK_DIRECTIONS)
}
