use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, Square};
use crate::moves::bishop_moves::bishop_moves;
use crate::moves::rook_moves::rook_moves;

#[inline]
pub fn queen_moves(board: &Board, piece: &Piece) -> Vec<Square> {
    let mut moves = bishop_moves(board, piece);
    moves.extend(rook_moves(board, piece));
    moves
}

#[cfg(test)]
mod tests {
    use super::queen_moves;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::utils::algebraic::algebraic_to_square;

    #[test]
    fn lone_queen_on_d4_has_twenty_seven_squares() {
        let board = Board::from_placements(&[(Color::White, PieceKind::Queen, "d4")])
            .expect("placements should be valid");
        let d4 = algebraic_to_square("d4").expect("d4 should parse");
        let queen = board.piece_at(d4).expect("queen should be on d4");
        assert_eq!(queen_moves(&board, &queen).len(), 27);
    }
}
