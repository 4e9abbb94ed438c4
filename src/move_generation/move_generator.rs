//! Per-square move dispatch.
//!
//! Three views of a piece's reach are exposed:
//! - [`pseudo_legal_moves`]: shape and occupancy rules only, castling included;
//! - [`attack_squares`]: the capture-type set used for attack detection, where
//!   pawns threaten both diagonals and kings never castle;
//! - [`legal_moves`]: pseudo-legal moves that do not leave the mover's king
//!   attacked and never land on the enemy king.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::check_move_safety;
use crate::moves::bishop_moves::bishop_moves;
use crate::moves::king_moves::{king_attacks, king_moves};
use crate::moves::knight_moves::knight_moves;
use crate::moves::pawn_moves::{pawn_attacks, pawn_moves};
use crate::moves::queen_moves::queen_moves;
use crate::moves::rook_moves::rook_moves;
use crate::moves::sliding::leaper_targets;

/// Destinations of one piece, keyed by its square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceMoves {
    pub from: Square,
    pub kind: PieceKind,
    pub destinations: Vec<Square>,
}

/// Pseudo-legal destinations of the piece on `square`; empty for an empty
/// square.
pub fn pseudo_legal_moves(board: &Board, square: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(square) else {
        return Vec::new();
    };
    piece_moves(board, &piece)
}

pub fn piece_moves(board: &Board, piece: &Piece) -> Vec<Square> {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, piece),
        PieceKind::Knight => knight_moves(board, piece),
        PieceKind::Bishop => bishop_moves(board, piece),
        PieceKind::Rook => rook_moves(board, piece),
        PieceKind::Queen => queen_moves(board, piece),
        PieceKind::King => king_moves(board, piece),
    }
}

/// Squares `piece` threatens. A king threatens every adjacent square not
/// held by its own side, the enemy king's square included.
pub fn attack_squares(board: &Board, piece: &Piece) -> Vec<Square> {
    match piece.kind {
        PieceKind::Pawn => leaper_targets(board, pawn_attacks(piece.color, piece.position), piece.color),
        PieceKind::King => leaper_targets(board, king_attacks(piece.position), piece.color),
        _ => piece_moves(board, piece),
    }
}

/// Legal destinations of the piece on `square`.
pub fn legal_moves(board: &Board, square: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(square) else {
        return Vec::new();
    };
    let attacker = piece.color.opposite();

    piece_moves(board, &piece)
        .into_iter()
        .filter(|&to| match board.piece_at(to) {
            Some(target) if target.color == piece.color => {
                // Castling: path safety was checked when the move was generated.
                piece.kind == PieceKind::King
            }
            Some(target) if target.kind == PieceKind::King => false,
            _ => check_move_safety(board, square, to, attacker),
        })
        .collect()
}

/// Legal moves of every piece of `color` that has at least one.
pub fn all_legal_moves(board: &Board, color: Color) -> Vec<PieceMoves> {
    board
        .pieces_of(color)
        .filter_map(|piece| {
            let destinations = legal_moves(board, piece.position);
            (!destinations.is_empty()).then_some(PieceMoves {
                from: piece.position,
                kind: piece.kind,
                destinations,
            })
        })
        .collect()
}
