//! Canonical chess-rule constants.
//!
//! Static layout and offset tables used to set up the starting position and
//! to drive the per-piece move generators.

use crate::game_state::chess_types::PieceKind;

/// Back-rank layout from file a to file h, shared by both colours.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// `(d_row, d_file)` steps of a knight.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// `(d_row, d_file)` steps of a king.
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (1, -1),
    (-1, 0),
    (-1, 1),
    (-1, -1),
    (0, 1),
    (0, -1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, -1), (-1, 1), (1, -1)];

/// File distance from the king to the kingside rook.
pub const KINGSIDE_ROOK_DISTANCE: i8 = 3;
/// File distance from the king to the queenside rook.
pub const QUEENSIDE_ROOK_DISTANCE: i8 = 4;
