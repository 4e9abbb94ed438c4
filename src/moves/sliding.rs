//! Ray tracing and mask helpers shared by the per-piece generators.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;

/// Walk from `from` along `(d_row, d_file)` until the board edge. Empty
/// squares are collected; the first occupied square is collected only when it
/// holds an enemy of `color`, and the ray stops there either way.
pub fn trace_ray(board: &Board, from: Square, color: Color, d_row: i8, d_file: i8, out: &mut Vec<Square>) {
    let mut current = from;
    while let Some(next) = offset_square(current, d_row, d_file) {
        match board.color_at(next) {
            None => out.push(next),
            Some(other) => {
                if other != color {
                    out.push(next);
                }
                break;
            }
        }
        current = next;
    }
}

/// Union of [`trace_ray`] over `directions`.
pub fn slide(board: &Board, piece: &Piece, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut out = Vec::with_capacity(14);
    for &(d_row, d_file) in directions {
        trace_ray(board, piece.position, piece.color, d_row, d_file, &mut out);
    }
    out
}

/// Set bits of `mask` as squares, lowest first.
pub fn mask_squares(mut mask: u64) -> impl Iterator<Item = Square> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let square = mask.trailing_zeros() as Square;
        mask &= mask - 1;
        Some(square)
    })
}

/// Squares of `mask` not occupied by `color`.
pub fn leaper_targets(board: &Board, mask: u64, color: Color) -> Vec<Square> {
    mask_squares(mask)
        .filter(|&sq| board.color_at(sq) != Some(color))
        .collect()
}

/// Bitmask of in-bounds squares reached from `square` by `offsets`.
pub(crate) const fn offsets_mask(square: usize, offsets: &[(i8, i8)]) -> u64 {
    let row = (square / 8) as i8;
    let file = (square % 8) as i8;
    let mut mask = 0u64;
    let mut i = 0;
    while i < offsets.len() {
        let r = row + offsets[i].0;
        let f = file + offsets[i].1;
        if r >= 0 && r < 8 && f >= 0 && f < 8 {
            mask |= 1u64 << (r as usize * 8 + f as usize);
        }
        i += 1;
    }
    mask
}
