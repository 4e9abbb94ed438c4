//! Terminal-oriented Unicode board renderer.
//!
//! Draws the board from one player's side: white sees rank 8 at the top,
//! black sees the board turned around. The flip is purely visual; square
//! indices are never remapped.

use crate::game_state::board::{Board, Shade};
use crate::game_state::chess_types::*;

/// Render `board` as seen by `perspective`. Hinted squares are drawn as `*`
/// when empty.
pub fn render_game_state(board: &Board, perspective: Color) -> String {
    let files: Vec<u8> = match perspective {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };
    let rows: Vec<u8> = match perspective {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };

    let header: String = files
        .iter()
        .map(|&file| char::from(b'a' + file).to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::new();
    out.push_str("  ");
    out.push_str(&header);
    out.push('\n');

    for &row in &rows {
        let rank = char::from(b'8' - row);
        out.push(rank);
        out.push(' ');

        for (index, &file) in files.iter().enumerate() {
            let sq = row * 8 + file;
            match board.piece_at(sq) {
                Some(piece) => out.push(piece.label()),
                None if board.shade_at(sq) == Shade::Selected => out.push('*'),
                None => out.push('·'),
            }

            if index < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(rank);
        out.push('\n');
    }

    out.push_str("  ");
    out.push_str(&header);

    out
}

#[cfg(test)]
mod tests {
    use super::render_game_state;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::Color;

    #[test]
    fn white_perspective_puts_black_on_top() {
        let text = render_game_state(&Board::new_game(), Color::White);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "  a b c d e f g h");
        assert_eq!(lines[1], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8");
        assert_eq!(lines[8], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ 1");
    }

    #[test]
    fn black_perspective_flips_ranks_and_files() {
        let text = render_game_state(&Board::new_game(), Color::Black);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  h g f e d c b a");
        assert_eq!(lines[1], "1 ♖ ♘ ♗ ♔ ♕ ♗ ♘ ♖ 1");
        assert_eq!(lines[8], "8 ♜ ♞ ♝ ♚ ♛ ♝ ♞ ♜ 8");
    }

    #[test]
    fn hinted_empty_squares_are_marked() {
        let mut board = Board::new_game();
        let hints = board.show_hints(52);
        assert_eq!(hints.len(), 2);
        let text = render_game_state(&board, Color::White);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[5], "4 · · · · * · · · 4");
        board.hide_hints(&hints);
        assert!(!render_game_state(&board, Color::White).contains('*'));
    }
}
