//! The 64-cell board model.
//!
//! `Board` owns one [`Cell`] per square. Each cell holds an optional piece and
//! a display shade used by the hint overlay. The move generator and evaluator
//! only borrow the board; the executor in `legal_move_apply` is the only code
//! that mutates piece placement.

use crate::game_state::chess_rules::BACK_RANK;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::legal_moves;
use crate::utils::algebraic::algebraic_to_square;

/// Display shade of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
    Selected,
}

impl Shade {
    /// Checkerboard shade of `square` (a8 is light).
    #[inline]
    pub const fn base(square: Square) -> Self {
        if (square_row(square) + square_file(square)) % 2 == 1 {
            Shade::Dark
        } else {
            Shade::Light
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub piece: Option<Piece>,
    pub shade: Shade,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; 64],
}

impl Default for Board {
    fn default() -> Self {
        let mut cells = [Cell {
            piece: None,
            shade: Shade::Light,
        }; 64];
        for (square, cell) in cells.iter_mut().enumerate() {
            cell.shade = Shade::base(square as Square);
        }
        Self { cells }
    }
}

impl Board {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting position: black on rows 0-1, white on rows 6-7.
    pub fn new_game() -> Self {
        let mut board = Self::default();
        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as Square;
            board.place(Piece::new(Color::Black, *kind, file));
            board.place(Piece::new(Color::Black, PieceKind::Pawn, 8 + file));
            board.place(Piece::new(Color::White, PieceKind::Pawn, 48 + file));
            board.place(Piece::new(Color::White, *kind, 56 + file));
        }
        board
    }

    /// Build a position from `(color, kind, "e4")` triples. Every piece starts
    /// with `num_moves == 0`.
    pub fn from_placements(placements: &[(Color, PieceKind, &str)]) -> Result<Self, String> {
        let mut board = Self::default();
        for (color, kind, square) in placements {
            let square = algebraic_to_square(square)?;
            if board.piece_at(square).is_some() {
                return Err(format!("Square {square} placed twice"));
            }
            board.place(Piece::new(*color, *kind, square));
        }
        Ok(board)
    }

    #[inline]
    pub fn cell(&self, square: Square) -> &Cell {
        &self.cells[square as usize]
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square as usize].piece
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.cells[square as usize].piece.is_none()
    }

    /// Colour of the piece on `square`, if any.
    #[inline]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.cells[square as usize].piece.map(|p| p.color)
    }

    /// Put `piece` on its own `position`, replacing whatever was there.
    #[inline]
    pub fn place(&mut self, piece: Piece) {
        self.cells[piece.position as usize].piece = Some(piece);
    }

    /// Empty `square`, returning the piece that stood there.
    #[inline]
    pub fn clear(&mut self, square: Square) -> Option<Piece> {
        self.cells[square as usize].piece.take()
    }

    /// Move the piece on `from` to `to` without touching its move counter.
    /// Anything on `to` is overwritten.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let mut piece = self.clear(from)?;
        piece.position = to;
        self.place(piece);
        Some(piece)
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.cells.iter().filter_map(|cell| cell.piece)
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |piece| piece.color == color)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|piece| piece.kind == PieceKind::King)
            .map(|piece| piece.position)
    }

    #[inline]
    pub fn shade_at(&self, square: Square) -> Shade {
        self.cells[square as usize].shade
    }

    /// Mark the legal destinations of the piece on `square` as selected and
    /// return them. The enemy king's square is never highlighted.
    pub fn show_hints(&mut self, square: Square) -> Vec<Square> {
        let hints = legal_moves(self, square);
        for &target in &hints {
            let is_king = self
                .piece_at(target)
                .is_some_and(|piece| piece.kind == PieceKind::King);
            if !is_king {
                self.cells[target as usize].shade = Shade::Selected;
            }
        }
        hints
    }

    /// Restore the checkerboard shade of previously hinted squares.
    pub fn hide_hints(&mut self, hints: &[Square]) {
        for &square in hints {
            self.cells[square as usize].shade = Shade::base(square);
        }
    }

    /// Placement-only comparison (ignores shades).
    pub fn same_position(&self, other: &Board) -> bool {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .all(|(a, b)| a.piece == b.piece)
    }
}
