//! Core value types shared by the board model, move generation and the
//! session layer.
//!
//! Squares are plain indices in `0..64`, row-major from the a8 corner: row 0
//! is rank 8 and file 0 is file a. White pawns advance toward row 0.

use std::fmt;

/// Board square index (`0..=63`, `0 == a8`, `63 == h1`).
pub type Square = u8;

/// Side owning a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn push.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row the side's pawns start on.
    #[inline]
    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row a pawn promotes on.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Piece kind (colour is carried separately on [`Piece`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Material value awarded when a piece of this kind is captured.
    #[inline]
    pub const fn value(self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    /// Algebraic-notation letter; empty for pawns.
    #[inline]
    pub const fn identifier(self) -> &'static str {
        match self {
            PieceKind::Pawn => "",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Rook => "R",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }

    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Kinds a pawn may be promoted to, in the order the picker offers them.
    pub const PROMOTION_CHOICES: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
    ];

    #[inline]
    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTION_CHOICES.contains(&self)
    }

    /// Parse a picker choice such as `q`, `N` or `rook`.
    pub fn from_choice(choice: &str) -> Result<Self, String> {
        match choice.to_ascii_lowercase().as_str() {
            "q" | "queen" => Ok(PieceKind::Queen),
            "n" | "knight" => Ok(PieceKind::Knight),
            "b" | "bishop" => Ok(PieceKind::Bishop),
            "r" | "rook" => Ok(PieceKind::Rook),
            _ => Err(format!("Invalid promotion choice: {choice}")),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        f.write_str(name)
    }
}

/// A piece on the board. Pieces have no identity beyond their square; the
/// executor updates `position` and `num_moves` in place as they move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    pub position: Square,
    pub num_moves: u32,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind, position: Square) -> Self {
        Self {
            color,
            kind,
            position,
            num_moves: 0,
        }
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.kind.value()
    }

    #[inline]
    pub const fn identifier(&self) -> &'static str {
        self.kind.identifier()
    }

    /// Unicode glyph for display.
    pub const fn label(&self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
}

#[inline]
pub const fn square_row(square: Square) -> u8 {
    square / 8
}

#[inline]
pub const fn square_file(square: Square) -> u8 {
    square % 8
}

/// Square at `(row, file)`, or `None` when off the board.
#[inline]
pub const fn square_at(row: i8, file: i8) -> Option<Square> {
    if row < 0 || row > 7 || file < 0 || file > 7 {
        None
    } else {
        Some((row as u8) * 8 + file as u8)
    }
}

/// Square reached from `square` by `(d_row, d_file)`, if it stays on the board.
#[inline]
pub const fn offset_square(square: Square, d_row: i8, d_file: i8) -> Option<Square> {
    square_at(square_row(square) as i8 + d_row, square_file(square) as i8 + d_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_values_and_identifiers_follow_standard_material() {
        assert_eq!(PieceKind::Pawn.value(), 1);
        assert_eq!(PieceKind::Knight.value(), 3);
        assert_eq!(PieceKind::Bishop.value(), 3);
        assert_eq!(PieceKind::Rook.value(), 5);
        assert_eq!(PieceKind::Queen.value(), 9);
        assert_eq!(PieceKind::King.value(), 0);
        assert_eq!(PieceKind::Pawn.identifier(), "");
        assert_eq!(PieceKind::Knight.identifier(), "N");
    }

    #[test]
    fn offsets_respect_board_edges() {
        assert_eq!(offset_square(0, -1, 0), None);
        assert_eq!(offset_square(7, 0, 1), None);
        assert_eq!(offset_square(0, 1, 1), Some(9));
        assert_eq!(offset_square(63, -2, -1), Some(46));
    }

    #[test]
    fn promotion_choice_parsing() {
        assert_eq!(PieceKind::from_choice("Q").expect("q parses"), PieceKind::Queen);
        assert_eq!(PieceKind::from_choice("knight").expect("knight parses"), PieceKind::Knight);
        assert!(PieceKind::from_choice("king").is_err());
        assert!(!PieceKind::King.is_promotion_choice());
    }
}
