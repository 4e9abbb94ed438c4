//! Square conversions between algebraic coordinates and board indices.
//!
//! Indices count from a8 (`0`) to h1 (`63`), so the rank number of a square
//! is `8 - row`.

use crate::game_state::chess_types::{square_file, square_row, Square};

/// Convert algebraic notation (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, String> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("Invalid algebraic square: {square}"));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(format!("Invalid algebraic file: {}", file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(format!("Invalid algebraic rank: {}", rank as char));
    }

    let file_index = file - b'a';
    let row_index = b'8' - rank;
    Ok(row_index * 8 + file_index)
}

/// Convert a square index (`0..=63`) to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> Result<String, String> {
    if square > 63 {
        return Err(format!("Square index out of bounds: {square}"));
    }

    Ok(format!("{}{}", file_letter(square), rank_number(square)))
}

#[inline]
pub fn file_letter(square: Square) -> char {
    char::from(b'a' + square_file(square))
}

#[inline]
pub fn rank_number(square: Square) -> u8 {
    8 - square_row(square)
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, square_to_algebraic};

    #[test]
    fn corner_squares_follow_a8_origin() {
        assert_eq!(algebraic_to_square("a8").expect("a8 should parse"), 0);
        assert_eq!(algebraic_to_square("h1").expect("h1 should parse"), 63);
        assert_eq!(algebraic_to_square("e4").expect("e4 should parse"), 36);
        assert_eq!(square_to_algebraic(0).expect("0 should convert"), "a8");
        assert_eq!(square_to_algebraic(60).expect("60 should convert"), "e1");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(algebraic_to_square("i1").is_err());
        assert!(algebraic_to_square("a9").is_err());
        assert!(algebraic_to_square("e").is_err());
        assert!(square_to_algebraic(64).is_err());
    }
}
