//! Check, checkmate and stalemate evaluation.
//!
//! All hypothetical moves are played on a cloned board, so every function here
//! takes `&Board` and leaves the caller's position untouched.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::{all_legal_moves, attack_squares, piece_moves, PieceMoves};
use crate::moves::king_moves::king_steps;

/// Result of one full scan of the board from `attacker_color`'s side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckScan {
    pub attacker_color: Color,
    pub attacker_king: Option<Square>,
    pub defender_king: Option<Square>,
    /// Attack sets of every attacking piece.
    pub attacker_moves: Vec<PieceMoves>,
    /// Pseudo-legal moves of every defending piece.
    pub defender_moves: Vec<PieceMoves>,
    /// Squares of attacking pieces that hit the defending king.
    pub attackers: Vec<Square>,
}

impl CheckScan {
    #[inline]
    pub fn in_check(&self) -> bool {
        !self.attackers.is_empty()
    }
}

/// Scan every square once: locate both kings, collect both sides' moves and
/// record which `attacker_color` pieces hit the opposing king.
pub fn is_check(board: &Board, attacker_color: Color) -> CheckScan {
    let defender_color = attacker_color.opposite();
    let defender_king = board.king_square(defender_color);
    let mut scan = CheckScan {
        attacker_color,
        attacker_king: None,
        defender_king,
        attacker_moves: Vec::with_capacity(16),
        defender_moves: Vec::with_capacity(16),
        attackers: Vec::new(),
    };

    for piece in board.pieces() {
        if piece.color == attacker_color {
            if piece.kind == PieceKind::King {
                scan.attacker_king = Some(piece.position);
            }
            let destinations = attack_squares(board, &piece);
            if defender_king.is_some_and(|king| destinations.contains(&king)) {
                scan.attackers.push(piece.position);
            }
            scan.attacker_moves.push(PieceMoves {
                from: piece.position,
                kind: piece.kind,
                destinations,
            });
        } else {
            scan.defender_moves.push(PieceMoves {
                from: piece.position,
                kind: piece.kind,
                destinations: piece_moves(board, &piece),
            });
        }
    }

    scan
}

pub fn is_square_attacked(board: &Board, square: Square, attacker_color: Color) -> bool {
    board
        .pieces_of(attacker_color)
        .any(|piece| attack_squares(board, &piece).contains(&square))
}

/// Is `color`'s king attacked right now?
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

/// Play `from -> to` on a snapshot and report whether the king opposing
/// `attacker_color` is free of attackers afterwards.
pub fn check_move_safety(board: &Board, from: Square, to: Square, attacker_color: Color) -> bool {
    let mut snapshot = board.clone();
    if snapshot.relocate(from, to).is_none() {
        return false;
    }
    match snapshot.king_square(attacker_color.opposite()) {
        Some(king) => !is_square_attacked(&snapshot, king, attacker_color),
        None => true,
    }
}

/// Does the checked king in `scan` have no way out?
///
/// The king may step (or capture) to any square that is safe after the move.
/// Against a single checker, any other defender may also capture it or, when
/// it slides, interpose on the line between checker and king. Every rescue is
/// validated with [`check_move_safety`] so pinned defenders do not count.
pub fn is_checkmate(board: &Board, scan: &CheckScan) -> bool {
    let Some(king_square) = scan.defender_king else {
        return false;
    };
    if !scan.in_check() {
        return false;
    }
    let Some(king) = board.piece_at(king_square) else {
        return false;
    };
    let attacker = scan.attacker_color;

    let king_escapes = king_steps(board, &king)
        .into_iter()
        .any(|to| check_move_safety(board, king_square, to, attacker));
    if king_escapes {
        return false;
    }

    // Double check: only the king could have helped.
    if scan.attackers.len() > 1 {
        return true;
    }

    let checker_square = scan.attackers[0];
    let mut rescue_squares = vec![checker_square];
    if board
        .piece_at(checker_square)
        .is_some_and(|checker| checker.kind.is_slider())
    {
        rescue_squares.extend(squares_between(king_square, checker_square));
    }

    let rescued = scan
        .defender_moves
        .iter()
        .filter(|moves| moves.kind != PieceKind::King)
        .any(|moves| {
            moves.destinations.iter().any(|&to| {
                rescue_squares.contains(&to) && check_move_safety(board, moves.from, to, attacker)
            })
        });

    !rescued
}

/// Is the side opposing `attacker_color` out of legal moves while not in
/// check?
pub fn is_stalemate(board: &Board, attacker_color: Color) -> bool {
    let defender = attacker_color.opposite();
    if is_king_in_check(board, defender) {
        return false;
    }
    all_legal_moves(board, defender).is_empty()
}

/// Squares strictly between `a` and `b` when they share a rank, file or
/// diagonal; empty otherwise.
pub fn squares_between(a: Square, b: Square) -> Vec<Square> {
    let a_row = square_row(a) as i8;
    let a_file = square_file(a) as i8;
    let d_row = square_row(b) as i8 - a_row;
    let d_file = square_file(b) as i8 - a_file;

    let aligned = d_row == 0 || d_file == 0 || d_row.abs() == d_file.abs();
    if a == b || !aligned {
        return Vec::new();
    }

    let step_row = d_row.signum();
    let step_file = d_file.signum();
    let mut out = Vec::new();
    let mut current = a;
    while let Some(next) = offset_square(current, step_row, step_file) {
        if next == b {
            break;
        }
        out.push(next);
        current = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> u8 {
        algebraic_to_square(name).expect("test square should parse")
    }

    fn board(placements: &[(Color, PieceKind, &str)]) -> Board {
        Board::from_placements(placements).expect("placements should be valid")
    }

    #[test]
    fn startpos_has_no_attackers_for_either_side() {
        let board = Board::new_game();
        for color in [Color::White, Color::Black] {
            let scan = is_check(&board, color);
            assert!(scan.attackers.is_empty());
            assert!(scan.attacker_king.is_some());
            assert!(scan.defender_king.is_some());
            assert_eq!(scan.attacker_moves.len(), 16);
            assert_eq!(scan.defender_moves.len(), 16);
        }
    }

    #[test]
    fn knight_check_is_reported() {
        let board = board(&[
            (Color::White, PieceKind::King, "e1"),
            (Color::Black, PieceKind::Knight, "d3"),
            (Color::Black, PieceKind::King, "e8"),
        ]);
        let scan = is_check(&board, Color::Black);
        assert_eq!(scan.attackers, vec![sq("d3")]);
        assert_eq!(scan.defender_king, Some(sq("e1")));
        assert_eq!(scan.attacker_king, Some(sq("e8")));
    }

    #[test]
    fn back_rank_mate_is_detected() {
        let board = board(&[
            (Color::White, PieceKind::King, "g1"),
            (Color::White, PieceKind::Pawn, "f2"),
            (Color::White, PieceKind::Pawn, "g2"),
            (Color::White, PieceKind::Pawn, "h2"),
            (Color::Black, PieceKind::Rook, "a1"),
            (Color::Black, PieceKind::King, "g8"),
        ]);
        let scan = is_check(&board, Color::Black);
        assert!(scan.in_check());
        assert!(is_checkmate(&board, &scan));
    }

    #[test]
    fn back_rank_with_flight_square_is_not_mate() {
        let board = board(&[
            (Color::White, PieceKind::King, "g1"),
            (Color::White, PieceKind::Pawn, "f2"),
            (Color::White, PieceKind::Pawn, "g2"),
            (Color::White, PieceKind::Pawn, "h3"),
            (Color::Black, PieceKind::Rook, "a1"),
            (Color::Black, PieceKind::King, "g8"),
        ]);
        let scan = is_check(&board, Color::Black);
        assert!(scan.in_check());
        assert!(!is_checkmate(&board, &scan));
    }

    #[test]
    fn block_on_the_line_avoids_mate() {
        let board = board(&[
            (Color::White, PieceKind::King, "g1"),
            (Color::White, PieceKind::Pawn, "f2"),
            (Color::White, PieceKind::Pawn, "g2"),
            (Color::White, PieceKind::Pawn, "h2"),
            (Color::White, PieceKind::Bishop, "e3"),
            (Color::Black, PieceKind::Rook, "a1"),
            (Color::Black, PieceKind::King, "g8"),
        ]);
        let scan = is_check(&board, Color::Black);
        // Bc1 interposes.
        assert!(!is_checkmate(&board, &scan));
    }

    #[test]
    fn capturing_the_checker_avoids_mate() {
        let board = board(&[
            (Color::White, PieceKind::King, "g1"),
            (Color::White, PieceKind::Pawn, "f2"),
            (Color::White, PieceKind::Pawn, "g2"),
            (Color::White, PieceKind::Pawn, "h2"),
            (Color::White, PieceKind::Rook, "a7"),
            (Color::Black, PieceKind::Rook, "a1"),
            (Color::Black, PieceKind::King, "g8"),
        ]);
        let scan = is_check(&board, Color::Black);
        assert!(!is_checkmate(&board, &scan));
    }

    #[test]
    fn pinned_defender_cannot_rescue() {
        // Ng2 could interpose on e1 but is pinned by the a8 bishop.
        let board = board(&[
            (Color::White, PieceKind::King, "h1"),
            (Color::White, PieceKind::Knight, "g2"),
            (Color::White, PieceKind::Pawn, "h2"),
            (Color::Black, PieceKind::Rook, "a1"),
            (Color::Black, PieceKind::Bishop, "a8"),
            (Color::Black, PieceKind::King, "e8"),
        ]);
        let scan = is_check(&board, Color::Black);
        assert_eq!(scan.attackers, vec![sq("a1")]);
        assert!(is_checkmate(&board, &scan));
    }

    #[test]
    fn queen_defended_by_king_mates() {
        let board = board(&[
            (Color::Black, PieceKind::King, "h8"),
            (Color::White, PieceKind::Queen, "g7"),
            (Color::White, PieceKind::King, "f6"),
        ]);
        let scan = is_check(&board, Color::White);
        assert!(scan.in_check());
        // Kxg7 would land next to the f6 king.
        assert!(!check_move_safety(&board, sq("h8"), sq("g7"), Color::White));
        assert!(is_checkmate(&board, &scan));
    }

    #[test]
    fn undefended_queen_next_to_king_is_not_mate() {
        let board = board(&[
            (Color::Black, PieceKind::King, "h8"),
            (Color::White, PieceKind::Queen, "g7"),
            (Color::White, PieceKind::King, "e5"),
        ]);
        let scan = is_check(&board, Color::White);
        assert!(scan.in_check());
        assert!(!is_checkmate(&board, &scan));
    }

    #[test]
    fn smothered_mate_by_knight_cannot_be_blocked() {
        let board = board(&[
            (Color::White, PieceKind::King, "h1"),
            (Color::White, PieceKind::Rook, "g1"),
            (Color::White, PieceKind::Pawn, "g2"),
            (Color::White, PieceKind::Pawn, "h2"),
            (Color::Black, PieceKind::Knight, "f2"),
            (Color::Black, PieceKind::King, "e8"),
        ]);
        let scan = is_check(&board, Color::Black);
        assert_eq!(scan.attackers, vec![sq("f2")]);
        assert!(is_checkmate(&board, &scan));
    }

    #[test]
    fn double_check_requires_a_king_move() {
        let board = board(&[
            (Color::White, PieceKind::King, "h1"),
            (Color::White, PieceKind::Pawn, "g2"),
            (Color::White, PieceKind::Pawn, "h2"),
            (Color::White, PieceKind::Queen, "d3"),
            (Color::Black, PieceKind::Rook, "a1"),
            (Color::Black, PieceKind::Knight, "f2"),
            (Color::Black, PieceKind::King, "e8"),
        ]);
        let scan = is_check(&board, Color::Black);
        assert_eq!(scan.attackers.len(), 2);
        // Queen could take f2 or block d1, but two checkers remain one too many.
        assert!(is_checkmate(&board, &scan));
    }

    #[test]
    fn cornered_king_is_stalemated() {
        let board = board(&[
            (Color::Black, PieceKind::King, "h8"),
            (Color::White, PieceKind::Queen, "g6"),
            (Color::White, PieceKind::King, "f7"),
        ]);
        assert!(is_stalemate(&board, Color::White));
        assert!(!is_king_in_check(&board, Color::Black));
    }

    #[test]
    fn any_spare_move_breaks_stalemate() {
        let board = board(&[
            (Color::Black, PieceKind::King, "h8"),
            (Color::Black, PieceKind::Pawn, "a5"),
            (Color::White, PieceKind::Queen, "g6"),
            (Color::White, PieceKind::King, "f7"),
        ]);
        assert!(!is_stalemate(&board, Color::White));
    }

    #[test]
    fn self_checking_moves_do_not_break_stalemate() {
        // The a7 bishop shields a8 from the a1 rook, so every bishop move
        // exposes the king; b7 and b8 are covered by the b1 rook.
        let board = board(&[
            (Color::Black, PieceKind::King, "a8"),
            (Color::Black, PieceKind::Bishop, "a7"),
            (Color::White, PieceKind::Rook, "a1"),
            (Color::White, PieceKind::Rook, "b1"),
            (Color::White, PieceKind::King, "h3"),
        ]);
        assert!(!all_pseudo_moves_empty(&board, Color::Black));
        assert!(is_stalemate(&board, Color::White));
    }

    fn all_pseudo_moves_empty(board: &Board, color: Color) -> bool {
        board
            .pieces_of(color)
            .all(|piece| piece_moves(board, &piece).is_empty())
    }

    #[test]
    fn safety_filter_leaves_board_untouched() {
        let board = board(&[
            (Color::White, PieceKind::King, "e1"),
            (Color::White, PieceKind::Rook, "e2"),
            (Color::Black, PieceKind::Rook, "e8"),
            (Color::Black, PieceKind::King, "a8"),
        ]);
        let before = board.clone();
        assert!(!check_move_safety(&board, sq("e2"), sq("d2"), Color::Black));
        assert!(check_move_safety(&board, sq("e2"), sq("e5"), Color::Black));
        assert_eq!(board, before);
    }

    #[test]
    fn squares_between_walks_lines_only() {
        assert_eq!(squares_between(sq("a1"), sq("d1")), vec![sq("b1"), sq("c1")]);
        assert_eq!(squares_between(sq("a1"), sq("c3")), vec![sq("b2")]);
        assert!(squares_between(sq("a1"), sq("b3")).is_empty());
        assert!(squares_between(sq("a1"), sq("a2")).is_empty());
    }
}
