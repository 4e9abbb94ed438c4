//! Move classification and execution.
//!
//! The executor is the only code that mutates piece placement. A request is
//! classified from the mover and the destination's occupant, checked against
//! the legal move list, and applied in place. Every applied move carries the
//! pre-move pieces so it can be undone exactly.

use std::error::Error;
use std::fmt;

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::legal_moves;

pub type MoveResult<T> = Result<T, MoveError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// No piece on the source square.
    EmptySource(Square),
    /// Destination is not among the piece's legal moves.
    IllegalMove { from: Square, to: Square },
    /// A promotion choice was supplied for a move that does not promote.
    NotAPromotion { from: Square, to: Square },
    /// Pawns may only become a queen, knight, bishop or rook.
    InvalidPromotionChoice(PieceKind),
    /// Undo requested against a board that no longer matches the move.
    UndoMismatch(Square),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::EmptySource(square) => write!(f, "no piece on square {square}"),
            MoveError::IllegalMove { from, to } => write!(f, "illegal move {from} -> {to}"),
            MoveError::NotAPromotion { from, to } => {
                write!(f, "move {from} -> {to} is not a promotion")
            }
            MoveError::InvalidPromotionChoice(kind) => {
                write!(f, "cannot promote to {kind}")
            }
            MoveError::UndoMismatch(square) => {
                write!(f, "board does not match move being undone at square {square}")
            }
        }
    }
}

impl Error for MoveError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Move,
    Capture,
    Castle,
    Promotion,
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveType::Move => "move",
            MoveType::Capture => "capture",
            MoveType::Castle => "castle",
            MoveType::Promotion => "promotion",
        };
        f.write_str(name)
    }
}

/// A move that has been played on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub from: Square,
    pub to: Square,
    pub move_type: MoveType,
    /// The mover as it stood before the move.
    pub mover: Piece,
    /// Piece taken on `to`, if any.
    pub captured: Option<Piece>,
    /// Rook as it stood before castling.
    pub castled_rook: Option<Piece>,
    pub promoted_to: Option<PieceKind>,
    /// Material awarded to the mover's side.
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(AppliedMove),
    /// A pawn reached the last row; nothing moves until a kind is chosen.
    PromotionPending { from: Square, to: Square },
}

/// Classify `from -> to` by the mover and the destination's occupant. No
/// legality check.
pub fn classify_move(board: &Board, from: Square, to: Square) -> MoveResult<MoveType> {
    let mover = board.piece_at(from).ok_or(MoveError::EmptySource(from))?;

    if mover.kind == PieceKind::Pawn && square_row(to) == mover.color.promotion_row() {
        return Ok(MoveType::Promotion);
    }

    Ok(match board.color_at(to) {
        None => MoveType::Move,
        Some(color) if color == mover.color => MoveType::Castle,
        Some(_) => MoveType::Capture,
    })
}

/// Validate `from -> to` against the legal move list, classify it, and apply
/// it unless it is a promotion awaiting a choice.
pub fn classify_and_apply(board: &mut Board, from: Square, to: Square) -> MoveResult<MoveOutcome> {
    ensure_legal(board, from, to)?;

    let applied = match classify_move(board, from, to)? {
        MoveType::Promotion => return Ok(MoveOutcome::PromotionPending { from, to }),
        MoveType::Move => apply_simple(board, from, to)?,
        MoveType::Capture => apply_capture(board, from, to)?,
        MoveType::Castle => apply_castle(board, from, to)?,
    };

    Ok(MoveOutcome::Applied(applied))
}

/// Complete a pending promotion: the pawn leaves `from` and a fresh piece of
/// `kind` appears on `to`, capturing whatever stood there.
pub fn apply_promotion(
    board: &mut Board,
    from: Square,
    to: Square,
    kind: PieceKind,
) -> MoveResult<AppliedMove> {
    if !kind.is_promotion_choice() {
        return Err(MoveError::InvalidPromotionChoice(kind));
    }
    ensure_legal(board, from, to)?;
    if classify_move(board, from, to)? != MoveType::Promotion {
        return Err(MoveError::NotAPromotion { from, to });
    }

    let mover = board.clear(from).ok_or(MoveError::EmptySource(from))?;
    let captured = board.clear(to);
    let mut promoted = Piece::new(mover.color, kind, to);
    promoted.num_moves = mover.num_moves + 1;
    board.place(promoted);

    Ok(AppliedMove {
        from,
        to,
        move_type: MoveType::Promotion,
        mover,
        captured,
        castled_rook: None,
        promoted_to: Some(kind),
        points: captured.map_or(0, |piece| piece.value()),
    })
}

/// Restore the board to the position before `applied`.
pub fn undo_move(board: &mut Board, applied: &AppliedMove) -> MoveResult<()> {
    match applied.move_type {
        MoveType::Move | MoveType::Capture | MoveType::Promotion => {
            board.clear(applied.to).ok_or(MoveError::UndoMismatch(applied.to))?;
            board.place(applied.mover);
            if let Some(captured) = applied.captured {
                board.place(captured);
            }
        }
        MoveType::Castle => {
            let rook = applied
                .castled_rook
                .ok_or(MoveError::UndoMismatch(applied.to))?;
            let (king_to, rook_to) = castle_targets(applied.from, applied.to);
            board.clear(king_to).ok_or(MoveError::UndoMismatch(king_to))?;
            board.clear(rook_to).ok_or(MoveError::UndoMismatch(rook_to))?;
            board.place(applied.mover);
            board.place(rook);
        }
    }
    Ok(())
}

/// Landing squares `(king, rook)` for a king on `king_from` castling with the
/// rook on `rook_from`.
pub fn castle_targets(king_from: Square, rook_from: Square) -> (Square, Square) {
    if rook_from > king_from {
        (king_from + 2, king_from + 1)
    } else {
        (king_from - 2, king_from - 1)
    }
}

fn ensure_legal(board: &Board, from: Square, to: Square) -> MoveResult<()> {
    if board.is_empty(from) {
        return Err(MoveError::EmptySource(from));
    }
    if !legal_moves(board, from).contains(&to) {
        return Err(MoveError::IllegalMove { from, to });
    }
    Ok(())
}

fn apply_simple(board: &mut Board, from: Square, to: Square) -> MoveResult<AppliedMove> {
    let mover = step_piece(board, from, to)?;
    Ok(AppliedMove {
        from,
        to,
        move_type: MoveType::Move,
        mover,
        captured: None,
        castled_rook: None,
        promoted_to: None,
        points: 0,
    })
}

fn apply_capture(board: &mut Board, from: Square, to: Square) -> MoveResult<AppliedMove> {
    let captured = board.clear(to);
    let mover = step_piece(board, from, to)?;
    Ok(AppliedMove {
        from,
        to,
        move_type: MoveType::Capture,
        mover,
        captured,
        castled_rook: None,
        promoted_to: None,
        points: captured.map_or(0, |piece| piece.value()),
    })
}

fn apply_castle(board: &mut Board, from: Square, to: Square) -> MoveResult<AppliedMove> {
    let (king_to, rook_to) = castle_targets(from, to);
    let rook = step_piece(board, to, rook_to)?;
    let mover = step_piece(board, from, king_to)?;
    Ok(AppliedMove {
        from,
        to,
        move_type: MoveType::Castle,
        mover,
        captured: None,
        castled_rook: Some(rook),
        promoted_to: None,
        points: 0,
    })
}

/// Relocate the piece on `from` and bump its move counter, returning it as it
/// stood before.
fn step_piece(board: &mut Board, from: Square, to: Square) -> MoveResult<Piece> {
    let before = board.piece_at(from).ok_or(MoveError::EmptySource(from))?;
    let mut after = board.clear(from).ok_or(MoveError::EmptySource(from))?;
    after.position = to;
    after.num_moves += 1;
    board.place(after);
    Ok(before)
}
