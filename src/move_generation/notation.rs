//! Short algebraic notation for applied moves and the numbered move table.

use crate::game_state::chess_types::PieceKind;
use crate::move_generation::legal_move_apply::{AppliedMove, MoveType};
use crate::utils::algebraic::{file_letter, rank_number};

/// Check state of the opponent after a move, used for the notation suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    None,
    Check,
    Checkmate,
}

impl CheckState {
    #[inline]
    pub const fn suffix(self) -> &'static str {
        match self {
            CheckState::None => "",
            CheckState::Check => "+",
            CheckState::Checkmate => "#",
        }
    }
}

/// Render `applied` as e.g. `Nf3`, `exd5`, `0-0`, `e8=Q#`.
pub fn move_notation(applied: &AppliedMove, check: CheckState) -> String {
    let destination = format!("{}{}", file_letter(applied.to), rank_number(applied.to));
    let capture = applied.captured.is_some();

    let body = match applied.move_type {
        MoveType::Castle => {
            if applied.from < applied.to {
                "0-0".to_owned()
            } else {
                "0-0-0".to_owned()
            }
        }
        MoveType::Promotion => {
            let identifier = applied.promoted_to.map_or("", PieceKind::identifier);
            format!("{}{destination}={identifier}", capture_prefix(applied, capture))
        }
        MoveType::Move | MoveType::Capture => {
            let identifier = applied.mover.identifier();
            if applied.mover.kind == PieceKind::Pawn {
                format!("{}{destination}", capture_prefix(applied, capture))
            } else if capture {
                format!("{identifier}x{destination}")
            } else {
                format!("{identifier}{destination}")
            }
        }
    };

    format!("{body}{}", check.suffix())
}

fn capture_prefix(applied: &AppliedMove, capture: bool) -> String {
    if capture {
        format!("{}x", file_letter(applied.from))
    } else {
        String::new()
    }
}

/// Pair plies into numbered lines: `["1. e4 e5", "2. Nf3"]`.
pub fn format_move_table(moves: &[String]) -> Vec<String> {
    moves
        .chunks(2)
        .enumerate()
        .map(|(index, pair)| format!("{}. {}", index + 1, pair.join(" ")))
        .collect()
}
