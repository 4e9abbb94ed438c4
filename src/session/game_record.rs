//! Finished-game records and the storage seam they are appended through.

use chrono::{DateTime, Utc};

use crate::move_generation::notation::format_move_table;
use crate::session::events::{GameOutcome, RoomCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub room: RoomCode,
    /// Plies in short algebraic notation.
    pub moves: Vec<String>,
    pub outcome: GameOutcome,
    /// Material captured by white and black.
    pub scores: [u32; 2],
    pub finished_at: DateTime<Utc>,
}

impl GameRecord {
    pub fn new(room: RoomCode, moves: Vec<String>, outcome: GameOutcome, scores: [u32; 2]) -> Self {
        Self {
            room,
            moves,
            outcome,
            scores,
            finished_at: Utc::now(),
        }
    }

    /// One-line summary, e.g. `2026-01-02T03:04:05Z abc123 1-0 (white wins by checkmate) 1. f3 e5 ...`.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{} {} {} ({})",
            self.finished_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.room,
            self.outcome.result(),
            self.outcome
        );
        let table = format_move_table(&self.moves);
        if !table.is_empty() {
            line.push(' ');
            line.push_str(&table.join(" "));
        }
        line
    }
}

pub trait GameStore {
    fn append(&mut self, record: GameRecord) -> Result<(), String>;

    fn records(&self) -> &[GameRecord];
}

#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    records: Vec<GameRecord>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for InMemoryGameStore {
    fn append(&mut self, record: GameRecord) -> Result<(), String> {
        self.records.push(record);
        Ok(())
    }

    fn records(&self) -> &[GameRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Color;
    use chrono::TimeZone;

    #[test]
    fn summary_line_lists_result_and_moves() {
        let mut record = GameRecord::new(
            "abc123".to_owned(),
            ["f3", "e5", "g4", "Qh4#"].iter().map(|s| s.to_string()).collect(),
            GameOutcome::Checkmate { winner: Color::Black },
            [0, 0],
        );
        record.finished_at = Utc
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("timestamp should be valid");
        assert_eq!(
            record.summary_line(),
            "2026-01-02T03:04:05Z abc123 0-1 (black wins by checkmate) 1. f3 e5 2. g4 Qh4#"
        );
    }

    #[test]
    fn in_memory_store_keeps_append_order() {
        let mut store = InMemoryGameStore::new();
        for room in ["first", "second"] {
            store
                .append(GameRecord::new(room.to_owned(), Vec::new(), GameOutcome::DrawAgreed, [0, 0]))
                .expect("in-memory append should succeed");
        }
        let rooms: Vec<&str> = store.records().iter().map(|r| r.room.as_str()).collect();
        assert_eq!(rooms, vec!["first", "second"]);
    }
}
