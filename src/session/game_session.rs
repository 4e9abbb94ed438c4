//! One game between two seats.
//!
//! The session owns the board and is the only caller of the executor during
//! play. Each inbound event is handled to completion before the next one:
//! turn and ownership checks first, then the executor, then a fresh check
//! scan that produces the status and the notation suffix. Rejected requests
//! (out of turn, wrong colour, illegal destination) change nothing and emit
//! nothing.
//!
//! A peer that only mirrors the game feeds relayed `move-result` payloads to
//! [`GameSession::mirror_move_result`]. If a payload does not fit the local
//! board the mirror asks for a resync and the authoritative side answers with
//! a full snapshot.

use std::error::Error;
use std::fmt;

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{
    apply_promotion, classify_and_apply, undo_move, AppliedMove, MoveError, MoveOutcome,
};
use crate::move_generation::legal_move_checks::{is_check, is_checkmate, is_stalemate};
use crate::move_generation::notation::{format_move_table, move_notation, CheckState};
use crate::session::events::*;
use crate::session::game_record::GameRecord;
use crate::session::relay::Relay;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A relayed move does not match the local board.
    Desynchronized { from: Square, to: Square },
    /// The game has already ended.
    GameOver,
    /// The connection is not seated in any room.
    NotInRoom(ConnectionId),
    /// The game store refused a finished record.
    Store(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Desynchronized { from, to } => {
                write!(f, "relayed move {from} -> {to} does not match the local board")
            }
            SessionError::GameOver => write!(f, "game is already over"),
            SessionError::NotInRoom(connection) => {
                write!(f, "connection {connection} is not in a room")
            }
            SessionError::Store(message) => write!(f, "could not store game record: {message}"),
        }
    }
}

impl Error for SessionError {}

#[derive(Debug, Clone)]
pub struct GameSession {
    room: RoomCode,
    board: Board,
    turn: Color,
    scores: [u32; 2],
    moves: Vec<String>,
    history: Vec<AppliedMove>,
    pending_promotion: Option<(Square, Square)>,
    draw_offer: Option<Color>,
    status: GameStatus,
    outcome: Option<GameOutcome>,
    finished_record: Option<GameRecord>,
}

impl GameSession {
    pub fn new(room: RoomCode, first_to_move: Color) -> Self {
        Self::with_board(room, Board::new_game(), first_to_move)
    }

    /// Start from an arbitrary position with `turn` to move.
    pub fn with_board(room: RoomCode, board: Board, turn: Color) -> Self {
        Self {
            room,
            board,
            turn,
            scores: [0; 2],
            moves: Vec::new(),
            history: Vec::new(),
            pending_promotion: None,
            draw_offer: None,
            status: GameStatus::default(),
            outcome: None,
            finished_record: None,
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    pub fn score(&self, color: Color) -> u32 {
        self.scores[color.index()]
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn move_table(&self) -> Vec<String> {
        format_move_table(&self.moves)
    }

    pub fn history(&self) -> &[AppliedMove] {
        &self.history
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn pending_promotion(&self) -> Option<(Square, Square)> {
        self.pending_promotion
    }

    pub fn draw_offer(&self) -> Option<Color> {
        self.draw_offer
    }

    /// Record of the finished game, until it is taken.
    pub fn finished_record(&self) -> Option<&GameRecord> {
        self.finished_record.as_ref()
    }

    /// Hand over the record of a finished game, once.
    pub fn take_record(&mut self) -> Option<GameRecord> {
        self.finished_record.take()
    }

    /// Handle one game event sent by the player holding `seat`.
    pub fn handle_event(
        &mut self,
        seat: Color,
        event: &ClientEvent,
        relay: &mut dyn Relay,
    ) -> SessionResult<()> {
        if let ClientEvent::ResyncRequest = event {
            relay.emit_to_sender(&self.snapshot());
            return Ok(());
        }
        if self.is_over() {
            return Ok(());
        }

        match *event {
            ClientEvent::MoveRequest { from, to } => self.request_move(seat, from, to, relay),
            ClientEvent::PromotionRequest {
                from_square,
                to_square,
                chosen_kind,
            } => self.request_promotion(seat, from_square, to_square, chosen_kind, relay),
            ClientEvent::DrawOffer => {
                if self.draw_offer.is_none() {
                    self.draw_offer = Some(seat);
                    relay.broadcast_to_room(&self.room, &ServerEvent::DrawOffered { by: seat });
                }
                Ok(())
            }
            ClientEvent::DrawResponse { accept } => {
                if self.draw_offer != Some(seat.opposite()) {
                    return Ok(());
                }
                self.draw_offer = None;
                relay.broadcast_to_room(&self.room, &ServerEvent::DrawResponse { accept });
                if accept {
                    self.finish(GameOutcome::DrawAgreed, relay);
                }
                Ok(())
            }
            ClientEvent::Resign => {
                relay.broadcast_to_room(&self.room, &ServerEvent::Resigned { by: seat });
                self.finish(
                    GameOutcome::Resignation {
                        winner: seat.opposite(),
                    },
                    relay,
                );
                Ok(())
            }
            ClientEvent::CreateGame | ClientEvent::JoinGame { .. } | ClientEvent::ResyncRequest => {
                Ok(())
            }
        }
    }

    fn may_move(&self, seat: Color, from: Square) -> bool {
        seat == self.turn && self.board.color_at(from) == Some(seat)
    }

    fn request_move(
        &mut self,
        seat: Color,
        from: Square,
        to: Square,
        relay: &mut dyn Relay,
    ) -> SessionResult<()> {
        if !self.may_move(seat, from) || self.pending_promotion.is_some() {
            return Ok(());
        }

        match classify_and_apply(&mut self.board, from, to) {
            Ok(MoveOutcome::Applied(applied)) => {
                self.publish_move(applied, relay);
            }
            Ok(MoveOutcome::PromotionPending { from, to }) => {
                self.pending_promotion = Some((from, to));
                relay.emit_to_sender(&ServerEvent::PromotionPending {
                    from_square: from,
                    to_square: to,
                });
            }
            Err(_) => {}
        }
        Ok(())
    }

    fn request_promotion(
        &mut self,
        seat: Color,
        from: Square,
        to: Square,
        kind: PieceKind,
        relay: &mut dyn Relay,
    ) -> SessionResult<()> {
        if !self.may_move(seat, from) {
            return Ok(());
        }
        if self.pending_promotion.is_some_and(|pending| pending != (from, to)) {
            return Ok(());
        }

        if let Ok(applied) = apply_promotion(&mut self.board, from, to, kind) {
            self.pending_promotion = None;
            self.publish_move(applied, relay);
        }
        Ok(())
    }

    fn publish_move(&mut self, applied: AppliedMove, relay: &mut dyn Relay) {
        let payload = self.record_move(applied);
        let status = self.status;

        for event in [ServerEvent::MoveResult(payload), ServerEvent::GameStatus(status)] {
            relay.emit_to_sender(&event);
            relay.broadcast_to_room(&self.room, &event);
        }

        if status.in_checkmate {
            if let Some(winner) = status.winner {
                self.finish(GameOutcome::Checkmate { winner }, relay);
            }
        } else if status.in_stalemate {
            self.finish(GameOutcome::Stalemate, relay);
        }
    }

    /// Evaluate the position after `applied`, then update turn, scores,
    /// move list and status.
    fn record_move(&mut self, applied: AppliedMove) -> MoveResultPayload {
        let mover = applied.mover.color;
        let scan = is_check(&self.board, mover);
        let in_check = scan.in_check();
        let in_checkmate = in_check && is_checkmate(&self.board, &scan);
        let in_stalemate = !in_check && is_stalemate(&self.board, mover);

        let check_state = if in_checkmate {
            CheckState::Checkmate
        } else if in_check {
            CheckState::Check
        } else {
            CheckState::None
        };
        let notation = move_notation(&applied, check_state);

        self.scores[mover.index()] += applied.points;
        self.moves.push(notation.clone());
        self.turn = mover.opposite();
        self.draw_offer = None;
        self.status = GameStatus {
            in_check,
            checked_square: if in_check { scan.defender_king } else { None },
            in_checkmate,
            in_stalemate,
            winner: in_checkmate.then_some(mover),
        };

        let payload = MoveResultPayload {
            from_square: applied.from,
            to_square: applied.to,
            move_type: applied.move_type,
            mover,
            piece_kind: applied.mover.kind,
            promoted_to: applied.promoted_to,
            points: applied.points,
            notation,
        };
        self.history.push(applied);
        payload
    }

    fn finish(&mut self, outcome: GameOutcome, relay: &mut dyn Relay) {
        self.outcome = Some(outcome);
        self.pending_promotion = None;
        self.draw_offer = None;
        self.finished_record = Some(GameRecord::new(
            self.room.clone(),
            self.moves.clone(),
            outcome,
            self.scores,
        ));

        let event = ServerEvent::GameOver { outcome };
        relay.emit_to_sender(&event);
        relay.broadcast_to_room(&self.room, &event);
    }

    /// Replay a move relayed from the authoritative peer.
    ///
    /// The source square must hold a piece of the mover's colour and kind,
    /// and the executor must agree on the move type; otherwise the board is
    /// left as it was and [`SessionError::Desynchronized`] is returned.
    pub fn apply_relayed(&mut self, payload: &MoveResultPayload) -> SessionResult<GameStatus> {
        if self.is_over() {
            return Err(SessionError::GameOver);
        }
        let from = payload.from_square;
        let to = payload.to_square;
        let desync = SessionError::Desynchronized { from, to };

        let matches_local = self
            .board
            .piece_at(from)
            .is_some_and(|piece| piece.color == payload.mover && piece.kind == payload.piece_kind);
        if !matches_local || payload.mover != self.turn {
            return Err(desync);
        }

        let applied = match payload.promoted_to {
            Some(kind) => apply_promotion(&mut self.board, from, to, kind),
            None => match classify_and_apply(&mut self.board, from, to) {
                Ok(MoveOutcome::Applied(applied)) => Ok(applied),
                Ok(MoveOutcome::PromotionPending { .. }) => Err(MoveError::IllegalMove { from, to }),
                Err(e) => Err(e),
            },
        }
        .map_err(|_| desync.clone())?;

        if applied.move_type != payload.move_type {
            undo_move(&mut self.board, &applied).map_err(|_| desync.clone())?;
            return Err(desync);
        }

        self.pending_promotion = None;
        self.record_move(applied);
        if self.status.in_checkmate {
            if let Some(winner) = self.status.winner {
                self.outcome = Some(GameOutcome::Checkmate { winner });
            }
        } else if self.status.in_stalemate {
            self.outcome = Some(GameOutcome::Stalemate);
        }
        Ok(self.status)
    }

    /// [`apply_relayed`](Self::apply_relayed), asking the peer for a snapshot
    /// when the move does not fit.
    pub fn mirror_move_result(
        &mut self,
        payload: &MoveResultPayload,
        relay: &mut dyn Relay,
    ) -> SessionResult<GameStatus> {
        let result = self.apply_relayed(payload);
        if let Err(SessionError::Desynchronized { .. }) = result {
            relay.broadcast_to_room(&self.room, &ServerEvent::ResyncRequest);
        }
        result
    }

    /// Full state for a peer that lost track of the game.
    pub fn snapshot(&self) -> ServerEvent {
        ServerEvent::BoardSnapshot {
            board: Box::new(self.board.clone()),
            turn: self.turn,
            scores: self.scores,
            moves: self.moves.clone(),
            status: self.status,
            outcome: self.outcome,
            draw_offer: self.draw_offer,
        }
    }

    /// Adopt a peer's snapshot. Returns `false` (and changes nothing) for
    /// any other event.
    /// Local undo history is cleared; the finished-game record stays with
    /// the peer that produced it.
    pub fn restore_snapshot(&mut self, event: &ServerEvent) -> bool {
        let ServerEvent::BoardSnapshot {
            board,
            turn,
            scores,
            moves,
            status,
            outcome,
            draw_offer,
        } = event
        else {
            return false;
        };
        self.board = (**board).clone();
        self.turn = *turn;
        self.scores = *scores;
        self.moves = moves.clone();
        self.history.clear();
        self.status = *status;
        self.outcome = *outcome;
        self.draw_offer = *draw_offer;
        self.pending_promotion = None;
        self.finished_record = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_apply::MoveType;
    use crate::session::relay::RecordingRelay;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("test square should parse")
    }

    fn request(from: &str, to: &str) -> ClientEvent {
        ClientEvent::MoveRequest {
            from: sq(from),
            to: sq(to),
        }
    }

    fn play(session: &mut GameSession, seat: Color, from: &str, to: &str) -> RecordingRelay {
        let mut relay = RecordingRelay::new();
        session
            .handle_event(seat, &request(from, to), &mut relay)
            .expect("move request should not error");
        relay
    }

    fn last_move_result(relay: &RecordingRelay) -> MoveResultPayload {
        relay
            .replies
            .iter()
            .rev()
            .find_map(|event| match event {
                ServerEvent::MoveResult(payload) => Some(payload.clone()),
                _ => None,
            })
            .expect("a move result should have been sent")
    }

    #[test]
    fn fools_mate_ends_the_game_with_a_record() {
        let mut session = GameSession::new("room01".to_owned(), Color::White);
        play(&mut session, Color::White, "f2", "f3");
        play(&mut session, Color::Black, "e7", "e5");
        play(&mut session, Color::White, "g2", "g4");
        let relay = play(&mut session, Color::Black, "d8", "h4");

        assert_eq!(session.moves(), ["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(session.move_table(), vec!["1. f3 e5", "2. g4 Qh4#"]);
        let status = session.status();
        assert!(status.in_check && status.in_checkmate && !status.in_stalemate);
        assert_eq!(status.checked_square, Some(sq("e1")));
        assert_eq!(status.winner, Some(Color::Black));
        assert_eq!(session.outcome(), Some(GameOutcome::Checkmate { winner: Color::Black }));
        assert_eq!(relay.broadcast_names(), vec!["move-result", "game-status", "game-over"]);
        assert_eq!(relay.reply_names(), vec!["move-result", "game-status", "game-over"]);

        let record = session.take_record().expect("finished game should have a record");
        assert_eq!(record.room, "room01");
        assert_eq!(record.moves.len(), 4);
        assert!(session.take_record().is_none());

        let after = play(&mut session, Color::White, "e2", "e4");
        assert!(after.replies.is_empty() && after.broadcasts.is_empty());
    }

    #[test]
    fn out_of_turn_and_foreign_piece_requests_are_ignored() {
        let mut session = GameSession::new("r".to_owned(), Color::White);
        let before = session.board().clone();

        let relay = play(&mut session, Color::Black, "e7", "e5");
        assert!(relay.replies.is_empty() && relay.broadcasts.is_empty());
        let relay = play(&mut session, Color::White, "e7", "e5");
        assert!(relay.replies.is_empty());
        let relay = play(&mut session, Color::White, "e2", "e5");
        assert!(relay.replies.is_empty());

        assert_eq!(session.board(), &before);
        assert_eq!(session.turn(), Color::White);
    }

    #[test]
    fn captures_add_to_the_movers_score() {
        let mut session = GameSession::new("r".to_owned(), Color::White);
        play(&mut session, Color::White, "e2", "e4");
        play(&mut session, Color::Black, "d7", "d5");
        let relay = play(&mut session, Color::White, "e4", "d5");
        let payload = last_move_result(&relay);
        assert_eq!(payload.move_type, MoveType::Capture);
        assert_eq!(payload.notation, "exd5");
        assert_eq!(session.score(Color::White), 1);
        assert_eq!(session.score(Color::Black), 0);
    }

    #[test]
    fn promotion_waits_for_the_chosen_kind() {
        let board = Board::from_placements(&[
            (Color::White, PieceKind::Pawn, "a7"),
            (Color::White, PieceKind::King, "e1"),
            (Color::Black, PieceKind::King, "h5"),
        ])
        .expect("placements should be valid");
        let mut session = GameSession::with_board("r".to_owned(), board, Color::White);

        let relay = play(&mut session, Color::White, "a7", "a8");
        assert_eq!(relay.reply_names(), vec!["promotion-pending"]);
        assert!(relay.broadcasts.is_empty());
        assert_eq!(session.pending_promotion(), Some((sq("a7"), sq("a8"))));
        assert_eq!(session.turn(), Color::White);

        let mut relay = RecordingRelay::new();
        let promote = ClientEvent::PromotionRequest {
            from_square: sq("a7"),
            to_square: sq("a8"),
            chosen_kind: PieceKind::Knight,
        };
        session
            .handle_event(Color::White, &promote, &mut relay)
            .expect("promotion should not error");
        let payload = last_move_result(&relay);
        assert_eq!(payload.notation, "a8=N");
        assert_eq!(payload.promoted_to, Some(PieceKind::Knight));
        let knight = session.board().piece_at(sq("a8")).expect("knight should stand on a8");
        assert_eq!((knight.kind, knight.value(), knight.identifier()), (PieceKind::Knight, 3, "N"));
        assert_eq!(session.pending_promotion(), None);
        assert_eq!(session.turn(), Color::Black);
    }

    #[test]
    fn stalemate_ends_the_game_drawn() {
        let board = Board::from_placements(&[
            (Color::White, PieceKind::King, "f7"),
            (Color::White, PieceKind::Queen, "g5"),
            (Color::Black, PieceKind::King, "h8"),
        ])
        .expect("placements should be valid");
        let mut session = GameSession::with_board("r".to_owned(), board, Color::White);
        play(&mut session, Color::White, "g5", "g6");
        assert!(session.status().in_stalemate);
        assert_eq!(session.outcome(), Some(GameOutcome::Stalemate));
    }

    #[test]
    fn draw_needs_an_offer_from_the_other_side() {
        let mut session = GameSession::new("r".to_owned(), Color::White);
        let mut relay = RecordingRelay::new();

        session
            .handle_event(Color::Black, &ClientEvent::DrawResponse { accept: true }, &mut relay)
            .expect("stray response should not error");
        assert!(relay.broadcasts.is_empty());

        session
            .handle_event(Color::White, &ClientEvent::DrawOffer, &mut relay)
            .expect("offer should not error");
        session
            .handle_event(Color::White, &ClientEvent::DrawResponse { accept: true }, &mut relay)
            .expect("self response should not error");
        assert_eq!(session.outcome(), None);

        session
            .handle_event(Color::Black, &ClientEvent::DrawResponse { accept: true }, &mut relay)
            .expect("response should not error");
        assert_eq!(session.outcome(), Some(GameOutcome::DrawAgreed));
        assert_eq!(
            relay.broadcast_names(),
            vec!["draw-offer", "draw-response", "game-over"]
        );
    }

    #[test]
    fn declined_draw_keeps_playing_and_resign_ends() {
        let mut session = GameSession::new("r".to_owned(), Color::White);
        let mut relay = RecordingRelay::new();
        session
            .handle_event(Color::Black, &ClientEvent::DrawOffer, &mut relay)
            .expect("offer should not error");
        session
            .handle_event(Color::White, &ClientEvent::DrawResponse { accept: false }, &mut relay)
            .expect("response should not error");
        assert_eq!(session.outcome(), None);
        assert_eq!(session.draw_offer(), None);

        session
            .handle_event(Color::Black, &ClientEvent::Resign, &mut relay)
            .expect("resign should not error");
        assert_eq!(session.outcome(), Some(GameOutcome::Resignation { winner: Color::White }));
    }

    #[test]
    fn mirror_replays_relayed_moves() {
        let mut host = GameSession::new("r".to_owned(), Color::White);
        let mut mirror = GameSession::new("r".to_owned(), Color::White);

        for (seat, from, to) in [
            (Color::White, "e2", "e4"),
            (Color::Black, "e7", "e5"),
            (Color::White, "g1", "f3"),
        ] {
            let relay = play(&mut host, seat, from, to);
            let mut mirror_relay = RecordingRelay::new();
            mirror
                .mirror_move_result(&last_move_result(&relay), &mut mirror_relay)
                .expect("mirror should stay in sync");
        }

        assert!(mirror.board().same_position(host.board()));
        assert_eq!(mirror.moves(), host.moves());
        assert_eq!(mirror.turn(), Color::Black);
    }

    #[test]
    fn desynchronised_mirror_requests_and_restores_a_snapshot() {
        let mut host = GameSession::new("r".to_owned(), Color::White);
        let mut mirror = GameSession::new("r".to_owned(), Color::White);

        play(&mut host, Color::White, "e2", "e4");
        let relay = play(&mut host, Color::Black, "e7", "e5");
        let payload = last_move_result(&relay);

        let mut mirror_relay = RecordingRelay::new();
        let before = mirror.board().clone();
        let result = mirror.mirror_move_result(&payload, &mut mirror_relay);
        assert_eq!(
            result,
            Err(SessionError::Desynchronized {
                from: sq("e7"),
                to: sq("e5")
            })
        );
        assert_eq!(mirror.board(), &before);
        assert_eq!(mirror_relay.broadcast_names(), vec!["resync-request"]);

        let mut host_relay = RecordingRelay::new();
        host.handle_event(Color::White, &ClientEvent::ResyncRequest, &mut host_relay)
            .expect("resync should not error");
        assert_eq!(host_relay.reply_names(), vec!["board-snapshot"]);
        assert!(mirror.restore_snapshot(&host_relay.replies[0]));
        assert!(mirror.board().same_position(host.board()));
        assert_eq!(mirror.turn(), Color::White);
        assert_eq!(mirror.moves(), host.moves());
        assert_eq!(mirror.move_table(), host.move_table());
        assert_eq!(mirror.status(), host.status());

        // The restored mirror follows the host again.
        let relay = play(&mut host, Color::White, "g1", "f3");
        let payload = last_move_result(&relay);
        mirror
            .apply_relayed(&payload)
            .expect("restored mirror should accept the next move");
        assert_eq!(mirror.moves(), host.moves());
    }

    #[test]
    fn snapshot_carries_a_finished_game() {
        let mut host = GameSession::new("r".to_owned(), Color::White);
        let mut mirror = GameSession::new("r".to_owned(), Color::White);
        play(&mut host, Color::White, "e2", "e4");
        let mut relay = RecordingRelay::new();
        host.handle_event(Color::White, &ClientEvent::DrawOffer, &mut relay)
            .expect("draw offer should not error");

        let snapshot = host.snapshot();
        assert!(mirror.restore_snapshot(&snapshot));
        assert_eq!(mirror.draw_offer(), Some(Color::White));
        assert!(!mirror.is_over());

        host.handle_event(Color::Black, &ClientEvent::Resign, &mut relay)
            .expect("resign should not error");
        assert!(mirror.restore_snapshot(&host.snapshot()));
        assert!(mirror.is_over());
        assert_eq!(
            mirror.outcome(),
            Some(GameOutcome::Resignation { winner: Color::White })
        );
        assert_eq!(mirror.moves(), &["e4".to_owned()]);
        assert!(mirror.take_record().is_none());
        assert!(!mirror.restore_snapshot(&ServerEvent::PlayerJoined));
    }

    #[test]
    fn relayed_kind_mismatch_is_a_desync() {
        let mut mirror = GameSession::new("r".to_owned(), Color::White);
        let payload = MoveResultPayload {
            from_square: sq("e2"),
            to_square: sq("e4"),
            move_type: MoveType::Move,
            mover: Color::White,
            piece_kind: PieceKind::Knight,
            promoted_to: None,
            points: 0,
            notation: "Ne4".to_owned(),
        };
        assert!(matches!(
            mirror.apply_relayed(&payload),
            Err(SessionError::Desynchronized { .. })
        ));
        assert!(mirror.moves().is_empty());
    }
}
