//! Event payloads exchanged between players through the relay.
//!
//! Inbound [`ClientEvent`]s come from one connection; outbound
//! [`ServerEvent`]s are handed to a [`Relay`](crate::session::relay::Relay)
//! either for the sender or for the rest of the room. Every event has a stable
//! wire name so transports can route it without inspecting the payload.

use std::fmt;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::move_generation::legal_move_apply::MoveType;
use crate::utils::algebraic::square_to_algebraic;

pub type RoomCode = String;
pub type ConnectionId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    CreateGame,
    JoinGame { room: RoomCode },
    MoveRequest { from: Square, to: Square },
    PromotionRequest {
        from_square: Square,
        to_square: Square,
        chosen_kind: PieceKind,
    },
    DrawOffer,
    DrawResponse { accept: bool },
    Resign,
    /// Ask the peer for its full board after a rejected relayed move.
    ResyncRequest,
}

impl ClientEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            ClientEvent::CreateGame => "create-game",
            ClientEvent::JoinGame { .. } => "join-game",
            ClientEvent::MoveRequest { .. } => "move-request",
            ClientEvent::PromotionRequest { .. } => "promotion-request",
            ClientEvent::DrawOffer => "draw-offer",
            ClientEvent::DrawResponse { .. } => "draw-response",
            ClientEvent::Resign => "resign",
            ClientEvent::ResyncRequest => "resync-request",
        }
    }
}

/// Payload of a `move-result` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResultPayload {
    pub from_square: Square,
    pub to_square: Square,
    pub move_type: MoveType,
    pub mover: Color,
    /// Kind of the moving piece before the move.
    pub piece_kind: PieceKind,
    pub promoted_to: Option<PieceKind>,
    pub points: u32,
    pub notation: String,
}

/// Payload of a `game-status` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameStatus {
    pub in_check: bool,
    pub checked_square: Option<Square>,
    pub in_checkmate: bool,
    pub in_stalemate: bool,
    pub winner: Option<Color>,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    DrawAgreed,
    Resignation { winner: Color },
}

impl GameOutcome {
    pub const fn winner(&self) -> Option<Color> {
        match self {
            GameOutcome::Checkmate { winner } | GameOutcome::Resignation { winner } => Some(*winner),
            GameOutcome::Stalemate | GameOutcome::DrawAgreed => None,
        }
    }

    /// Score string in the usual `1-0` / `0-1` / `1/2-1/2` form.
    pub const fn result(&self) -> &'static str {
        match self.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Checkmate { winner } => write!(f, "{winner} wins by checkmate"),
            GameOutcome::Stalemate => write!(f, "draw by stalemate"),
            GameOutcome::DrawAgreed => write!(f, "draw by agreement"),
            GameOutcome::Resignation { winner } => write!(f, "{winner} wins by resignation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    CreateGameResponse { room: RoomCode, seat: Color },
    /// `seat` is `None` when the join was refused; `response` is user-facing.
    JoinGameResponse { response: String, seat: Option<Color> },
    PlayerJoined,
    StartGame { room: RoomCode },
    MoveResult(MoveResultPayload),
    GameStatus(GameStatus),
    PromotionPending { from_square: Square, to_square: Square },
    DrawOffered { by: Color },
    DrawResponse { accept: bool },
    Resigned { by: Color },
    GameOver { outcome: GameOutcome },
    ResyncRequest,
    /// Everything a lagging peer needs to pick the game up again.
    BoardSnapshot {
        board: Box<Board>,
        turn: Color,
        scores: [u32; 2],
        moves: Vec<String>,
        status: GameStatus,
        outcome: Option<GameOutcome>,
        draw_offer: Option<Color>,
    },
}

impl ServerEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            ServerEvent::CreateGameResponse { .. } => "create-game-response",
            ServerEvent::JoinGameResponse { .. } => "join-game-response",
            ServerEvent::PlayerJoined => "player-joined",
            ServerEvent::StartGame { .. } => "start-game",
            ServerEvent::MoveResult(_) => "move-result",
            ServerEvent::GameStatus(_) => "game-status",
            ServerEvent::PromotionPending { .. } => "promotion-pending",
            ServerEvent::DrawOffered { .. } => "draw-offer",
            ServerEvent::DrawResponse { .. } => "draw-response",
            ServerEvent::Resigned { .. } => "resign",
            ServerEvent::GameOver { .. } => "game-over",
            ServerEvent::ResyncRequest => "resync-request",
            ServerEvent::BoardSnapshot { .. } => "board-snapshot",
        }
    }
}

impl fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let square = |sq: Square| square_to_algebraic(sq).unwrap_or_else(|_| sq.to_string());
        write!(f, "{}", self.name())?;
        match self {
            ServerEvent::CreateGameResponse { room, seat } => write!(f, " room={room} seat={seat}"),
            ServerEvent::JoinGameResponse { response, seat } => match seat {
                Some(seat) => write!(f, " {response} seat={seat}"),
                None => write!(f, " {response}"),
            },
            ServerEvent::StartGame { room } => write!(f, " room={room}"),
            ServerEvent::MoveResult(payload) => write!(
                f,
                " {} {}->{} {} points={}",
                payload.notation,
                square(payload.from_square),
                square(payload.to_square),
                payload.move_type,
                payload.points
            ),
            ServerEvent::GameStatus(status) => write!(
                f,
                " check={} checkmate={} stalemate={}",
                status.in_check, status.in_checkmate, status.in_stalemate
            ),
            ServerEvent::PromotionPending { from_square, to_square } => {
                write!(f, " {}->{}", square(*from_square), square(*to_square))
            }
            ServerEvent::DrawOffered { by } | ServerEvent::Resigned { by } => write!(f, " by={by}"),
            ServerEvent::DrawResponse { accept } => write!(f, " accept={accept}"),
            ServerEvent::GameOver { outcome } => write!(f, " {} {outcome}", outcome.result()),
            ServerEvent::BoardSnapshot {
                turn,
                scores,
                moves,
                outcome,
                ..
            } => {
                write!(f, " turn={turn} scores={}-{} plies={}", scores[0], scores[1], moves.len())?;
                match outcome {
                    Some(outcome) => write!(f, " over={}", outcome.result()),
                    None => Ok(()),
                }
            }
            ServerEvent::PlayerJoined | ServerEvent::ResyncRequest => Ok(()),
        }
    }
}
