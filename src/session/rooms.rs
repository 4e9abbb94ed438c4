//! Room registry: codes, membership, seats and event routing.
//!
//! A room holds at most two connections. The first member (the creator)
//! takes the seat that moves first, the second takes the other one and the
//! game starts. A third join is refused with a user-visible message. Seats
//! belong to connections: a member keeps its colour when the other one
//! leaves, and a later joiner takes whichever colour is free.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game_state::chess_types::Color;
use crate::session::events::*;
use crate::session::game_record::GameStore;
use crate::session::game_session::{GameSession, SessionError, SessionResult};
use crate::session::relay::Relay;
use crate::session::session_config::SessionConfig;
use crate::utils::room_code::generate_room_code;

pub const ROOM_CAPACITY: usize = 2;
const MAX_CODE_ATTEMPTS: usize = 1024;

pub type RoomResult<T> = Result<T, RoomError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    DoesNotExist(RoomCode),
    Full(RoomCode),
    /// Every generated code was already taken.
    NoFreeCode,
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomError::DoesNotExist(code) => write!(f, "Room {code} doesn't exist. Try another room"),
            RoomError::Full(code) => write!(f, "Room {code} is full. Try another room"),
            RoomError::NoFreeCode => write!(f, "no free room code available"),
        }
    }
}

impl Error for RoomError {}

#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    members: Vec<(ConnectionId, Color)>,
    first_to_move: Color,
    session: GameSession,
}

impl Room {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn members(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.members.iter().map(|&(member, _)| member)
    }

    pub fn is_active(&self) -> bool {
        self.members.len() == ROOM_CAPACITY
    }

    pub fn seat_of(&self, connection: ConnectionId) -> Option<Color> {
        self.members
            .iter()
            .find(|&&(member, _)| member == connection)
            .map(|&(_, seat)| seat)
    }

    /// Colour for the next joiner: the first mover's seat when it is empty,
    /// otherwise the other one.
    fn free_seat(&self) -> Color {
        if self.members.iter().any(|&(_, seat)| seat == self.first_to_move) {
            self.first_to_move.opposite()
        } else {
            self.first_to_move
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }
}

pub struct RoomRegistry<S: GameStore> {
    config: SessionConfig,
    rng: StdRng,
    rooms: HashMap<RoomCode, Room>,
    memberships: HashMap<ConnectionId, RoomCode>,
    store: S,
}

impl<S: GameStore> RoomRegistry<S> {
    pub fn new(config: SessionConfig, store: S) -> Self {
        Self::with_rng(config, store, StdRng::from_os_rng())
    }

    pub fn with_seed(config: SessionConfig, store: S, seed: u64) -> Self {
        Self::with_rng(config, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SessionConfig, store: S, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            rooms: HashMap::new(),
            memberships: HashMap::new(),
            store,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn room(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn room_of(&self, connection: ConnectionId) -> Option<&Room> {
        self.memberships
            .get(&connection)
            .and_then(|code| self.rooms.get(code))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Open a fresh room with `connection` as its only member.
    pub fn create_room(&mut self, connection: ConnectionId) -> RoomResult<RoomCode> {
        let code = self.free_code()?;
        self.leave(connection);
        let room = Room {
            code: code.clone(),
            members: vec![(connection, self.config.first_to_move)],
            first_to_move: self.config.first_to_move,
            session: GameSession::new(code.clone(), self.config.first_to_move),
        };
        self.rooms.insert(code.clone(), room);
        self.memberships.insert(connection, code.clone());
        Ok(code)
    }

    fn free_code(&mut self) -> RoomResult<RoomCode> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_room_code(
                &mut self.rng,
                self.config.room_code_length,
                self.config.room_code_alphabet,
            );
            if !code.is_empty() && !self.rooms.contains_key(&code) {
                return Ok(code);
            }
        }
        Err(RoomError::NoFreeCode)
    }

    /// Seat `connection` in `code`, returning its colour.
    pub fn join_room(&mut self, code: &str, connection: ConnectionId) -> RoomResult<Color> {
        let room = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::DoesNotExist(code.to_owned()))?;
        if let Some(seat) = room.seat_of(connection) {
            return Ok(seat);
        }
        if room.members.len() >= ROOM_CAPACITY {
            return Err(RoomError::Full(code.to_owned()));
        }

        self.leave(connection);
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::DoesNotExist(code.to_owned()))?;
        let seat = room.free_seat();
        room.members.push((connection, seat));
        self.memberships.insert(connection, code.to_owned());
        Ok(seat)
    }

    /// Drop `connection` from its room; empty rooms are removed.
    pub fn leave(&mut self, connection: ConnectionId) {
        let Some(code) = self.memberships.remove(&connection) else {
            return;
        };
        if let Some(room) = self.rooms.get_mut(&code) {
            room.members.retain(|&(member, _)| member != connection);
            if room.members.is_empty() {
                self.rooms.remove(&code);
            }
        }
    }

    /// Route one inbound event from `connection`.
    ///
    /// Membership problems are answered to the sender and are not errors.
    /// Game events from a connection outside any room fail with
    /// [`SessionError::NotInRoom`]; game events in a room still waiting for
    /// its second player are ignored.
    pub fn handle(
        &mut self,
        connection: ConnectionId,
        event: &ClientEvent,
        relay: &mut dyn Relay,
    ) -> SessionResult<()> {
        match event {
            ClientEvent::CreateGame => {
                match self.create_room(connection) {
                    Ok(room) => relay.emit_to_sender(&ServerEvent::CreateGameResponse {
                        room,
                        seat: self.config.first_to_move,
                    }),
                    Err(e) => relay.emit_to_sender(&ServerEvent::JoinGameResponse {
                        response: e.to_string(),
                        seat: None,
                    }),
                }
                Ok(())
            }
            ClientEvent::JoinGame { room } => {
                match self.join_room(room, connection) {
                    Ok(seat) => {
                        relay.emit_to_sender(&ServerEvent::JoinGameResponse {
                            response: format!("Joined room {room}"),
                            seat: Some(seat),
                        });
                        relay.broadcast_to_room(room, &ServerEvent::PlayerJoined);
                        let start = ServerEvent::StartGame { room: room.clone() };
                        relay.emit_to_sender(&start);
                        relay.broadcast_to_room(room, &start);
                    }
                    Err(e) => relay.emit_to_sender(&ServerEvent::JoinGameResponse {
                        response: e.to_string(),
                        seat: None,
                    }),
                }
                Ok(())
            }
            _ => self.handle_game_event(connection, event, relay),
        }
    }

    fn handle_game_event(
        &mut self,
        connection: ConnectionId,
        event: &ClientEvent,
        relay: &mut dyn Relay,
    ) -> SessionResult<()> {
        let code = self
            .memberships
            .get(&connection)
            .ok_or(SessionError::NotInRoom(connection))?;
        let room = self
            .rooms
            .get_mut(code)
            .ok_or(SessionError::NotInRoom(connection))?;
        let seat = room
            .seat_of(connection)
            .ok_or(SessionError::NotInRoom(connection))?;
        if !room.is_active() {
            return Ok(());
        }

        room.session.handle_event(seat, event, relay)?;

        // Kept on the session until the store accepts it; the next routed
        // event retries.
        if let Some(record) = room.session.finished_record() {
            self.store
                .append(record.clone())
                .map_err(SessionError::Store)?;
            room.session.take_record();
        }
        Ok(())
    }
}
