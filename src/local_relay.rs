//! Line-oriented relay for playing on one terminal.
//!
//! Each input line is `<connection> <command> [args]`, for example
//! `1 create`, `2 join Ab3xYz`, `1 move e2 e4`, `2 promote a2 a1 q`,
//! `1 draw`, `2 accept`, `2 resign`, `1 board`, `1 hints g1`, `1 moves`.
//! Every event the registry emits is printed as `<connection> <- <event>`;
//! problems are reported as `info string ...` lines.

use std::sync::mpsc::{Receiver, Sender};

use duel_chess::game_state::chess_types::{Color, PieceKind, Square};
use duel_chess::session::events::{ClientEvent, ConnectionId};
use duel_chess::session::game_record::{GameStore, InMemoryGameStore};
use duel_chess::session::relay::RecordingRelay;
use duel_chess::session::rooms::RoomRegistry;
use duel_chess::session::session_config::SessionConfig;
use duel_chess::utils::algebraic::algebraic_to_square;
use duel_chess::utils::render_game_state::render_game_state;

enum CommandToken {
    Event(ClientEvent),
    Board,
    Hints(Square),
    Moves,
    Leave,
}

pub struct LocalRelay {
    command_rx: Receiver<String>,
    response_tx: Sender<String>,
    registry: RoomRegistry<InMemoryGameStore>,
    stored_games: usize,
}

impl LocalRelay {
    pub fn new(command_rx: Receiver<String>, response_tx: Sender<String>) -> Self {
        let config = SessionConfig::from_env();
        LocalRelay {
            command_rx,
            response_tx,
            registry: RoomRegistry::new(config, InMemoryGameStore::new()),
            stored_games: 0,
        }
    }

    /// Block for one command line and answer it. Returns `false` once the
    /// input side has hung up.
    pub fn tick(&mut self) -> bool {
        match self.get_command() {
            Some(line) => {
                if let Err(err) = self.handle_line(&line) {
                    self.give_response(format!("info string {err}"));
                }
                true
            }
            None => false,
        }
    }

    fn get_command(&mut self) -> Option<String> {
        self.command_rx.recv().ok()
    }

    fn give_response(&mut self, response: String) {
        let _ = self.response_tx.send(response);
    }

    fn handle_line(&mut self, line: &str) -> Result<(), String> {
        let (connection, token) = parse_command(line)?;
        match token {
            CommandToken::Event(event) => self.dispatch(connection, &event),
            CommandToken::Board => {
                let (board, seat) = {
                    let room = self.seated_room(connection)?;
                    let seat = room.seat_of(connection).unwrap_or(Color::White);
                    (room.session().board().clone(), seat)
                };
                for row in render_game_state(&board, seat).lines() {
                    self.give_response(row.to_owned());
                }
                Ok(())
            }
            CommandToken::Hints(square) => {
                let (mut board, seat) = {
                    let room = self.seated_room(connection)?;
                    let seat = room.seat_of(connection).unwrap_or(Color::White);
                    (room.session().board().clone(), seat)
                };
                let hints = board.show_hints(square);
                self.give_response(format!("info string {} legal destinations", hints.len()));
                for row in render_game_state(&board, seat).lines() {
                    self.give_response(row.to_owned());
                }
                Ok(())
            }
            CommandToken::Moves => {
                let (table, scores) = {
                    let session = self.seated_room(connection)?.session();
                    (session.move_table(), session.scores())
                };
                for row in table {
                    self.give_response(row);
                }
                self.give_response(format!(
                    "info string score white {} black {}",
                    scores[Color::White.index()],
                    scores[Color::Black.index()]
                ));
                Ok(())
            }
            CommandToken::Leave => {
                self.registry.leave(connection);
                self.give_response(format!("info string connection {connection} left"));
                Ok(())
            }
        }
    }

    fn seated_room(
        &self,
        connection: ConnectionId,
    ) -> Result<&duel_chess::session::rooms::Room, String> {
        self.registry
            .room_of(connection)
            .ok_or_else(|| format!("connection {connection} is not in a room"))
    }

    fn dispatch(&mut self, connection: ConnectionId, event: &ClientEvent) -> Result<(), String> {
        let mut relay = RecordingRelay::new();
        let outcome = self.registry.handle(connection, event, &mut relay);

        for reply in &relay.replies {
            self.give_response(format!("{connection} <- {reply}"));
        }
        for (room, event) in &relay.broadcasts {
            let recipients: Vec<ConnectionId> = self
                .registry
                .room(room)
                .map(|room| {
                    room.members()
                        .filter(|&member| member != connection)
                        .collect()
                })
                .unwrap_or_default();
            for member in recipients {
                self.give_response(format!("{member} <- {event}"));
            }
        }

        let records = self.registry.store().records();
        let fresh: Vec<String> = records[self.stored_games..]
            .iter()
            .map(|record| format!("info string stored {}", record.summary_line()))
            .collect();
        self.stored_games = records.len();
        for line in fresh {
            self.give_response(line);
        }

        outcome.map_err(|e| e.to_string())
    }
}

fn parse_command(input: &str) -> Result<(ConnectionId, CommandToken), String> {
    let mut words = input.split_whitespace();
    let connection = words
        .next()
        .ok_or_else(|| "empty command".to_owned())?
        .parse::<ConnectionId>()
        .map_err(|e| format!("invalid connection id: {e}"))?;
    let command = words
        .next()
        .ok_or_else(|| "missing command".to_owned())?;

    let mut square = || -> Result<Square, String> {
        algebraic_to_square(words.next().ok_or_else(|| format!("{command}: missing square"))?)
    };

    let token = match command {
        "create" => CommandToken::Event(ClientEvent::CreateGame),
        "join" => {
            let room = words
                .next()
                .ok_or_else(|| "join: missing room code".to_owned())?;
            CommandToken::Event(ClientEvent::JoinGame {
                room: room.to_owned(),
            })
        }
        "move" => {
            let from = square()?;
            let to = square()?;
            CommandToken::Event(ClientEvent::MoveRequest { from, to })
        }
        "promote" => {
            let from_square = square()?;
            let to_square = square()?;
            let choice = words
                .next()
                .ok_or_else(|| "promote: missing piece choice".to_owned())?;
            CommandToken::Event(ClientEvent::PromotionRequest {
                from_square,
                to_square,
                chosen_kind: PieceKind::from_choice(choice)?,
            })
        }
        "draw" => CommandToken::Event(ClientEvent::DrawOffer),
        "accept" => CommandToken::Event(ClientEvent::DrawResponse { accept: true }),
        "decline" => CommandToken::Event(ClientEvent::DrawResponse { accept: false }),
        "resign" => CommandToken::Event(ClientEvent::Resign),
        "resync" => CommandToken::Event(ClientEvent::ResyncRequest),
        "board" => CommandToken::Board,
        "hints" => CommandToken::Hints(square()?),
        "moves" => CommandToken::Moves,
        "leave" => CommandToken::Leave,
        other => return Err(format!("unknown command '{other}'")),
    };

    Ok((connection, token))
}
