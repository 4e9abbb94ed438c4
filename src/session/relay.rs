use crate::session::events::ServerEvent;

/// Outbound side of the transport. The session never addresses connections
/// directly; it either answers the connection whose event it is handling or
/// fans out to the rest of the room.
pub trait Relay {
    /// Deliver to every member of `room` except the sender.
    fn broadcast_to_room(&mut self, room: &str, event: &ServerEvent);

    /// Reply to the connection that sent the current event.
    fn emit_to_sender(&mut self, event: &ServerEvent);
}

/// Relay that keeps every event in memory, in delivery order.
#[derive(Debug, Default, Clone)]
pub struct RecordingRelay {
    pub broadcasts: Vec<(String, ServerEvent)>,
    pub replies: Vec<ServerEvent>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the broadcast events, oldest first.
    pub fn broadcast_names(&self) -> Vec<&'static str> {
        self.broadcasts.iter().map(|(_, event)| event.name()).collect()
    }

    pub fn reply_names(&self) -> Vec<&'static str> {
        self.replies.iter().map(ServerEvent::name).collect()
    }

    pub fn clear(&mut self) {
        self.broadcasts.clear();
        self.replies.clear();
    }
}

impl Relay for RecordingRelay {
    fn broadcast_to_room(&mut self, room: &str, event: &ServerEvent) {
        self.broadcasts.push((room.to_owned(), event.clone()));
    }

    fn emit_to_sender(&mut self, event: &ServerEvent) {
        self.replies.push(event.clone());
    }
}
