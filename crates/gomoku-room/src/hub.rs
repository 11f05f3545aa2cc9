//! Connection hub: which connection each participant of a room is
//! reachable on.
//!
//! A participant can be in a room without being connected, and a
//! reconnect simply replaces the previous registration. The hub never
//! touches the participant list.

use std::collections::HashMap;

use gomoku_protocol::{ParticipantId, RoomId, ServerView};
use gomoku_transport::ConnectionId;
use tokio::sync::mpsc;

use crate::Recipient;

/// Channel sender feeding one connection's writer task.
pub type ParticipantSender = mpsc::UnboundedSender<ServerView>;

#[derive(Debug)]
struct Registration {
    connection: ConnectionId,
    sender: ParticipantSender,
}

/// Per-room participant → connection map.
#[derive(Debug)]
pub(crate) struct ConnectionHub {
    room_id: RoomId,
    connections: HashMap<ParticipantId, Registration>,
}

impl ConnectionHub {
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            connections: HashMap::new(),
        }
    }

    /// Registers `connection` for `participant`, replacing any previous
    /// one. Returns the replaced connection.
    pub fn register(
        &mut self,
        participant: ParticipantId,
        connection: ConnectionId,
        sender: ParticipantSender,
    ) -> Option<ConnectionId> {
        let replaced = self
            .connections
            .insert(participant.clone(), Registration { connection, sender })
            .map(|old| old.connection);
        tracing::debug!(
            room_id = %self.room_id,
            %participant,
            %connection,
            replaced = ?replaced,
            "connection registered"
        );
        replaced
    }

    /// Removes `participant`'s registration.
    pub fn unregister(&mut self, participant: &ParticipantId) -> bool {
        self.connections.remove(participant).is_some()
    }

    /// True if `connection` is the one currently registered for
    /// `participant`.
    pub fn is_current(&self, participant: &ParticipantId, connection: ConnectionId) -> bool {
        self.connections
            .get(participant)
            .is_some_and(|r| r.connection == connection)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Delivers each view to its recipients.
    pub fn dispatch(&self, views: Vec<(Recipient, ServerView)>) {
        for (recipient, view) in views {
            match recipient {
                Recipient::All => self.broadcast(view),
                Recipient::Participant(participant) => self.send_to(&participant, view),
            }
        }
    }

    /// Sends `view` to every registered connection in the room.
    pub fn broadcast(&self, view: ServerView) {
        for participant in self.connections.keys() {
            self.send_to(participant, view.clone());
        }
    }

    /// Sends `view` to one participant. Best-effort: a participant with no
    /// connection is skipped and a closed connection is logged, never
    /// reported back.
    pub fn send_to(&self, participant: &ParticipantId, view: ServerView) {
        let Some(registration) = self.connections.get(participant) else {
            return;
        };
        if registration.sender.send(view).is_err() {
            tracing::warn!(
                room_id = %self.room_id,
                %participant,
                connection = %registration.connection,
                "delivery failed, connection is gone"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_view(message: &str) -> ServerView {
        ServerView::Error {
            message: message.to_string(),
        }
    }

    #[test]
    fn test_register_replaces_previous_connection() {
        let mut hub = ConnectionHub::new(RoomId(1));
        let alice = ParticipantId::from("alice");
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        assert_eq!(hub.register(alice.clone(), ConnectionId::new(1), tx1), None);
        assert_eq!(
            hub.register(alice.clone(), ConnectionId::new(2), tx2),
            Some(ConnectionId::new(1))
        );
        assert_eq!(hub.len(), 1);
        assert!(hub.is_current(&alice, ConnectionId::new(2)));
        assert!(!hub.is_current(&alice, ConnectionId::new(1)));
    }

    #[test]
    fn test_broadcast_reaches_everyone() {
        let mut hub = ConnectionHub::new(RoomId(1));
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.register(ParticipantId::from("a"), ConnectionId::new(1), tx_a);
        hub.register(ParticipantId::from("b"), ConnectionId::new(2), tx_b);

        hub.broadcast(error_view("hi"));
        assert_eq!(rx_a.try_recv().unwrap(), error_view("hi"));
        assert_eq!(rx_b.try_recv().unwrap(), error_view("hi"));
    }

    #[test]
    fn test_failed_delivery_does_not_stop_others() {
        let mut hub = ConnectionHub::new(RoomId(1));
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.register(ParticipantId::from("a"), ConnectionId::new(1), tx_a);
        hub.register(ParticipantId::from("b"), ConnectionId::new(2), tx_b);
        drop(rx_a);

        hub.broadcast(error_view("still here"));
        assert_eq!(rx_b.try_recv().unwrap(), error_view("still here"));
    }

    #[test]
    fn test_dispatch_unicast_and_unregister() {
        let mut hub = ConnectionHub::new(RoomId(1));
        let a = ParticipantId::from("a");
        let b = ParticipantId::from("b");
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.register(a.clone(), ConnectionId::new(1), tx_a);
        hub.register(b.clone(), ConnectionId::new(2), tx_b);

        hub.dispatch(vec![(Recipient::Participant(b.clone()), error_view("only b"))]);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().unwrap(), error_view("only b"));

        assert!(hub.unregister(&b));
        assert!(!hub.unregister(&b));
        hub.broadcast(error_view("after"));
        assert_eq!(rx_a.try_recv().unwrap(), error_view("after"));
        assert!(rx_b.try_recv().is_err());
    }
}
