//! Room actor: an isolated Tokio task that owns one room.
//!
//! Each room runs in its own task and is reached only through its command
//! channel, so every mutation of the room is applied one at a time, in
//! the order the commands arrive. The actor applies a command to the
//! [`Room`] coordinator, and only once the transition is complete does
//! it hand the resulting views to the [`ConnectionHub`].

use gomoku_protocol::{ClientAction, ParticipantId, RoomId, RoomSummary};
use gomoku_session::Identity;
use gomoku_transport::ConnectionId;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};

use crate::{ConnectionHub, Decline, Participant, ParticipantSender, Room, RoomError};

/// How a disconnect was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departed {
    /// The connection had already been replaced by a newer one for the
    /// same participant. Nothing changed.
    Stale,
    /// The participant left; others remain.
    Left,
    /// The last participant left and the room shut down.
    Closed,
}

/// Commands sent to a room actor through its channel.
///
/// Each `oneshot::Sender` is the reply channel for that request.
pub(crate) enum RoomCommand {
    Join {
        identity: Identity,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Register a match-channel connection for a participant.
    Connect {
        participant: ParticipantId,
        connection: ConnectionId,
        sender: ParticipantSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    Action {
        participant: ParticipantId,
        action: ClientAction,
        reply: oneshot::Sender<Result<(), Decline>>,
    },

    Disconnect {
        participant: ParticipantId,
        connection: ConnectionId,
        reply: oneshot::Sender<Departed>,
    },

    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },
}

/// A snapshot of a room.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub summary: RoomSummary,
    pub participants: Vec<Participant>,
    /// Connected participants.
    pub connections: usize,
    /// The live match's board, if a match is live.
    pub board: Option<Vec<Vec<u8>>>,
}

/// Handle to a running room actor.
///
/// Cheap to clone; the registry holds one per room.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Adds a participant to the room.
    pub async fn join(&self, identity: Identity) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::Join { identity, reply }, rx).await?
    }

    /// Registers a participant's match connection and sends it the
    /// current `room_update`.
    ///
    /// Fails with [`RoomError::NotParticipant`] for identities without a
    /// slot in the room.
    pub async fn connect(
        &self,
        participant: ParticipantId,
        connection: ConnectionId,
        sender: ParticipantSender,
    ) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(
            RoomCommand::Connect {
                participant,
                connection,
                sender,
                reply,
            },
            rx,
        )
        .await?
    }

    /// Applies a gameplay action and waits until it has been processed.
    ///
    /// The outer error means the room is gone; the inner one that the
    /// action was declined.
    pub async fn perform(
        &self,
        participant: ParticipantId,
        action: ClientAction,
    ) -> Result<Result<(), Decline>, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(
            RoomCommand::Action {
                participant,
                action,
                reply,
            },
            rx,
        )
        .await
    }

    /// Reports that a participant's match connection closed.
    pub async fn disconnect(
        &self,
        participant: ParticipantId,
        connection: ConnectionId,
    ) -> Result<Departed, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(
            RoomCommand::Disconnect {
                participant,
                connection,
                reply,
            },
            rx,
        )
        .await
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::GetInfo { reply }, rx).await
    }

    /// Sends a command and waits for its reply. A closed channel on
    /// either side means the actor has shut down, so the room no longer
    /// exists.
    async fn request<T>(
        &self,
        command: RoomCommand,
        reply: oneshot::Receiver<T>,
    ) -> Result<T, RoomError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| RoomError::NotFound(self.room_id))?;
        reply.await.map_err(|_| RoomError::NotFound(self.room_id))
    }
}

struct RoomActor {
    room: Room,
    hub: ConnectionHub,
    rng: StdRng,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until the room empties.
    async fn run(mut self) {
        let room_id = self.room.id();
        tracing::info!(%room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { identity, reply } => {
                    let result = self
                        .room
                        .join(&identity)
                        .map(|views| self.hub.dispatch(views));
                    let _ = reply.send(result);
                }
                RoomCommand::Connect {
                    participant,
                    connection,
                    sender,
                    reply,
                } => {
                    let _ = reply.send(self.handle_connect(participant, connection, sender));
                }
                RoomCommand::Action {
                    participant,
                    action,
                    reply,
                } => {
                    let outcome = self.room.apply(&participant, action, &mut self.rng);
                    self.hub.dispatch(outcome.views);
                    let _ = reply.send(outcome.declined.map_or(Ok(()), Err));
                }
                RoomCommand::Disconnect {
                    participant,
                    connection,
                    reply,
                } => {
                    let departed = self.handle_disconnect(&participant, connection);
                    let _ = reply.send(departed);
                    if departed == Departed::Closed {
                        break;
                    }
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::info!(%room_id, "room actor stopped");
    }

    fn handle_connect(
        &mut self,
        participant: ParticipantId,
        connection: ConnectionId,
        sender: ParticipantSender,
    ) -> Result<(), RoomError> {
        if !self.room.is_participant(&participant) {
            return Err(RoomError::NotParticipant(participant, self.room.id()));
        }
        if let Some(replaced) = self.hub.register(participant.clone(), connection, sender) {
            tracing::info!(
                room_id = %self.room.id(),
                %participant,
                %replaced,
                %connection,
                "participant reconnected"
            );
        }
        self.hub.send_to(&participant, self.room.room_update());
        Ok(())
    }

    fn handle_disconnect(&mut self, participant: &ParticipantId, connection: ConnectionId) -> Departed {
        if !self.hub.is_current(participant, connection) {
            tracing::debug!(
                room_id = %self.room.id(),
                %participant,
                %connection,
                "stale connection closed"
            );
            return Departed::Stale;
        }

        self.hub.unregister(participant);
        let departure = self.room.leave(participant);
        self.hub.dispatch(departure.views);

        if departure.room_empty {
            Departed::Closed
        } else {
            Departed::Left
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            summary: self.room.summary(),
            participants: self.room.participants().to_vec(),
            connections: self.hub.len(),
            board: self.room.live_match().map(|game| game.board().to_codes()),
        }
    }
}

/// Spawns an actor task for `room` and returns a handle to it.
///
/// `channel_size` bounds the command queue; senders wait when it is full.
pub(crate) fn spawn_room(room: Room, rng: StdRng, channel_size: usize) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let room_id = room.id();

    let actor = RoomActor {
        hub: ConnectionHub::new(room_id),
        room,
        rng,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
