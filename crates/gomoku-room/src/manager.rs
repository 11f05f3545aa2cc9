//! Room registry: creates, tracks, and destroys rooms.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use gomoku_protocol::{MatchId, ParticipantId, RoomId, RoomSummary};
use gomoku_session::Identity;
use gomoku_transport::ConnectionId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::RwLock;

use crate::room::spawn_room;
use crate::{Departed, Room, RoomConfig, RoomError, RoomHandle};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Every live room, keyed by id.
///
/// The map has its own lock, separate from the rooms themselves: lookups
/// and listings only hold it long enough to clone the handles they need.
/// Shared with every connection handler through the server state.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, RoomHandle>>,
    config: RoomConfig,
    next_room_id: AtomicU64,
    next_match_id: AtomicU64,
}

impl RoomRegistry {
    /// Creates an empty registry whose rooms use `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            config,
            next_room_id: AtomicU64::new(1),
            next_match_id: AtomicU64::new(1),
        }
    }

    /// Creates a room owned by `owner` and returns its summary.
    ///
    /// The name is trimmed; a blank name becomes "<owner>'s room".
    pub async fn create(&self, owner: &Identity, name: &str) -> RoomSummary {
        let room_id = RoomId(self.next_room_id.fetch_add(1, Ordering::Relaxed));
        let match_id = MatchId(self.next_match_id.fetch_add(1, Ordering::Relaxed));

        let name = match name.trim() {
            "" => format!("{}'s room", owner.handle),
            trimmed => trimmed.to_string(),
        };

        let room = Room::new(room_id, name, owner, match_id, self.config);
        let summary = room.summary();
        let handle = spawn_room(room, StdRng::from_os_rng(), DEFAULT_CHANNEL_SIZE);
        self.rooms.write().await.insert(room_id, handle);

        tracing::info!(%room_id, %match_id, owner = %owner.id, name = %summary.name, "room created");
        summary
    }

    /// Returns a handle to a live room.
    pub async fn get(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .read()
            .await
            .get(&room_id)
            .cloned()
            .ok_or(RoomError::NotFound(room_id))
    }

    /// Adds `identity` to a room.
    pub async fn join(&self, room_id: RoomId, identity: &Identity) -> Result<(), RoomError> {
        let handle = self.get(room_id).await?;
        handle.join(identity.clone()).await
    }

    /// Summaries of every live room, ordered by id.
    pub async fn list(&self) -> Vec<RoomSummary> {
        let handles: Vec<RoomHandle> = self.rooms.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            // A room that closed since the snapshot is simply left out.
            if let Ok(info) = handle.info().await {
                summaries.push(info.summary);
            }
        }
        summaries.sort_by_key(|s| s.id);
        summaries
    }

    /// Reports a closed match connection. Destroys the room when its last
    /// participant leaves.
    pub async fn disconnect(
        &self,
        room_id: RoomId,
        participant: ParticipantId,
        connection: ConnectionId,
    ) -> Result<Departed, RoomError> {
        let handle = self.get(room_id).await?;
        let departed = handle.disconnect(participant, connection).await?;
        if departed == Departed::Closed {
            self.rooms.write().await.remove(&room_id);
            tracing::info!(%room_id, "room destroyed");
        }
        Ok(departed)
    }

    /// Number of live rooms.
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
