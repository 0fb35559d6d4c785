use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::cards::RoomId;
use crate::errors::{EngineError, NotFoundKind};
use crate::state::room::Room;

/// Keyed lookup of live rooms for the transport layer.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Arc<Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    pub fn register(&self, room: Arc<Room>) {
        self.rooms.insert(room.id(), room);
    }

    pub fn unregister(&self, room_id: RoomId) -> Option<Arc<Room>> {
        self.rooms.remove(&room_id).map(|(_, room)| room)
    }

    pub fn get(&self, room_id: RoomId) -> Result<Arc<Room>, EngineError> {
        self.rooms
            .get(&room_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                EngineError::not_found(NotFoundKind::Room, format!("room {room_id} not registered"))
            })
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
