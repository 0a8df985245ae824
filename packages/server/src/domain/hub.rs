//! In-memory aggregate of the connection registry and the room manager.
//!
//! All registry and room state lives here and is only mutated through `&mut
//! Hub`, so whoever owns the hub serialises every change.

use std::collections::BTreeSet;

use super::{
    entity::{Connection, ConnectionMetadata, Room},
    error::RepositoryError,
    registry::ConnectionRegistry,
    room_manager::RoomManager,
    value_object::{ConnectionId, DisplayName, Identity, RoomId, Timestamp},
};

#[derive(Debug, Default)]
pub struct Hub {
    registry: ConnectionRegistry,
    rooms: RoomManager,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_durable_rooms(room_ids: impl IntoIterator<Item = RoomId>) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            rooms: RoomManager::with_durable_rooms(room_ids),
        }
    }

    pub fn register(
        &mut self,
        identity: Identity,
        metadata: ConnectionMetadata,
        connected_at: Timestamp,
    ) -> ConnectionId {
        self.registry.register(identity, metadata, connected_at)
    }

    pub fn lookup(&self, id: &ConnectionId) -> Option<&Connection> {
        self.registry.lookup(id)
    }

    /// Remove the record. Any membership still held is dropped first so a
    /// removed connection never lingers in a room.
    pub fn unregister(&mut self, id: &ConnectionId) -> Option<Connection> {
        self.rooms.leave_all(&mut self.registry, id);
        self.registry.unregister(id)
    }

    pub fn update_identity(
        &mut self,
        id: &ConnectionId,
        name: DisplayName,
    ) -> Result<(), RepositoryError> {
        self.registry.update_identity(id, name)
    }

    pub fn join(&mut self, id: &ConnectionId, room_id: RoomId) -> Result<bool, RepositoryError> {
        self.rooms.join(&mut self.registry, id, room_id)
    }

    pub fn leave(&mut self, id: &ConnectionId, room_id: &RoomId) -> Result<bool, RepositoryError> {
        self.rooms.leave(&mut self.registry, id, room_id)
    }

    pub fn leave_all(&mut self, id: &ConnectionId) -> Vec<RoomId> {
        self.rooms.leave_all(&mut self.registry, id)
    }

    pub fn members_of(&self, room_id: &RoomId) -> BTreeSet<ConnectionId> {
        self.rooms.members_of(room_id)
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.registry.ids()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.registry.iter()
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// Whether every connection's room set mirrors the rooms' member sets.
    pub fn is_consistent(&self) -> bool {
        let connections_mirrored = self.registry.iter().all(|connection| {
            connection.rooms.iter().all(|room_id| {
                self.rooms
                    .get(room_id)
                    .is_some_and(|room| room.members.contains(&connection.id))
            })
        });
        let rooms_mirrored = self.rooms.iter().all(|room| {
            room.members.iter().all(|member| {
                self.registry
                    .lookup(member)
                    .is_some_and(|connection| connection.rooms.contains(&room.id))
            })
        });
        connections_mirrored && rooms_mirrored
    }
}
