//! Room Manager: room member sets and the connection side of each
//! membership.
//!
//! Every operation that touches membership updates the room's member set and
//! the connection's `rooms` set together, so neither side ever references
//! something the other does not.
//!
//! Ad-hoc rooms are created on first join and dropped once empty. Durable
//! rooms are created up front and kept even with zero members.

use std::collections::{BTreeSet, HashMap};

use super::{
    entity::Room,
    error::RepositoryError,
    registry::ConnectionRegistry,
    value_object::{ConnectionId, RoomId},
};

#[derive(Debug, Default)]
pub struct RoomManager {
    rooms: HashMap<RoomId, Room>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_durable_rooms(room_ids: impl IntoIterator<Item = RoomId>) -> Self {
        let rooms = room_ids
            .into_iter()
            .map(|id| (id.clone(), Room::durable(id)))
            .collect();
        Self { rooms }
    }

    /// Add membership in both directions. Returns `false` when the connection
    /// was already a member.
    pub fn join(
        &mut self,
        registry: &mut ConnectionRegistry,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<bool, RepositoryError> {
        let connection = registry
            .lookup_mut(connection_id)
            .ok_or_else(|| RepositoryError::UnknownConnection(connection_id.to_string()))?;

        let room = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::ad_hoc(room_id.clone()));
        let added = room.members.insert(connection_id.clone());
        connection.rooms.insert(room_id);
        Ok(added)
    }

    /// Remove membership in both directions. Returns `false` when the
    /// connection was not a member.
    pub fn leave(
        &mut self,
        registry: &mut ConnectionRegistry,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Result<bool, RepositoryError> {
        let connection = registry
            .lookup_mut(connection_id)
            .ok_or_else(|| RepositoryError::UnknownConnection(connection_id.to_string()))?;

        connection.rooms.remove(room_id);
        Ok(self.remove_member(room_id, connection_id))
    }

    /// Remove the connection from every room it belongs to and return those
    /// rooms. Unknown connections have no rooms.
    pub fn leave_all(
        &mut self,
        registry: &mut ConnectionRegistry,
        connection_id: &ConnectionId,
    ) -> Vec<RoomId> {
        let Some(connection) = registry.lookup_mut(connection_id) else {
            return Vec::new();
        };

        let left: Vec<RoomId> = std::mem::take(&mut connection.rooms).into_iter().collect();
        for room_id in &left {
            self.remove_member(room_id, connection_id);
        }
        left
    }

    /// Snapshot of a room's members; empty when the room does not exist.
    pub fn members_of(&self, room_id: &RoomId) -> BTreeSet<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|room| room.members.clone())
            .unwrap_or_default()
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    fn remove_member(&mut self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return false;
        };
        let removed = room.members.remove(connection_id);
        if room.is_empty() && !room.durable {
            self.rooms.remove(room_id);
            tracing::debug!("Room '{}' is empty and was removed", room_id);
        }
        removed
    }
}
