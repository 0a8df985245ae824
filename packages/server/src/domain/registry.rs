//! Connection Registry: the single owner of live connection records.

use std::collections::HashMap;

use super::{
    entity::{Connection, ConnectionMetadata},
    error::RepositoryError,
    value_object::{ConnectionId, DisplayName, Identity, Timestamp},
};

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an identifier and store the record. Never fails.
    pub fn register(
        &mut self,
        identity: Identity,
        metadata: ConnectionMetadata,
        connected_at: Timestamp,
    ) -> ConnectionId {
        let mut id = ConnectionId::generate();
        while self.connections.contains_key(&id) {
            id = ConnectionId::generate();
        }
        self.connections.insert(
            id.clone(),
            Connection::new(id.clone(), identity, metadata, connected_at),
        );
        id
    }

    /// Absence means "already gone", not an error.
    pub fn lookup(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub(crate) fn lookup_mut(&mut self, id: &ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(id)
    }

    /// Idempotent: unknown ids are a no-op.
    pub fn unregister(&mut self, id: &ConnectionId) -> Option<Connection> {
        self.connections.remove(id)
    }

    pub fn update_identity(
        &mut self,
        id: &ConnectionId,
        name: DisplayName,
    ) -> Result<(), RepositoryError> {
        let connection = self
            .connections
            .get_mut(id)
            .ok_or_else(|| RepositoryError::UnknownConnection(id.to_string()))?;
        connection.display_name = name;
        Ok(())
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn ids(&self) -> Vec<ConnectionId> {
        self.connections.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
