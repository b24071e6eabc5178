//! The connection table: one mutex guarding only slot lookup, insertion and
//! removal, never held across socket I/O.

use std::collections::HashMap;
use std::net::TcpStream;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::connection::Connection;

#[derive(Default)]
pub struct ConnectionTable {
    next_id: AtomicU64,
    slots: Mutex<HashMap<u64, Arc<Connection>>>,
}

impl ConnectionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, write_half: TcpStream) -> Arc<Connection> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let conn = Arc::new(Connection::new(id, write_half));
        self.slots().insert(id, conn.clone());
        conn
    }

    pub fn remove(&self, id: u64) -> Option<Arc<Connection>> {
        self.slots().remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<Arc<Connection>> {
        self.slots().get(&id).cloned()
    }

    /// Finds another connection (excluding `exclude_id`) currently claiming
    /// `client_id`, regardless of its state.
    #[must_use]
    pub fn find_by_client_id(&self, client_id: u32, exclude_id: u64) -> Option<Arc<Connection>> {
        self.slots()
            .values()
            .find(|c| c.id != exclude_id && c.registered_id() == Some(client_id))
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Arc<Connection>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnState;

    fn dummy_stream() -> TcpStream {
        let (server, _client) = test_support::loopback_pair();
        server
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let table = ConnectionTable::new();
        let a = table.insert(dummy_stream());
        let b = table.insert(dummy_stream());
        assert!(b.id > a.id);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn find_by_client_id_skips_the_excluded_slot() {
        let table = ConnectionTable::new();
        let a = table.insert(dummy_stream());
        a.set_registered_id(Some(7));
        a.set_state(ConnState::Registered);

        assert!(table.find_by_client_id(7, a.id).is_none());

        let b = table.insert(dummy_stream());
        b.set_registered_id(Some(7));
        b.set_state(ConnState::Registered);
        let found = table.find_by_client_id(7, a.id).unwrap();
        assert_eq!(found.id, b.id);
    }

    #[test]
    fn remove_frees_the_slot() {
        let table = ConnectionTable::new();
        let a = table.insert(dummy_stream());
        assert!(table.remove(a.id).is_some());
        assert!(table.get(a.id).is_none());
    }
}
