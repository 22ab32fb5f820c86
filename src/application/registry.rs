use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

pub type ConnectionId = u64;

/// Outbound half of a live connection. Each handle is drained by its own
/// writer task, so queueing a message never waits on the client.
pub type ConnectionHandle = UnboundedSender<String>;

/// The set of live real-time connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    connections: DashMap<ConnectionId, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handle: ConnectionHandle) -> ConnectionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.connections.insert(id, handle);
        id
    }

    /// Removes a connection. Unknown ids are ignored.
    pub fn unregister(&self, id: ConnectionId) {
        self.connections.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Queues `message` on every open connection and returns how many
    /// accepted it. Closed connections are dropped from the registry.
    pub fn broadcast(&self, message: &str) -> usize {
        let mut closed = Vec::new();
        let mut delivered = 0;

        for entry in self.connections.iter() {
            if entry.value().send(message.to_owned()).is_ok() {
                delivered += 1;
            } else {
                closed.push(*entry.key());
            }
        }

        // Shard guards from the iteration above are released by now.
        for id in closed {
            debug!(connection = id, "dropping closed connection");
            self.unregister(id);
        }

        delivered
    }

    /// Queues `message` on a single connection. Returns `false` if the
    /// connection is unknown or closed.
    pub fn send_to(&self, id: ConnectionId, message: &str) -> bool {
        let sent = self
            .connections
            .get(&id)
            .map(|handle| handle.send(message.to_owned()).is_ok());

        match sent {
            Some(true) => true,
            Some(false) => {
                self.unregister(id);
                false
            }
            None => false,
        }
    }

    /// Drops every handle so the writer tasks finish and close their sockets.
    pub fn close_all(&self) {
        self.connections.clear();
    }
}
