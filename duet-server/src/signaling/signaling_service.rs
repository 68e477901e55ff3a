use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use duet_core::{ClientId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    peers: DashMap<ClientId, mpsc::UnboundedSender<ServerMessage>>,
}

/// Registry of open client sockets.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
            }),
        }
    }

    /// Registers the socket of `client_id`. Returns `false`, leaving the
    /// existing registration alone, when that id already has a socket.
    pub fn add_peer(&self, client_id: ClientId, tx: mpsc::UnboundedSender<ServerMessage>) -> bool {
        match self.inner.peers.entry(client_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(tx);
                true
            }
        }
    }

    pub fn remove_peer(&self, client_id: &ClientId) {
        self.inner.peers.remove(client_id);
    }

    pub fn is_connected(&self, client_id: &ClientId) -> bool {
        self.inner.peers.contains_key(client_id)
    }

    pub fn send_signal(&self, client_id: ClientId, msg: ServerMessage) {
        if let Some(peer) = self.inner.peers.get(&client_id) {
            if let Err(e) = peer.send(msg) {
                error!("Failed to queue WS frame for {}: {}", client_id, e);
            }
        } else {
            warn!("Attempted to send frame to disconnected client {}", client_id);
        }
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn deliver(&self, client_id: ClientId, msg: ServerMessage) {
        self.send_signal(client_id, msg);
    }
}
