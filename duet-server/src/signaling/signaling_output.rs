use async_trait::async_trait;
use duet_core::{ClientId, ServerMessage};

/// Implemented by whatever owns the client sockets, so a room can push
/// frames to its members.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Queue `msg` for delivery to `client_id`. Delivery is best effort.
    async fn deliver(&self, client_id: ClientId, msg: ServerMessage);
}
