use crate::error::SignalDeliveryError;
use async_trait::async_trait;
use duet_core::{CallStatus, ClientId, Signal};

/// Room-scoped delivery of negotiation messages and the call status.
///
/// Delivery is at-least-once and may reorder. Incoming traffic comes from the
/// [`RoomEvent`](crate::transport::RoomEvent) receiver handed out when the
/// transport connects; consumers drop envelopes sent by [`local_id`].
///
/// [`local_id`]: SignalTransport::local_id
#[async_trait]
pub trait SignalTransport: Send + Sync {
    fn local_id(&self) -> ClientId;

    async fn send(&self, signal: &Signal) -> Result<(), SignalDeliveryError>;

    /// Best-effort removal of queued signals once a connection is up.
    async fn purge_backlog(&self) -> Result<(), SignalDeliveryError>;

    async fn publish_call_status(&self, status: CallStatus) -> Result<(), SignalDeliveryError>;

    async fn leave(&self);
}
