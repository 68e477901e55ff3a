use crate::error::NegotiationError;
use crate::media::MediaTrack;
use crate::peer::peer_event::PeerEventSender;
use crate::peer::peer_state::{ConnectionState, SignalingState};
use crate::peer::send_caps::SendCaps;
use async_trait::async_trait;
use duet_core::{IceCandidate, SessionDescription};

/// Builds peer connections. Every build gets a fresh generation number.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn connect(
        &self,
        generation: u64,
        events: PeerEventSender,
    ) -> Result<Box<dyn PeerHandle>, NegotiationError>;
}

/// One peer connection attempt.
#[async_trait]
pub trait PeerHandle: Send + Sync {
    fn generation(&self) -> u64;

    fn signaling_state(&self) -> SignalingState;

    fn connection_state(&self) -> ConnectionState;

    async fn add_track(&self, track: &MediaTrack) -> Result<(), NegotiationError>;

    async fn apply_send_caps(&self, track: &MediaTrack, caps: SendCaps) -> Result<(), NegotiationError>;

    /// Marks the next offer as an ICE restart.
    fn restart_ice(&self);

    async fn create_offer(&self, ice_restart: bool) -> Result<SessionDescription, NegotiationError>;

    async fn create_answer(&self) -> Result<SessionDescription, NegotiationError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), NegotiationError>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), NegotiationError>;

    /// Drops a pending local offer, back to `stable`.
    async fn rollback(&self) -> Result<(), NegotiationError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), NegotiationError>;

    /// Detaches every event callback, then closes the connection.
    async fn close(&self);
}
