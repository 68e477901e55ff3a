//! Client side of a two-party call: local media, the room transport, the
//! peer-connection negotiation engine and the call session that ties them
//! together.

mod config;
mod error;

pub mod engine;
pub mod media;
pub mod peer;
pub mod session;
pub mod transport;

use std::sync::Arc;

pub use config::ClientConfig;
pub use engine::{EngineConfig, EnginePhase, NegotiationEngine};
pub use error::{CallError, MediaAccessError, NegotiationError, SignalDeliveryError, TransportError};
pub use media::{MediaDevices, MediaKind, MediaSource, MediaStream, MediaTrack, SampleTrackDevices};
pub use peer::{PeerConnector, PeerEvent, PeerHandle, RtcPeerConnector};
pub use session::{CallHandle, CallSession, CallView};
pub use transport::{RoomEvent, SignalTransport, WsSignalTransport};

/// Join the configured room over the relay and start a call session with
/// webrtc-rs peers and sample-fed local tracks.
pub async fn join_room(config: ClientConfig) -> Result<CallHandle, TransportError> {
    let (transport, room_events) = WsSignalTransport::connect(&config).await?;
    let connector = RtcPeerConnector::new(config.ice_servers());
    let devices = SampleTrackDevices::default();

    Ok(CallSession::start(
        Arc::new(transport),
        room_events,
        Arc::new(connector),
        Arc::new(devices),
        config.engine_config(),
    ))
}
