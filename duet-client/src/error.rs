use crate::media::MediaKind;
use duet_core::SignalKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaAccessError {
    #[error("camera/microphone permission denied")]
    PermissionDenied,
    #[error("no {0} device available")]
    NoDevice(MediaKind),
    #[error("media device error: {0}")]
    Device(String),
}

/// A signal or call-status write that did not reach the relay.
#[derive(Debug, Error)]
pub enum SignalDeliveryError {
    #[error("failed to encode signal: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("signal transport is disconnected")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error(transparent)]
    Media(#[from] MediaAccessError),
    #[error("failed to build peer connection: {0:#}")]
    Setup(anyhow::Error),
    #[error("peer connection error: {0}")]
    Peer(#[from] webrtc::Error),
    #[error("malformed {kind} signal: {source}")]
    MalformedSignal {
        kind: SignalKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("no peer connection")]
    NoPeer,
    #[error("peer rejected the operation: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum CallError {
    #[error("call is not permitted right now")]
    NotPermitted,
    #[error(transparent)]
    Media(MediaAccessError),
    #[error(transparent)]
    Negotiation(NegotiationError),
    #[error("call session has stopped")]
    SessionClosed,
}

impl From<NegotiationError> for CallError {
    fn from(e: NegotiationError) -> Self {
        match e {
            NegotiationError::Media(e) => CallError::Media(e),
            other => CallError::Negotiation(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to relay: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
}
