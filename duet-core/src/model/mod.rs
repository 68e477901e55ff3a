mod call_status;
mod client;
mod room;
mod signaling;

pub use call_status::{CallStatus, CallStatusRecord};
pub use client::ClientId;
pub use room::RoomName;
pub use signaling::{
    IceCandidate, IceServerConfig, SdpKind, SessionDescription, Signal, SignalEnvelope, SignalKind,
};
