//! Two-party video calls over a small room relay.
//!
//! `model` and `protocol` are always available; enable `server` for the
//! relay and `client` for the call engine.

pub use duet_core::{CallStatus, CallStatusRecord, ClientId, RoomName};

pub mod model {
    pub use duet_core::model::*;
}

pub mod protocol {
    pub use duet_core::protocol::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use duet_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use duet_client::*;
}
