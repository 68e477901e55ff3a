mod peer_connector;
mod peer_event;
mod peer_state;
mod rtc_peer;
mod send_caps;

pub use peer_connector::*;
pub use peer_event::*;
pub use peer_state::*;
pub use rtc_peer::*;
pub use send_caps::*;
