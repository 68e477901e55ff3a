mod room_event;
mod signal_transport;
mod ws_transport;

pub use room_event::*;
pub use signal_transport::*;
pub use ws_transport::*;
