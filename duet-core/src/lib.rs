pub mod model;
pub mod protocol;
pub mod utils;

pub use model::*;
pub use protocol::{ClientMessage, ErrorCode, ServerMessage};
