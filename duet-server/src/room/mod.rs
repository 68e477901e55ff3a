mod room;
mod room_command;
mod room_config;
mod room_manager;

pub use room::*;
pub use room_command::*;
pub use room_config::*;
pub use room_manager::*;
