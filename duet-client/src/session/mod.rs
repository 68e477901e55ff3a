mod call_command;
mod call_handle;
mod call_session;
mod call_view;

pub use call_command::*;
pub use call_handle::*;
pub use call_session::*;
pub use call_view::*;
