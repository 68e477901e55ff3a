mod media_constraints;
mod media_devices;
mod media_source;
mod media_stream;
mod media_track;

pub use media_constraints::*;
pub use media_devices::*;
pub use media_source::*;
pub use media_stream::*;
pub use media_track::*;
