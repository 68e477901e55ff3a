use duet_core::utils::ROOM_CAPACITY;

/// Per-room limits of the relay.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub max_members: usize,
    /// When false, durable sends are refused and clients fall back to
    /// broadcast delivery.
    pub durable_backlog: bool,
    pub backlog_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_members: ROOM_CAPACITY,
            durable_backlog: true,
            backlog_capacity: 256,
        }
    }
}
