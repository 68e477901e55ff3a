pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_3: &str = "stun:stun2.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_4: &str = "stun:stun.cloudflare.com:3478";
pub const DEFAULT_STUN_ADDR_5: &str = "stun:global.stun.twilio.com:3478";

pub const DEFAULT_STUN_SERVERS: [&str; 5] = [
    DEFAULT_STUN_ADDR,
    DEFAULT_STUN_ADDR_2,
    DEFAULT_STUN_ADDR_3,
    DEFAULT_STUN_ADDR_4,
    DEFAULT_STUN_ADDR_5,
];

/// Maximum number of members a call room admits.
pub const ROOM_CAPACITY: usize = 2;
