use duet_core::{CallStatusRecord, SignalEnvelope};

/// Room traffic as seen by one client.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    Joined {
        presence: usize,
        call_status: CallStatusRecord,
    },
    /// This client's membership was revoked.
    RoomFull { presence: usize },
    Presence(usize),
    Signal(SignalEnvelope),
    CallStatus(CallStatusRecord),
    Closed,
}
