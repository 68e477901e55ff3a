//! Frames exchanged between a client and the room relay.
//!
//! Both directions are JSON text frames using the `{"op": .., "d": ..}`
//! layout.

use crate::model::{CallStatus, CallStatusRecord, ClientId, SignalEnvelope};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "d")]
pub enum ClientMessage {
    /// Forward a negotiation message to the other member. `durable` asks the
    /// relay to keep it in the room backlog as well.
    Signal {
        envelope: SignalEnvelope,
        durable: bool,
    },
    PurgeBacklog,
    SetCallStatus {
        status: CallStatus,
    },
    Leave,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "d")]
pub enum ServerMessage {
    Welcome {
        client_id: ClientId,
        presence: usize,
        call_status: CallStatusRecord,
        backlog_available: bool,
    },
    /// Membership was revoked because the room already had its members.
    RoomFull {
        presence: usize,
    },
    Presence {
        count: usize,
    },
    Signal {
        envelope: SignalEnvelope,
    },
    CallStatus {
        record: CallStatusRecord,
    },
    Error {
        code: ErrorCode,
        message: String,
        #[serde(default)]
        envelope: Option<SignalEnvelope>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BacklogUnavailable,
    NotAMember,
    InvalidMessage,
}
