use crate::model::client::ClientId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared, room-wide call status.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    #[default]
    Idle,
    Ringing,
    Accepted,
    Declined,
    Ended,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Idle => "idle",
            CallStatus::Ringing => "ringing",
            CallStatus::Accepted => "accepted",
            CallStatus::Declined => "declined",
            CallStatus::Ended => "ended",
        }
    }

    /// Human readable label shown next to the call controls.
    pub fn label(&self) -> &'static str {
        match self {
            CallStatus::Ringing => "Ringing",
            CallStatus::Accepted => "In Call",
            CallStatus::Declined => "Declined",
            CallStatus::Ended => "Ended",
            CallStatus::Idle => "Ready",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The room's single call-status value with its last writer.
///
/// `version` is assigned by the relay and grows by one on every write, so a
/// client can drop writes that reach it out of order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallStatusRecord {
    pub status: CallStatus,
    pub sender: Option<ClientId>,
    pub version: u64,
}

impl CallStatusRecord {
    pub fn new(status: CallStatus, sender: Option<ClientId>, version: u64) -> Self {
        Self {
            status,
            sender,
            version,
        }
    }

    /// True when `self` was written after `other`.
    pub fn is_newer_than(&self, other: &CallStatusRecord) -> bool {
        self.version > other.version
    }

    pub fn written_by(&self, client_id: &ClientId) -> bool {
        self.sender.as_ref() == Some(client_id)
    }
}
