use crate::model::client::ClientId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// An SDP blob in the same JSON shape browsers use (`{"type", "sdp"}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// A trickled path candidate (`RTCIceCandidateInit` JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(default, rename = "sdpMLineIndex")]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default)]
    pub username_fragment: Option<String>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Offer,
    Answer,
    Candidate,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::Candidate => "candidate",
        };
        f.write_str(s)
    }
}

/// A decoded negotiation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Offer(SessionDescription),
    Answer(SessionDescription),
    Candidate(IceCandidate),
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::Offer(_) => SignalKind::Offer,
            Signal::Answer(_) => SignalKind::Answer,
            Signal::Candidate(_) => SignalKind::Candidate,
        }
    }
}

/// What actually travels through the room: `{type, payload, sender}`.
///
/// The payload stays untyped until [`SignalEnvelope::decode`] so a single
/// malformed message can be rejected by the consumer without poisoning the
/// transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalEnvelope {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub payload: Value,
    pub sender: ClientId,
}

impl SignalEnvelope {
    pub fn new(sender: ClientId, signal: &Signal) -> Result<Self, serde_json::Error> {
        let payload = match signal {
            Signal::Offer(desc) | Signal::Answer(desc) => serde_json::to_value(desc)?,
            Signal::Candidate(candidate) => serde_json::to_value(candidate)?,
        };
        Ok(Self {
            kind: signal.kind(),
            payload,
            sender,
        })
    }

    pub fn decode(&self) -> Result<Signal, serde_json::Error> {
        match self.kind {
            SignalKind::Offer => {
                let desc: SessionDescription = serde_json::from_value(self.payload.clone())?;
                Ok(Signal::Offer(desc))
            }
            SignalKind::Answer => {
                let desc: SessionDescription = serde_json::from_value(self.payload.clone())?;
                Ok(Signal::Answer(desc))
            }
            SignalKind::Candidate => {
                let candidate: IceCandidate = serde_json::from_value(self.payload.clone())?;
                Ok(Signal::Candidate(candidate))
            }
        }
    }

    pub fn is_from(&self, client_id: &ClientId) -> bool {
        &self.sender == client_id
    }
}
