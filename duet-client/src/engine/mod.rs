//! Peer-connection lifecycle: building handles, offer/answer exchange,
//! candidate buffering, failure detection and self-healing.

use crate::media::{MediaConstraints, MediaDevices, MediaSource, MediaStream};
use crate::peer::{ConnectionState, PeerConnector, PeerEventReceiver, PeerEventSender, PeerHandle};
use crate::transport::SignalTransport;
use duet_core::{ClientId, Signal};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::warn;

mod candidate_queue;
mod create_offer_impl;
mod handle_signal_impl;
mod peer_event_impl;
mod prepare_peer_impl;
mod reconnect_impl;
mod reconnect_slot;
mod teardown_impl;

pub use candidate_queue::CandidateQueue;
pub use reconnect_slot::ReconnectSlot;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Delay before the follow-up check of a reconnection attempt.
    pub reconnect_delay: Duration,
    pub constraints: MediaConstraints,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(5),
            constraints: MediaConstraints::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnginePhase {
    #[default]
    Idle,
    Preparing,
    Negotiating,
    Connected,
    Failed,
    Closed,
}

impl fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnginePhase::Idle => "idle",
            EnginePhase::Preparing => "preparing",
            EnginePhase::Negotiating => "negotiating",
            EnginePhase::Connected => "connected",
            EnginePhase::Failed => "failed",
            EnginePhase::Closed => "closed",
        };
        f.write_str(s)
    }
}

pub struct NegotiationEngine {
    local_id: ClientId,
    config: EngineConfig,
    connector: Arc<dyn PeerConnector>,
    transport: Arc<dyn SignalTransport>,
    media: MediaSource,
    peer: Option<Box<dyn PeerHandle>>,
    /// Generation of the newest handle; bumped on every build.
    generation: u64,
    peer_events: PeerEventSender,
    remote_description_applied: bool,
    pending_candidates: CandidateQueue,
    remote_stream: Option<MediaStream>,
    phase: EnginePhase,
    connection_state: ConnectionState,
    in_call: bool,
    muted: bool,
    camera_off: bool,
    last_error: Option<String>,
    reconnect: ReconnectSlot,
    follow_up: Option<Instant>,
}

impl NegotiationEngine {
    /// The returned receiver yields events of every handle this engine
    /// builds; feed them back through `handle_peer_event`.
    pub fn new(
        connector: Arc<dyn PeerConnector>,
        transport: Arc<dyn SignalTransport>,
        devices: Arc<dyn MediaDevices>,
        config: EngineConfig,
    ) -> (Self, PeerEventReceiver) {
        let (peer_events, peer_events_rx) = mpsc::unbounded_channel();
        let engine = Self {
            local_id: transport.local_id(),
            media: MediaSource::new(devices, config.constraints.clone()),
            config,
            connector,
            transport,
            peer: None,
            generation: 0,
            peer_events,
            remote_description_applied: false,
            pending_candidates: CandidateQueue::default(),
            remote_stream: None,
            phase: EnginePhase::Idle,
            connection_state: ConnectionState::New,
            in_call: false,
            muted: false,
            camera_off: false,
            last_error: None,
            reconnect: ReconnectSlot::default(),
            follow_up: None,
        };
        (engine, peer_events_rx)
    }

    pub fn local_id(&self) -> ClientId {
        self.local_id
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection_state
    }

    pub fn in_call(&self) -> bool {
        self.in_call
    }

    pub fn media_ready(&self) -> bool {
        self.media.is_ready()
    }

    pub fn local_stream(&self) -> Option<MediaStream> {
        self.media.stream().cloned()
    }

    pub fn remote_stream(&self) -> Option<MediaStream> {
        self.remote_stream.clone()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_camera_off(&self) -> bool {
        self.camera_off
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_peer(&self) -> bool {
        self.peer.is_some()
    }

    /// Generation of the current handle, if there is one.
    pub fn peer_generation(&self) -> Option<u64> {
        self.peer.as_ref().map(|p| p.generation())
    }

    pub fn remote_description_applied(&self) -> bool {
        self.remote_description_applied
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_candidates.len()
    }

    pub fn reconnect_in_flight(&self) -> bool {
        self.reconnect.is_held()
    }

    /// When the pending reconnection follow-up is due.
    pub fn follow_up_deadline(&self) -> Option<Instant> {
        self.follow_up
    }

    /// Stores a non-fatal error for the presentation layer.
    pub fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.last_error = Some(message);
    }

    /// A lost connection stays `Failed` while it is being recovered; only
    /// `Connected` ends recovery.
    fn enter_negotiating(&mut self) {
        if !matches!(self.phase, EnginePhase::Connected | EnginePhase::Failed) {
            self.phase = EnginePhase::Negotiating;
        }
    }

    async fn send_signal(&self, signal: Signal) {
        let kind = signal.kind();
        if let Err(e) = self.transport.send(&signal).await {
            warn!("Failed to send {} signal: {}", kind, e);
        }
    }
}
