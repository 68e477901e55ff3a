use async_trait::async_trait;
use duet_client::media::MediaKind;
use duet_client::peer::{ConnectionState, PeerEventSender, SendCaps, SignalingState};
use duet_client::{MediaTrack, NegotiationError, PeerConnector, PeerEvent, PeerHandle};
use duet_core::{IceCandidate, SdpKind, SessionDescription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// One call made on a mock peer handle.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerCall {
    AddTrack(MediaKind),
    SendCaps(MediaKind, SendCaps),
    RestartIce,
    CreateOffer { ice_restart: bool },
    CreateAnswer,
    SetLocal(SdpKind),
    SetRemote(SdpKind),
    Rollback,
    AddCandidate(String),
    Close,
}

struct PeerState {
    signaling: SignalingState,
    connection: ConnectionState,
    restart_pending: bool,
    calls: Vec<PeerCall>,
}

/// Test-side view of one handle the connector built.
#[derive(Clone)]
pub struct MockPeer {
    pub generation: u64,
    state: Arc<Mutex<PeerState>>,
    events: PeerEventSender,
    refuse_rollback: Arc<AtomicBool>,
}

impl MockPeer {
    pub fn calls(&self) -> Vec<PeerCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn offers(&self) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PeerCall::CreateOffer { ice_restart } => Some(ice_restart),
                _ => None,
            })
            .collect()
    }

    pub fn applied_candidates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PeerCall::AddCandidate(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn signaling_state(&self) -> SignalingState {
        self.state.lock().unwrap().signaling
    }

    pub fn is_closed(&self) -> bool {
        self.calls().contains(&PeerCall::Close)
    }

    /// Emit an event as this handle's callbacks would.
    pub fn emit(&self, event: PeerEvent) {
        let _ = self.events.send((self.generation, event));
    }

    /// Move the connection state and report it.
    pub fn set_connection_state(&self, state: ConnectionState) {
        self.state.lock().unwrap().connection = state;
        self.emit(PeerEvent::ConnectionStateChanged(state));
    }

    fn record(&self, call: PeerCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

/// PeerConnector handing out scripted handles.
///
/// Signaling states follow the offer/answer rules: a remote offer is refused
/// while a local offer is pending, and an answer is only accepted in
/// `HaveLocalOffer`. Candidates whose text starts with `bad` are rejected.
/// Rollback can be refused the way webrtc-rs refuses it.
#[derive(Clone, Default)]
pub struct MockPeerConnector {
    peers: Arc<Mutex<Vec<MockPeer>>>,
    fail_builds: Arc<AtomicBool>,
    refuse_rollback: Arc<AtomicBool>,
}

impl MockPeerConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builds(&self) -> usize {
        self.peers.lock().unwrap().len()
    }

    pub fn peer(&self, index: usize) -> MockPeer {
        self.peers.lock().unwrap()[index].clone()
    }

    pub fn last(&self) -> MockPeer {
        self.peers
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("No peer built yet")
    }

    pub fn fail_builds(&self, fail: bool) {
        self.fail_builds.store(fail, Ordering::SeqCst);
    }

    /// Makes every handle, built or yet to be built, refuse `rollback`.
    pub fn refuse_rollback(&self, refuse: bool) {
        self.refuse_rollback.store(refuse, Ordering::SeqCst);
    }
}

#[async_trait]
impl PeerConnector for MockPeerConnector {
    async fn connect(
        &self,
        generation: u64,
        events: PeerEventSender,
    ) -> Result<Box<dyn PeerHandle>, NegotiationError> {
        if self.fail_builds.load(Ordering::SeqCst) {
            return Err(NegotiationError::Setup(anyhow::anyhow!("mock build refused")));
        }

        let peer = MockPeer {
            generation,
            state: Arc::new(Mutex::new(PeerState {
                signaling: SignalingState::Stable,
                connection: ConnectionState::New,
                restart_pending: false,
                calls: Vec::new(),
            })),
            events,
            refuse_rollback: self.refuse_rollback.clone(),
        };
        self.peers.lock().unwrap().push(peer.clone());
        Ok(Box::new(MockPeerHandle { peer }))
    }
}

struct MockPeerHandle {
    peer: MockPeer,
}

fn rejected(msg: &str) -> NegotiationError {
    NegotiationError::Rejected(msg.to_owned())
}

#[async_trait]
impl PeerHandle for MockPeerHandle {
    fn generation(&self) -> u64 {
        self.peer.generation
    }

    fn signaling_state(&self) -> SignalingState {
        self.peer.state.lock().unwrap().signaling
    }

    fn connection_state(&self) -> ConnectionState {
        self.peer.state.lock().unwrap().connection
    }

    async fn add_track(&self, track: &MediaTrack) -> Result<(), NegotiationError> {
        self.peer.record(PeerCall::AddTrack(track.kind()));
        Ok(())
    }

    async fn apply_send_caps(&self, track: &MediaTrack, caps: SendCaps) -> Result<(), NegotiationError> {
        self.peer.record(PeerCall::SendCaps(track.kind(), caps));
        Ok(())
    }

    fn restart_ice(&self) {
        let mut state = self.peer.state.lock().unwrap();
        state.restart_pending = true;
        state.calls.push(PeerCall::RestartIce);
    }

    async fn create_offer(&self, ice_restart: bool) -> Result<SessionDescription, NegotiationError> {
        let mut state = self.peer.state.lock().unwrap();
        let ice_restart = ice_restart || std::mem::take(&mut state.restart_pending);
        state.calls.push(PeerCall::CreateOffer { ice_restart });
        Ok(SessionDescription::offer(format!(
            "offer-{}-{}",
            self.peer.generation,
            state.calls.len()
        )))
    }

    async fn create_answer(&self) -> Result<SessionDescription, NegotiationError> {
        self.peer.record(PeerCall::CreateAnswer);
        Ok(SessionDescription::answer(format!("answer-{}", self.peer.generation)))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), NegotiationError> {
        let mut state = self.peer.state.lock().unwrap();
        state.signaling = match (desc.kind, state.signaling) {
            (SdpKind::Offer, SignalingState::Stable | SignalingState::HaveLocalOffer) => {
                SignalingState::HaveLocalOffer
            }
            (SdpKind::Answer, SignalingState::HaveRemoteOffer) => SignalingState::Stable,
            _ => return Err(rejected("local description in wrong state")),
        };
        state.calls.push(PeerCall::SetLocal(desc.kind));
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), NegotiationError> {
        let mut state = self.peer.state.lock().unwrap();
        state.signaling = match (desc.kind, state.signaling) {
            (SdpKind::Offer, SignalingState::Stable | SignalingState::HaveRemoteOffer) => {
                SignalingState::HaveRemoteOffer
            }
            (SdpKind::Answer, SignalingState::HaveLocalOffer) => SignalingState::Stable,
            _ => return Err(rejected("remote description in wrong state")),
        };
        state.calls.push(PeerCall::SetRemote(desc.kind));
        Ok(())
    }

    async fn rollback(&self) -> Result<(), NegotiationError> {
        if self.peer.refuse_rollback.load(Ordering::SeqCst) {
            return Err(rejected("invalid SDP type supplied to SetLocalDescription()"));
        }
        let mut state = self.peer.state.lock().unwrap();
        state.signaling = SignalingState::Stable;
        state.calls.push(PeerCall::Rollback);
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), NegotiationError> {
        if candidate.candidate.starts_with("bad") {
            return Err(rejected("unparseable candidate"));
        }
        self.peer.record(PeerCall::AddCandidate(candidate.candidate));
        Ok(())
    }

    async fn close(&self) {
        let mut state = self.peer.state.lock().unwrap();
        state.signaling = SignalingState::Closed;
        state.connection = ConnectionState::Closed;
        state.calls.push(PeerCall::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_mock_peer_refuses_answer_when_stable() {
        let connector = MockPeerConnector::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = connector.connect(1, tx).await.unwrap();

        let result = handle
            .set_remote_description(SessionDescription::answer("x"))
            .await;
        assert!(result.is_err());
        assert_eq!(connector.peer(0).signaling_state(), SignalingState::Stable);
    }
}
