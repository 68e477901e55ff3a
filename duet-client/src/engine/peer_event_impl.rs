use crate::engine::{EnginePhase, NegotiationEngine};
use crate::media::MediaStream;
use crate::peer::{ConnectionState, PeerEvent};
use duet_core::Signal;
use tracing::{debug, info, warn};

impl NegotiationEngine {
    /// Single entry point for everything a peer handle reports. Events from
    /// a superseded handle are dropped.
    pub async fn handle_peer_event(&mut self, generation: u64, event: PeerEvent) {
        if self.peer_generation() != Some(generation) {
            debug!("Dropping event from stale peer #{}: {:?}", generation, event);
            return;
        }

        match event {
            PeerEvent::PathCandidateFound(candidate) => {
                self.send_signal(Signal::Candidate(candidate)).await;
            }

            PeerEvent::TrackAdded(track) => {
                let remote = self
                    .remote_stream
                    .get_or_insert_with(|| MediaStream::new("remote"));
                if remote.add_track(track.clone()) {
                    info!("Remote {} track {} attached", track.kind(), track.id());
                }
            }

            PeerEvent::ConnectionStateChanged(state) => {
                self.connection_state = state;
                if state == ConnectionState::Connected {
                    info!("Peer #{} connected", generation);
                    self.in_call = true;
                    self.phase = EnginePhase::Connected;
                    if let Err(e) = self.transport.purge_backlog().await {
                        warn!("Failed to purge signal backlog: {}", e);
                    }
                } else if state.is_lost() {
                    self.phase = EnginePhase::Failed;
                    self.attempt_reconnect().await;
                }
            }

            PeerEvent::IceStateChanged(state) => {
                if state.is_lost() {
                    self.attempt_reconnect().await;
                }
            }
        }
    }
}
