use crate::engine::{EnginePhase, NegotiationEngine};
use crate::peer::ConnectionState;
use tracing::info;

impl NegotiationEngine {
    /// Drops the current handle after detaching its callbacks.
    pub(super) async fn close_peer(&mut self) {
        if let Some(peer) = self.peer.take() {
            peer.close().await;
        }
    }

    /// Ends the call: closes the peer, stops local and remote media and
    /// resets negotiation state. Safe to call repeatedly.
    pub async fn end_call(&mut self) {
        self.close_peer().await;

        self.media.release();
        if let Some(remote) = self.remote_stream.take() {
            remote.stop_all();
        }

        self.in_call = false;
        self.muted = false;
        self.camera_off = false;
        self.connection_state = ConnectionState::Closed;
        self.remote_description_applied = false;
        self.pending_candidates.clear();
        self.follow_up = None;
        self.reconnect.release();

        if self.phase != EnginePhase::Closed {
            info!("Call torn down");
        }
        self.phase = EnginePhase::Closed;
    }

    /// Returns the new muted flag. No-op without local media.
    pub fn toggle_mute(&mut self) -> bool {
        if self.media.is_ready() {
            self.muted = !self.muted;
            self.media.set_audio_enabled(!self.muted);
        }
        self.muted
    }

    /// Returns the new camera-off flag. No-op without local media.
    pub fn toggle_camera(&mut self) -> bool {
        if self.media.is_ready() {
            self.camera_off = !self.camera_off;
            self.media.set_video_enabled(!self.camera_off);
        }
        self.camera_off
    }
}
