use crate::engine::{EnginePhase, NegotiationEngine};
use crate::error::{MediaAccessError, NegotiationError};
use crate::media::MediaStream;
use crate::peer::{SendCaps, SignalingState};
use tracing::{info, warn};

impl NegotiationEngine {
    /// Opens local capture if it is not open yet.
    pub async fn acquire_media(&mut self) -> Result<MediaStream, MediaAccessError> {
        self.media.acquire().await
    }

    /// Makes sure local media and a usable peer handle exist. Does nothing
    /// more while the current handle is not closed.
    pub async fn prepare_peer(&mut self) -> Result<(), NegotiationError> {
        self.acquire_media().await?;

        let usable = self
            .peer
            .as_ref()
            .is_some_and(|p| p.signaling_state() != SignalingState::Closed);
        if usable {
            return Ok(());
        }

        self.build_peer().await
    }

    /// Replaces the handle with a fresh one carrying every local track.
    pub(super) async fn build_peer(&mut self) -> Result<(), NegotiationError> {
        self.close_peer().await;

        if matches!(self.phase, EnginePhase::Idle | EnginePhase::Closed) {
            self.phase = EnginePhase::Preparing;
        }
        self.generation += 1;
        let peer = self
            .connector
            .connect(self.generation, self.peer_events.clone())
            .await?;

        self.remote_description_applied = false;
        self.pending_candidates.clear();
        self.remote_stream
            .get_or_insert_with(|| MediaStream::new("remote"));

        let tracks = self
            .media
            .stream()
            .map(|s| s.tracks())
            .unwrap_or_default();
        for track in &tracks {
            peer.add_track(track).await?;
            if let Err(e) = peer
                .apply_send_caps(track, SendCaps::for_kind(track.kind()))
                .await
            {
                warn!("Could not cap {} sender: {}", track.kind(), e);
            }
        }

        info!(
            "Peer #{} ready with {} local tracks",
            self.generation,
            tracks.len()
        );
        self.peer = Some(peer);
        Ok(())
    }
}
