use crate::engine::NegotiationEngine;
use crate::error::NegotiationError;
use crate::peer::SignalingState;
use duet_core::{IceCandidate, SessionDescription, Signal, SignalEnvelope};
use tracing::{debug, info, warn};

impl NegotiationEngine {
    /// Applies one incoming signal. Errors end up in `last_error` and never
    /// stop the session.
    pub async fn handle_signal(&mut self, envelope: SignalEnvelope) {
        if envelope.is_from(&self.local_id) {
            return;
        }

        if let Err(e) = self.dispatch_signal(&envelope).await {
            self.record_error(format!("Failed to process {} signal: {}", envelope.kind, e));
        }
    }

    async fn dispatch_signal(&mut self, envelope: &SignalEnvelope) -> Result<(), NegotiationError> {
        let signal = envelope
            .decode()
            .map_err(|source| NegotiationError::MalformedSignal {
                kind: envelope.kind,
                source,
            })?;

        match signal {
            Signal::Offer(desc) => self.handle_offer(desc).await,
            Signal::Answer(desc) => self.handle_answer(desc).await,
            Signal::Candidate(candidate) => self.handle_candidate(candidate).await,
        }
    }

    async fn handle_offer(&mut self, offer: SessionDescription) -> Result<(), NegotiationError> {
        self.prepare_peer().await?;
        self.yield_local_offer().await?;

        let answer = {
            let peer = self.peer.as_ref().ok_or(NegotiationError::NoPeer)?;
            peer.set_remote_description(offer).await?;
            self.remote_description_applied = true;
            self.flush_pending_candidates().await;

            let peer = self.peer.as_ref().ok_or(NegotiationError::NoPeer)?;
            let answer = peer.create_answer().await?;
            peer.set_local_description(answer.clone()).await?;
            answer
        };

        self.send_signal(Signal::Answer(answer)).await;
        self.mark_live();
        Ok(())
    }

    /// The side receiving an offer always yields. A pending local offer is
    /// rolled back; when the peer cannot roll back (webrtc-rs refuses), the
    /// handle is replaced by a fresh one, keeping the queued remote
    /// candidates.
    async fn yield_local_offer(&mut self) -> Result<(), NegotiationError> {
        let peer = self.peer.as_ref().ok_or(NegotiationError::NoPeer)?;
        if peer.signaling_state() == SignalingState::Stable {
            return Ok(());
        }

        info!("Offer collision, rolling back local offer");
        let rolled_back = match peer.rollback().await {
            Ok(()) => peer.signaling_state() == SignalingState::Stable,
            Err(e) => {
                warn!("Rollback refused, rebuilding peer: {}", e);
                false
            }
        };
        if rolled_back {
            return Ok(());
        }

        let queued = self.pending_candidates.drain();
        self.build_peer().await?;
        for candidate in queued {
            self.pending_candidates.push(candidate);
        }
        Ok(())
    }

    async fn handle_answer(&mut self, answer: SessionDescription) -> Result<(), NegotiationError> {
        let Some(peer) = self.peer.as_ref() else {
            debug!("Ignoring answer without a peer connection");
            return Ok(());
        };

        let state = peer.signaling_state();
        if state != SignalingState::HaveLocalOffer {
            debug!("Ignoring answer in signaling state {:?}", state);
            return Ok(());
        }

        peer.set_remote_description(answer).await?;
        self.remote_description_applied = true;
        self.flush_pending_candidates().await;
        self.mark_live();
        Ok(())
    }

    async fn handle_candidate(&mut self, candidate: IceCandidate) -> Result<(), NegotiationError> {
        let Some(peer) = self.peer.as_ref() else {
            debug!("Dropping candidate without a peer connection");
            return Ok(());
        };
        if peer.signaling_state() == SignalingState::Closed {
            return Ok(());
        }

        if !self.remote_description_applied {
            self.pending_candidates.push(candidate);
            return Ok(());
        }

        if let Err(e) = peer.add_ice_candidate(candidate).await {
            warn!("Failed to add ICE candidate: {}", e);
        }
        Ok(())
    }

    /// Applies queued candidates in arrival order; rejected ones are skipped.
    async fn flush_pending_candidates(&mut self) {
        let queued = self.pending_candidates.drain();
        let Some(peer) = self.peer.as_ref() else {
            return;
        };

        for candidate in queued {
            if let Err(e) = peer.add_ice_candidate(candidate).await {
                warn!("Failed to add queued ICE candidate: {}", e);
            }
        }
    }

    fn mark_live(&mut self) {
        self.in_call = true;
        self.enter_negotiating();
    }
}
