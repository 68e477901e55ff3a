use crate::engine::{EnginePhase, NegotiationEngine};
use crate::peer::{ConnectionState, SignalingState};
use tokio::time::Instant;
use tracing::{debug, info};

impl NegotiationEngine {
    /// Two-phase self-healing. At most one attempt runs at a time; the slot
    /// stays taken until the follow-up check has run.
    pub async fn attempt_reconnect(&mut self) {
        if !self.reconnect.try_acquire() {
            debug!("Reconnection already in flight");
            return;
        }

        let usable = self
            .peer
            .as_ref()
            .is_some_and(|p| p.signaling_state() != SignalingState::Closed);

        if !usable {
            info!("No usable peer, rebuilding");
            let result = self.create_and_send_offer(true).await;
            self.reconnect.release();
            if let Err(e) = result {
                self.record_error(format!("Reconnect failed: {e}"));
            }
            return;
        }

        info!("Restarting ICE on peer #{}", self.generation);
        if let Some(peer) = &self.peer {
            peer.restart_ice();
        }
        match self.create_and_send_offer(true).await {
            Ok(()) => {
                self.follow_up = Some(Instant::now() + self.config.reconnect_delay);
            }
            Err(e) => {
                self.reconnect.release();
                self.record_error(format!("Reconnect failed: {e}"));
            }
        }
    }

    /// Runs the scheduled follow-up: rebuilds once if the restart did not
    /// bring the connection back, then frees the slot.
    pub async fn run_follow_up(&mut self) {
        if self.follow_up.take().is_none() {
            return;
        }

        let still_down = self
            .peer
            .as_ref()
            .is_some_and(|p| p.connection_state() != ConnectionState::Connected);

        if still_down {
            info!("Still not connected after ICE restart, rebuilding peer");
            self.close_peer().await;
            if let Err(e) = self.create_and_send_offer(true).await {
                self.record_error(format!("Reconnect retry failed: {e}"));
            }
        }

        self.reconnect.release();
    }

    /// The host regained network connectivity.
    pub async fn network_online(&mut self) {
        if !matches!(
            self.phase,
            EnginePhase::Negotiating | EnginePhase::Connected | EnginePhase::Failed
        ) {
            debug!("Network back online, no call to recover ({})", self.phase);
            return;
        }
        info!("Network back online");
        self.attempt_reconnect().await;
    }
}
