use crate::engine::NegotiationEngine;
use crate::error::NegotiationError;
use duet_core::Signal;
use tracing::info;

impl NegotiationEngine {
    /// Prepares the peer, then creates, applies and sends a local offer.
    pub async fn create_and_send_offer(&mut self, ice_restart: bool) -> Result<(), NegotiationError> {
        self.prepare_peer().await?;

        let offer = {
            let peer = self.peer.as_ref().ok_or(NegotiationError::NoPeer)?;
            let offer = peer.create_offer(ice_restart).await?;
            peer.set_local_description(offer.clone()).await?;
            offer
        };

        self.enter_negotiating();
        info!(
            "Sending {}offer from peer #{}",
            if ice_restart { "restart " } else { "" },
            self.generation
        );
        self.send_signal(Signal::Offer(offer)).await;
        Ok(())
    }
}
