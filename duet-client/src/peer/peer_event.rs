use crate::media::MediaTrack;
use crate::peer::peer_state::{ConnectionState, IceState};
use duet_core::IceCandidate;
use tokio::sync::mpsc;

/// Everything a peer connection reports back, tagged by one enum so the
/// engine has a single dispatch point.
#[derive(Debug, Clone)]
pub enum PeerEvent {
    PathCandidateFound(IceCandidate),
    TrackAdded(MediaTrack),
    ConnectionStateChanged(ConnectionState),
    IceStateChanged(IceState),
}

/// Events carry the generation of the handle that produced them.
pub type PeerEventSender = mpsc::UnboundedSender<(u64, PeerEvent)>;
pub type PeerEventReceiver = mpsc::UnboundedReceiver<(u64, PeerEvent)>;
