use duet_core::{IceCandidate, SessionDescription, Signal, SignalKind};

use crate::integration::{EngineHarness, init_tracing};
use crate::utils::{PeerCall, remote_envelope};

fn candidate(text: &str) -> Signal {
    Signal::Candidate(IceCandidate::new(text))
}

#[tokio::test]
async fn test_early_candidates_flushed_in_arrival_order() {
    init_tracing();
    let mut h = EngineHarness::new();
    h.engine.prepare_peer().await.unwrap();

    for text in ["cand-1", "cand-2", "bad-cand-3", "cand-4"] {
        h.engine.handle_signal(remote_envelope(&candidate(text))).await;
    }
    assert_eq!(h.engine.pending_candidates(), 4);
    assert!(h.connector.peer(0).applied_candidates().is_empty());

    h.engine
        .handle_signal(remote_envelope(&Signal::Offer(SessionDescription::offer("v=0"))))
        .await;

    let peer = h.connector.peer(0);
    let calls = peer.calls();
    let remote_at = calls
        .iter()
        .position(|c| c == &PeerCall::SetRemote(duet_core::SdpKind::Offer))
        .expect("Offer was not applied");
    let first_candidate_at = calls
        .iter()
        .position(|c| matches!(c, PeerCall::AddCandidate(_)))
        .expect("No candidate applied");
    assert!(remote_at < first_candidate_at);

    // The rejected one is skipped, the rest keep their order.
    assert_eq!(peer.applied_candidates(), vec!["cand-1", "cand-2", "cand-4"]);
    assert_eq!(h.engine.pending_candidates(), 0);
    assert!(h.engine.remote_description_applied());
    assert_eq!(h.transport.sent_of(SignalKind::Answer), 1);
    assert!(h.engine.in_call());
    assert!(h.engine.last_error().is_none());
}

#[tokio::test]
async fn test_candidate_applied_directly_once_described() {
    init_tracing();
    let mut h = EngineHarness::new();
    h.engine
        .handle_signal(remote_envelope(&Signal::Offer(SessionDescription::offer("v=0"))))
        .await;

    h.engine.handle_signal(remote_envelope(&candidate("late"))).await;

    assert_eq!(h.engine.pending_candidates(), 0);
    assert_eq!(h.connector.peer(0).applied_candidates(), vec!["late"]);
}

#[tokio::test]
async fn test_candidate_without_peer_is_dropped() {
    init_tracing();
    let mut h = EngineHarness::new();

    h.engine.handle_signal(remote_envelope(&candidate("early"))).await;

    assert_eq!(h.connector.builds(), 0);
    assert_eq!(h.engine.pending_candidates(), 0);
}
