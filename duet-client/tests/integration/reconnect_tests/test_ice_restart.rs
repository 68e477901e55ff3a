use duet_client::EnginePhase;
use duet_client::peer::{ConnectionState, IceState};
use duet_client::PeerEvent;

use crate::integration::{EngineHarness, init_tracing};
use crate::utils::PeerCall;

/// Engine with a negotiated peer whose connection then dropped.
async fn failed_engine() -> EngineHarness {
    let mut h = EngineHarness::new();
    h.engine.create_and_send_offer(false).await.unwrap();
    h.connector.peer(0).set_connection_state(ConnectionState::Connected);
    h.pump().await;
    h.connector.peer(0).set_connection_state(ConnectionState::Failed);
    h.pump().await;
    h
}

#[tokio::test]
async fn test_lost_connection_restarts_ice_on_same_peer() {
    init_tracing();
    let h = failed_engine().await;

    assert_eq!(h.engine.phase(), EnginePhase::Failed);
    assert_eq!(h.connector.builds(), 1);
    assert!(h.connector.peer(0).calls().contains(&PeerCall::RestartIce));
    assert_eq!(h.connector.peer(0).offers(), vec![false, true]);
    assert!(h.engine.reconnect_in_flight());
    assert!(h.engine.follow_up_deadline().is_some());
}

#[tokio::test]
async fn test_second_failure_does_not_start_another_attempt() {
    init_tracing();
    let mut h = failed_engine().await;

    h.connector.peer(0).set_connection_state(ConnectionState::Disconnected);
    h.connector
        .peer(0)
        .emit(PeerEvent::IceStateChanged(IceState::Failed));
    h.pump().await;
    h.engine.network_online().await;

    assert_eq!(h.connector.builds(), 1);
    assert_eq!(h.connector.peer(0).offers(), vec![false, true]);
}

#[tokio::test]
async fn test_reconnect_without_peer_rebuilds_immediately() {
    init_tracing();
    let mut h = EngineHarness::new();

    h.engine.attempt_reconnect().await;

    assert_eq!(h.connector.builds(), 1);
    assert_eq!(h.connector.peer(0).offers(), vec![true]);
    assert!(!h.engine.reconnect_in_flight());
    assert!(h.engine.follow_up_deadline().is_none());
}

#[tokio::test]
async fn test_network_online_without_call_is_ignored() {
    init_tracing();
    let mut h = EngineHarness::new();
    h.engine.prepare_peer().await.unwrap();

    h.engine.network_online().await;

    assert_eq!(h.connector.builds(), 1);
    assert!(h.connector.peer(0).offers().is_empty());
    assert!(!h.engine.reconnect_in_flight());
}
