use duet_core::{ClientId, IceCandidate, ServerMessage, Signal, SignalEnvelope};
use duet_server::{RoomCommand, RoomConfig};

use crate::integration::{create_test_room, init_tracing, join};

fn candidate(sender: ClientId, n: usize) -> SignalEnvelope {
    SignalEnvelope::new(sender, &Signal::Candidate(IceCandidate::new(format!("candidate:{n}")))).unwrap()
}

fn replayed(frames: &[ServerMessage]) -> Vec<SignalEnvelope> {
    frames
        .iter()
        .filter_map(|m| match m {
            ServerMessage::Signal { envelope } => Some(envelope.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_durable_signals_are_replayed_to_late_joiner() {
    init_tracing();

    let (room_cmd_tx, signaling) = create_test_room(RoomConfig::default());
    let early = ClientId::new();
    join(&room_cmd_tx, &signaling, early).await;

    // Only durable sends are kept for the member that is not there yet.
    for (n, durable) in [(0, true), (1, false), (2, true)] {
        room_cmd_tx
            .send(RoomCommand::Signal {
                client_id: early,
                envelope: candidate(early, n),
                durable,
            })
            .await
            .unwrap();
    }

    let late = ClientId::new();
    join(&room_cmd_tx, &signaling, late).await;

    let frames = signaling.frames_for(&late).await;
    assert!(matches!(frames[0], ServerMessage::Welcome { .. }));
    assert_eq!(replayed(&frames), vec![candidate(early, 0), candidate(early, 2)]);
}

#[tokio::test]
async fn test_purge_clears_backlog() {
    init_tracing();

    let (room_cmd_tx, signaling) = create_test_room(RoomConfig::default());
    let early = ClientId::new();
    join(&room_cmd_tx, &signaling, early).await;

    room_cmd_tx
        .send(RoomCommand::Signal {
            client_id: early,
            envelope: candidate(early, 0),
            durable: true,
        })
        .await
        .unwrap();
    room_cmd_tx
        .send(RoomCommand::PurgeBacklog { client_id: early })
        .await
        .unwrap();

    let late = ClientId::new();
    join(&room_cmd_tx, &signaling, late).await;

    assert!(replayed(&signaling.frames_for(&late).await).is_empty());
}

#[tokio::test]
async fn test_backlog_drops_oldest_at_capacity() {
    init_tracing();

    let config = RoomConfig {
        backlog_capacity: 2,
        ..RoomConfig::default()
    };
    let (room_cmd_tx, signaling) = create_test_room(config);
    let early = ClientId::new();
    join(&room_cmd_tx, &signaling, early).await;

    for n in 0..3 {
        room_cmd_tx
            .send(RoomCommand::Signal {
                client_id: early,
                envelope: candidate(early, n),
                durable: true,
            })
            .await
            .unwrap();
    }

    let late = ClientId::new();
    join(&room_cmd_tx, &signaling, late).await;

    assert_eq!(
        replayed(&signaling.frames_for(&late).await),
        vec![candidate(early, 1), candidate(early, 2)]
    );
}
