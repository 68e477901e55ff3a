use duet_core::{ClientId, ErrorCode, ServerMessage, SessionDescription, Signal, SignalEnvelope};
use duet_server::{RoomCommand, RoomConfig};

use crate::integration::{FRAME_TIMEOUT_MS, create_test_room, init_tracing, join};

#[tokio::test]
async fn test_durable_send_refused_without_backlog() {
    init_tracing();

    let config = RoomConfig {
        durable_backlog: false,
        ..RoomConfig::default()
    };
    let (room_cmd_tx, signaling) = create_test_room(config);
    let a = ClientId::new();
    let b = ClientId::new();
    join(&room_cmd_tx, &signaling, a).await;
    join(&room_cmd_tx, &signaling, b).await;

    assert!(matches!(
        signaling.frames_for(&a).await[0],
        ServerMessage::Welcome {
            backlog_available: false,
            ..
        }
    ));

    let offer = SignalEnvelope::new(a, &Signal::Offer(SessionDescription::offer("v=0"))).unwrap();
    room_cmd_tx
        .send(RoomCommand::Signal {
            client_id: a,
            envelope: offer.clone(),
            durable: true,
        })
        .await
        .unwrap();

    // The sender gets its envelope back so it can retry over broadcast.
    assert!(
        signaling
            .wait_for(&a, FRAME_TIMEOUT_MS, |m| matches!(
                m,
                ServerMessage::Error {
                    code: ErrorCode::BacklogUnavailable,
                    envelope: Some(e),
                    ..
                } if e == &offer
            ))
            .await
    );

    room_cmd_tx
        .send(RoomCommand::Signal {
            client_id: a,
            envelope: offer.clone(),
            durable: false,
        })
        .await
        .unwrap();

    assert!(
        signaling
            .wait_for(&b, FRAME_TIMEOUT_MS, |m| {
                matches!(m, ServerMessage::Signal { envelope } if envelope == &offer)
            })
            .await
    );
    let delivered_to_b = signaling
        .frames_for(&b)
        .await
        .iter()
        .filter(|m| matches!(m, ServerMessage::Signal { .. }))
        .count();
    assert_eq!(delivered_to_b, 1, "Refused durable send must not be forwarded");
}
