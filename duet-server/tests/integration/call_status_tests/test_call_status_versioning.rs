use duet_core::{CallStatus, ClientId, ServerMessage};
use duet_server::{RoomCommand, RoomConfig};

use crate::integration::{FRAME_TIMEOUT_MS, create_test_room, init_tracing, join};

#[tokio::test]
async fn test_call_status_versions_grow_and_reach_everyone() {
    init_tracing();

    let (room_cmd_tx, signaling) = create_test_room(RoomConfig::default());
    let caller = ClientId::new();
    let callee = ClientId::new();
    join(&room_cmd_tx, &signaling, caller).await;
    join(&room_cmd_tx, &signaling, callee).await;

    room_cmd_tx
        .send(RoomCommand::SetCallStatus {
            client_id: caller,
            status: CallStatus::Ringing,
        })
        .await
        .unwrap();
    room_cmd_tx
        .send(RoomCommand::SetCallStatus {
            client_id: callee,
            status: CallStatus::Accepted,
        })
        .await
        .unwrap();

    for member in [caller, callee] {
        assert!(
            signaling
                .wait_for(&member, FRAME_TIMEOUT_MS, |m| matches!(
                    m,
                    ServerMessage::CallStatus { record } if record.version == 2
                ))
                .await
        );

        let records: Vec<_> = signaling
            .frames_for(&member)
            .await
            .into_iter()
            .filter_map(|m| match m {
                ServerMessage::CallStatus { record } => Some(record),
                _ => None,
            })
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, CallStatus::Ringing);
        assert_eq!(records[0].sender, Some(caller));
        assert_eq!(records[0].version, 1);
        assert_eq!(records[1].status, CallStatus::Accepted);
        assert_eq!(records[1].sender, Some(callee));
        assert_eq!(records[1].version, 2);
    }
}

#[tokio::test]
async fn test_late_joiner_learns_current_status() {
    init_tracing();

    let (room_cmd_tx, signaling) = create_test_room(RoomConfig::default());
    let first = ClientId::new();
    join(&room_cmd_tx, &signaling, first).await;

    room_cmd_tx
        .send(RoomCommand::SetCallStatus {
            client_id: first,
            status: CallStatus::Ended,
        })
        .await
        .unwrap();

    let second = ClientId::new();
    join(&room_cmd_tx, &signaling, second).await;

    match &signaling.frames_for(&second).await[0] {
        ServerMessage::Welcome { call_status, .. } => {
            assert_eq!(call_status.status, CallStatus::Ended);
            assert_eq!(call_status.version, 1);
        }
        other => panic!("Expected Welcome, got {other:?}"),
    }
}
