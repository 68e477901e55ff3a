use duet_core::{CallStatus, ClientId, ServerMessage};
use duet_server::RoomConfig;

use crate::integration::{create_test_room, init_tracing, join};

#[tokio::test]
async fn test_single_client_joins_room() {
    init_tracing();

    let (room_cmd_tx, signaling) = create_test_room(RoomConfig::default());
    let client = ClientId::new();

    join(&room_cmd_tx, &signaling, client).await;

    let frames = signaling.frames_for(&client).await;
    match &frames[0] {
        ServerMessage::Welcome {
            client_id,
            presence,
            call_status,
            backlog_available,
        } => {
            assert_eq!(client_id, &client);
            assert_eq!(*presence, 1);
            assert_eq!(call_status.status, CallStatus::Idle);
            assert_eq!(call_status.version, 0);
            assert!(*backlog_available);
        }
        other => panic!("Expected Welcome first, got {other:?}"),
    }

    assert!(
        signaling
            .wait_for(&client, 1000, |m| matches!(m, ServerMessage::Presence { count: 1 }))
            .await
    );
}
