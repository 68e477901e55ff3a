//! Integration tests for duet-server.
//!
//! Tests are organized by functionality:
//! - `connection_tests` - joining, leaving, the member cap and the socket endpoint
//! - `messaging_tests` - signal forwarding, backlog replay and purging
//! - `call_status_tests` - the versioned call-status record

pub mod call_status_tests;
pub mod connection_tests;
pub mod messaging_tests;

use duet_core::{ClientId, RoomName, ServerMessage};
use duet_server::{Room, RoomCommand, RoomConfig};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Level;

use crate::utils::MockSignalingOutput;

/// Frame wait budget for room round trips (ms).
pub const FRAME_TIMEOUT_MS: u64 = 2000;

/// Initialize tracing for tests (call once per test).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Create a room with recording signaling output.
///
/// Returns (room_cmd_tx, signaling) for test control.
pub fn create_test_room(config: RoomConfig) -> (mpsc::Sender<RoomCommand>, MockSignalingOutput) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<RoomCommand>(100);
    let signaling = MockSignalingOutput::new();

    let room = Room::new(
        RoomName::from("test-room"),
        config,
        cmd_rx,
        Arc::new(signaling.clone()),
    );

    tokio::spawn(async move {
        room.run().await;
    });

    (cmd_tx, signaling)
}

/// Join `client_id` and wait until the room answered it.
pub async fn join(
    room_cmd_tx: &mpsc::Sender<RoomCommand>,
    signaling: &MockSignalingOutput,
    client_id: ClientId,
) {
    room_cmd_tx
        .send(RoomCommand::Join { client_id })
        .await
        .expect("Failed to send join");

    let answered = signaling
        .wait_for(&client_id, FRAME_TIMEOUT_MS, |msg| {
            matches!(
                msg,
                ServerMessage::Welcome { .. } | ServerMessage::RoomFull { .. }
            )
        })
        .await;
    assert!(answered, "Room never answered join of {client_id}");
}
