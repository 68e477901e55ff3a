use crate::{AppState, RoomCommand};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use duet_core::{ClientId, ClientMessage, RoomName, ServerMessage};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path((room, client_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Response {
    let client_id = match client_id.parse::<ClientId>() {
        Ok(id) => id,
        Err(e) => {
            warn!("Rejecting socket with invalid client id '{}': {}", client_id, e);
            return (StatusCode::BAD_REQUEST, "invalid client id").into_response();
        }
    };
    if state.signaling.is_connected(&client_id) {
        warn!("Rejecting second socket for client {}", client_id);
        return (StatusCode::CONFLICT, "client id already connected").into_response();
    }
    let room = RoomName::from(room);

    ws.on_upgrade(move |socket| handle_socket(socket, room, client_id, state))
}

async fn handle_socket(socket: WebSocket, room: RoomName, client_id: ClientId, state: AppState) {
    info!("New WebSocket connection: {} -> room '{}'", client_id, room);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Another socket may have claimed the id since the upgrade was accepted.
    if !state.signaling.add_peer(client_id, tx) {
        warn!("Client {} already has a socket, closing the new one", client_id);
        let _ = sender.send(Message::Close(None)).await;
        return;
    }
    let room_tx = state.rooms.get_room_sender(&room);

    if room_tx.send(RoomCommand::Join { client_id }).await.is_err() {
        error!("Room '{}' died before {} could join", room, client_id);
        state.signaling.remove_peer(&client_id);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let revoked = matches!(msg, ServerMessage::RoomFull { .. });
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server frame: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
            if revoked {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let room_tx = room_tx.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Leave) => break,
                        Ok(frame) => {
                            let cmd = into_command(client_id, frame);
                            if let Err(e) = room_tx.send(cmd).await {
                                error!("Room died: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid ClientMessage from {}: {:?}", client_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    let _ = room_tx.send(RoomCommand::Leave { client_id }).await;
    state.signaling.remove_peer(&client_id);
    info!("WebSocket disconnected: {}", client_id);
}

fn into_command(client_id: ClientId, frame: ClientMessage) -> RoomCommand {
    match frame {
        ClientMessage::Signal { envelope, durable } => RoomCommand::Signal {
            client_id,
            envelope,
            durable,
        },
        ClientMessage::PurgeBacklog => RoomCommand::PurgeBacklog { client_id },
        ClientMessage::SetCallStatus { status } => RoomCommand::SetCallStatus { client_id, status },
        ClientMessage::Leave => RoomCommand::Leave { client_id },
    }
}
