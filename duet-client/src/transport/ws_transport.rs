use crate::config::ClientConfig;
use crate::error::{SignalDeliveryError, TransportError};
use crate::transport::room_event::RoomEvent;
use crate::transport::signal_transport::SignalTransport;
use async_trait::async_trait;
use duet_core::{
    CallStatus, ClientId, ClientMessage, ErrorCode, ServerMessage, Signal, SignalEnvelope,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

const ROOM_EVENT_BUFFER: usize = 100;

/// Which relay path signals currently take.
#[derive(Debug)]
struct DeliveryPath {
    durable: AtomicBool,
    fallback_logged: AtomicBool,
}

impl DeliveryPath {
    fn is_durable(&self) -> bool {
        self.durable.load(Ordering::SeqCst)
    }

    /// Switches to broadcast for the rest of the session.
    fn fall_back(&self) {
        self.durable.store(false, Ordering::SeqCst);
        if !self.fallback_logged.swap(true, Ordering::SeqCst) {
            warn!("Relay has no signal backlog, falling back to broadcast signaling");
        }
    }
}

/// [`SignalTransport`] over the duet relay WebSocket.
pub struct WsSignalTransport {
    local_id: ClientId,
    outbound: mpsc::UnboundedSender<ClientMessage>,
    path: Arc<DeliveryPath>,
}

impl WsSignalTransport {
    /// Joins the configured room under a fresh client id.
    pub async fn connect(
        config: &ClientConfig,
    ) -> Result<(Self, mpsc::Receiver<RoomEvent>), TransportError> {
        let local_id = ClientId::new();
        let url = config.room_url(&local_id);
        let (socket, _) = connect_async(url.as_str()).await?;
        info!("Connected to relay at {} as {}", url, local_id);

        let (mut sender, mut receiver) = socket.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<ClientMessage>();
        let (event_tx, event_rx) = mpsc::channel::<RoomEvent>(ROOM_EVENT_BUFFER);
        let path = Arc::new(DeliveryPath {
            durable: AtomicBool::new(true),
            fallback_logged: AtomicBool::new(false),
        });

        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let leaving = matches!(msg, ClientMessage::Leave);
                let json = match serde_json::to_string(&msg) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize client frame: {}", e);
                        continue;
                    }
                };
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
                if leaving {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        });

        tokio::spawn({
            let path = path.clone();
            let resend = outbound.clone();

            async move {
                while let Some(Ok(msg)) = receiver.next().await {
                    let text = match msg {
                        Message::Text(text) => text,
                        Message::Close(_) => break,
                        _ => continue,
                    };
                    let frame = match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            warn!("Invalid ServerMessage from relay: {:?}", e);
                            continue;
                        }
                    };

                    let Some(event) = into_room_event(frame, &path, &resend) else {
                        continue;
                    };
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                }

                info!("Relay connection closed");
                let _ = event_tx.send(RoomEvent::Closed).await;
            }
        });

        Ok((
            Self {
                local_id,
                outbound,
                path,
            },
            event_rx,
        ))
    }

    fn push(&self, msg: ClientMessage) -> Result<(), SignalDeliveryError> {
        self.outbound
            .send(msg)
            .map_err(|_| SignalDeliveryError::Disconnected)
    }
}

fn into_room_event(
    frame: ServerMessage,
    path: &DeliveryPath,
    resend: &mpsc::UnboundedSender<ClientMessage>,
) -> Option<RoomEvent> {
    match frame {
        ServerMessage::Welcome {
            presence,
            call_status,
            backlog_available,
            ..
        } => {
            if !backlog_available {
                path.fall_back();
            }
            Some(RoomEvent::Joined {
                presence,
                call_status,
            })
        }
        ServerMessage::RoomFull { presence } => Some(RoomEvent::RoomFull { presence }),
        ServerMessage::Presence { count } => Some(RoomEvent::Presence(count)),
        ServerMessage::Signal { envelope } => Some(RoomEvent::Signal(envelope)),
        ServerMessage::CallStatus { record } => Some(RoomEvent::CallStatus(record)),
        ServerMessage::Error {
            code: ErrorCode::BacklogUnavailable,
            envelope,
            ..
        } => {
            path.fall_back();
            if let Some(envelope) = envelope {
                debug!("Re-sending {} signal over broadcast", envelope.kind);
                let _ = resend.send(ClientMessage::Signal {
                    envelope,
                    durable: false,
                });
            }
            None
        }
        ServerMessage::Error { code, message, .. } => {
            warn!("Relay error {:?}: {}", code, message);
            None
        }
    }
}

#[async_trait]
impl SignalTransport for WsSignalTransport {
    fn local_id(&self) -> ClientId {
        self.local_id
    }

    async fn send(&self, signal: &Signal) -> Result<(), SignalDeliveryError> {
        let envelope = SignalEnvelope::new(self.local_id, signal)?;
        self.push(ClientMessage::Signal {
            envelope,
            durable: self.path.is_durable(),
        })
    }

    async fn purge_backlog(&self) -> Result<(), SignalDeliveryError> {
        if !self.path.is_durable() {
            debug!("Broadcast signaling has no backlog to purge");
            return Ok(());
        }
        self.push(ClientMessage::PurgeBacklog)
    }

    async fn publish_call_status(&self, status: CallStatus) -> Result<(), SignalDeliveryError> {
        self.push(ClientMessage::SetCallStatus { status })
    }

    async fn leave(&self) {
        let _ = self.push(ClientMessage::Leave);
    }
}
