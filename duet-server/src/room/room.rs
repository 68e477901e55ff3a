use crate::room::room_command::RoomCommand;
use crate::room::room_config::RoomConfig;
use crate::signaling::SignalingOutput;
use duet_core::{
    CallStatus, CallStatusRecord, ClientId, ErrorCode, RoomName, ServerMessage, SignalEnvelope,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Actor owning one call room: membership, the durable signal backlog and
/// the call-status record.
pub struct Room {
    name: RoomName,
    config: RoomConfig,
    /// Members in join order.
    members: Vec<ClientId>,
    backlog: VecDeque<SignalEnvelope>,
    call_status: CallStatusRecord,
    command_rx: mpsc::Receiver<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl Room {
    pub fn new(
        name: RoomName,
        config: RoomConfig,
        command_rx: mpsc::Receiver<RoomCommand>,
        signaling: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            name,
            config,
            members: Vec::new(),
            backlog: VecDeque::new(),
            call_status: CallStatusRecord::default(),
            command_rx,
            signaling,
        }
    }

    pub async fn run(mut self) {
        info!("Room '{}' event loop started", self.name);

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Room '{}' finished", self.name);
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { client_id } => self.join(client_id).await,

            RoomCommand::Leave { client_id } => {
                let before = self.members.len();
                self.members.retain(|m| m != &client_id);
                if self.members.len() != before {
                    info!("Client {} left room '{}'", client_id, self.name);
                    self.broadcast_presence().await;
                }
            }

            RoomCommand::Signal {
                client_id,
                envelope,
                durable,
            } => {
                if !self.ensure_member(&client_id).await {
                    return;
                }
                self.forward_signal(client_id, envelope, durable).await;
            }

            RoomCommand::PurgeBacklog { client_id } => {
                if !self.ensure_member(&client_id).await {
                    return;
                }
                debug!(
                    "Purging {} backlogged signals in room '{}'",
                    self.backlog.len(),
                    self.name
                );
                self.backlog.clear();
            }

            RoomCommand::SetCallStatus { client_id, status } => {
                if !self.ensure_member(&client_id).await {
                    return;
                }
                self.set_call_status(client_id, status).await;
            }
        }
    }

    async fn join(&mut self, client_id: ClientId) {
        if self.members.contains(&client_id) {
            info!("Client {} re-joined room '{}'", client_id, self.name);
        } else {
            self.members.push(client_id);
            let presence = self.members.len();

            if presence > self.config.max_members {
                // Revoke the newcomer; the members already present never see
                // the overflow.
                self.members.retain(|m| m != &client_id);
                warn!(
                    "Room '{}' is full ({} members), revoking {}",
                    self.name, presence, client_id
                );
                self.signaling
                    .deliver(client_id, ServerMessage::RoomFull { presence })
                    .await;
                return;
            }
            info!(
                "Client {} joined room '{}' ({} present)",
                client_id, self.name, presence
            );
        }

        let welcome = ServerMessage::Welcome {
            client_id,
            presence: self.members.len(),
            call_status: self.call_status,
            backlog_available: self.config.durable_backlog,
        };
        self.signaling.deliver(client_id, welcome).await;

        for envelope in self.backlog.iter().cloned() {
            self.signaling
                .deliver(client_id, ServerMessage::Signal { envelope })
                .await;
        }

        self.broadcast_presence().await;
    }

    async fn forward_signal(&mut self, client_id: ClientId, envelope: SignalEnvelope, durable: bool) {
        if durable {
            if !self.config.durable_backlog {
                self.signaling
                    .deliver(
                        client_id,
                        ServerMessage::Error {
                            code: ErrorCode::BacklogUnavailable,
                            message: "durable signal backlog is disabled".to_owned(),
                            envelope: Some(envelope),
                        },
                    )
                    .await;
                return;
            }

            if self.backlog.len() >= self.config.backlog_capacity {
                warn!(
                    "Backlog of room '{}' at capacity ({}), dropping oldest signal",
                    self.name, self.config.backlog_capacity
                );
                self.backlog.pop_front();
            }
            self.backlog.push_back(envelope.clone());
        }

        for member in self.members.iter().filter(|m| **m != client_id) {
            self.signaling
                .deliver(
                    *member,
                    ServerMessage::Signal {
                        envelope: envelope.clone(),
                    },
                )
                .await;
        }
    }

    async fn set_call_status(&mut self, client_id: ClientId, status: CallStatus) {
        self.call_status = CallStatusRecord::new(
            status,
            Some(client_id),
            self.call_status.version + 1,
        );
        info!(
            "Call status of room '{}' is now {} (v{}, by {})",
            self.name, status, self.call_status.version, client_id
        );

        let record = self.call_status;
        for member in &self.members {
            self.signaling
                .deliver(*member, ServerMessage::CallStatus { record })
                .await;
        }
    }

    async fn broadcast_presence(&self) {
        let count = self.members.len();
        for member in &self.members {
            self.signaling
                .deliver(*member, ServerMessage::Presence { count })
                .await;
        }
    }

    async fn ensure_member(&self, client_id: &ClientId) -> bool {
        if self.members.contains(client_id) {
            return true;
        }
        warn!(
            "Ignoring command from {} which is not a member of room '{}'",
            client_id, self.name
        );
        self.signaling
            .deliver(
                *client_id,
                ServerMessage::Error {
                    code: ErrorCode::NotAMember,
                    message: format!("not a member of room '{}'", self.name),
                    envelope: None,
                },
            )
            .await;
        false
    }
}
