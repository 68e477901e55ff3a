use crate::engine::{EngineConfig, NegotiationEngine};
use crate::error::CallError;
use crate::media::MediaDevices;
use crate::peer::{PeerConnector, PeerEventReceiver};
use crate::session::call_command::CallCommand;
use crate::session::call_handle::CallHandle;
use crate::session::call_view::CallView;
use crate::transport::{RoomEvent, SignalTransport};
use duet_core::{CallStatus, CallStatusRecord, ClientId};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 32;

/// Call-level state layered over the engine.
#[derive(Debug, Default)]
struct CallState {
    /// Newest record seen; local writes land here right away.
    status: CallStatusRecord,
    participant_count: usize,
    room_full: bool,
    is_caller: bool,
    offer_sent_for_accepted: bool,
    incoming_call: bool,
    /// Local writes applied ahead of the relay, oldest first.
    pending_writes: VecDeque<CallStatus>,
}

/// Actor owning one client's side of a call. User commands, room traffic,
/// peer events and the reconnection follow-up are all handled on its task.
pub struct CallSession {
    local_id: ClientId,
    engine: NegotiationEngine,
    transport: Arc<dyn SignalTransport>,
    command_rx: mpsc::Receiver<CallCommand>,
    room_rx: mpsc::Receiver<RoomEvent>,
    room_open: bool,
    peer_rx: PeerEventReceiver,
    view_tx: watch::Sender<CallView>,
    state: CallState,
}

impl CallSession {
    /// Spawns the session task and returns its handle.
    pub fn start(
        transport: Arc<dyn SignalTransport>,
        room_events: mpsc::Receiver<RoomEvent>,
        connector: Arc<dyn PeerConnector>,
        devices: Arc<dyn MediaDevices>,
        config: EngineConfig,
    ) -> CallHandle {
        let local_id = transport.local_id();
        let (engine, peer_rx) = NegotiationEngine::new(connector, transport.clone(), devices, config);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (view_tx, view_rx) = watch::channel(CallView::default());

        let session = CallSession {
            local_id,
            engine,
            transport,
            command_rx,
            room_rx: room_events,
            room_open: true,
            peer_rx,
            view_tx,
            state: CallState::default(),
        };
        tokio::spawn(session.run());

        CallHandle::new(local_id, command_tx, view_rx)
    }

    pub async fn run(mut self) {
        info!("Call session {} started", self.local_id);

        loop {
            let follow_up = self.engine.follow_up_deadline();

            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
                event = self.room_rx.recv(), if self.room_open => match event {
                    Some(event) => self.handle_room_event(event).await,
                    None => self.handle_room_event(RoomEvent::Closed).await,
                },
                Some((generation, event)) = self.peer_rx.recv() => {
                    self.engine.handle_peer_event(generation, event).await;
                }
                _ = wait_until(follow_up) => {
                    self.engine.run_follow_up().await;
                }
            }

            self.publish_view();
        }

        let in_progress = self.engine.in_call()
            || matches!(
                self.state.status.status,
                CallStatus::Ringing | CallStatus::Accepted
            );
        self.engine.end_call().await;
        if in_progress && !self.state.room_full {
            if let Err(e) = self.transport.publish_call_status(CallStatus::Ended).await {
                warn!("Failed to publish call end on shutdown: {}", e);
            }
        }
        self.transport.leave().await;
        info!("Call session {} finished", self.local_id);
    }

    async fn handle_command(&mut self, cmd: CallCommand) {
        let (result, reply) = match cmd {
            CallCommand::Call { reply } => (self.call().await, reply),
            CallCommand::Accept { reply } => (self.accept().await, reply),
            CallCommand::Decline { reply } => {
                self.decline().await;
                (Ok(()), reply)
            }
            CallCommand::End { reply } => {
                self.end().await;
                (Ok(()), reply)
            }
            CallCommand::ToggleMute { reply } => {
                let muted = self.engine.toggle_mute();
                debug!("Microphone {}", if muted { "muted" } else { "live" });
                (Ok(()), reply)
            }
            CallCommand::ToggleCamera { reply } => {
                let off = self.engine.toggle_camera();
                debug!("Camera {}", if off { "off" } else { "on" });
                (Ok(()), reply)
            }
            CallCommand::NetworkOnline { reply } => {
                self.engine.network_online().await;
                (Ok(()), reply)
            }
        };

        // Callers read the view as soon as the reply lands.
        self.publish_view();
        let _ = reply.send(result);
    }

    fn can_call(&self) -> bool {
        !self.state.room_full
            && self.state.participant_count == 2
            && self.engine.media_ready()
            && self.state.status.status != CallStatus::Ringing
    }

    fn can_end(&self) -> bool {
        self.engine.in_call() || self.state.status.status == CallStatus::Ringing
    }

    async fn call(&mut self) -> Result<(), CallError> {
        if !self.can_call() {
            return Err(CallError::NotPermitted);
        }

        self.state.is_caller = true;
        self.state.offer_sent_for_accepted = false;
        if let Err(e) = self.transport.purge_backlog().await {
            warn!("Failed to purge stale signals: {}", e);
        }
        if let Err(e) = self.engine.prepare_peer().await {
            self.engine.record_error(e.to_string());
            self.state.is_caller = false;
            return Err(e.into());
        }

        self.publish_status(CallStatus::Ringing).await;
        Ok(())
    }

    async fn accept(&mut self) -> Result<(), CallError> {
        if self.state.room_full {
            return Err(CallError::NotPermitted);
        }

        self.state.incoming_call = false;
        self.state.is_caller = false;
        if let Err(e) = self.engine.prepare_peer().await {
            self.engine.record_error(e.to_string());
            return Err(e.into());
        }

        self.publish_status(CallStatus::Accepted).await;
        Ok(())
    }

    async fn decline(&mut self) {
        self.state.incoming_call = false;
        self.state.is_caller = false;
        self.publish_status(CallStatus::Declined).await;
    }

    async fn end(&mut self) {
        self.engine.end_call().await;
        self.state.is_caller = false;
        self.state.offer_sent_for_accepted = false;
        self.publish_status(CallStatus::Ended).await;
    }

    /// Applies the write locally first, then hands it to the relay.
    async fn publish_status(&mut self, status: CallStatus) {
        let local = CallStatusRecord::new(status, Some(self.local_id), self.state.status.version);
        self.apply_status(local).await;

        match self.transport.publish_call_status(status).await {
            Ok(()) => self.state.pending_writes.push_back(status),
            Err(e) => warn!("Failed to publish call status {}: {}", status, e),
        }
    }

    /// Consumes the relay's echo of a local write. Its effects already ran
    /// when the write was applied, so only the relay's version is adopted;
    /// the record itself is taken only when no newer local write is pending.
    fn absorb_echo(&mut self, record: CallStatusRecord) -> bool {
        if !record.written_by(&self.local_id) {
            return false;
        }
        let Some(pos) = self
            .state
            .pending_writes
            .iter()
            .position(|s| *s == record.status)
        else {
            return false;
        };

        self.state.pending_writes.drain(..=pos);
        if self.state.pending_writes.is_empty() {
            self.state.status = record;
        } else {
            self.state.status.version = record.version;
        }
        debug!("Relay confirmed {} as v{}", record.status, record.version);
        true
    }

    async fn handle_room_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Joined {
                presence,
                call_status,
            } => {
                info!("Joined room with {} present", presence);
                self.state.participant_count = presence;
                if call_status.is_newer_than(&self.state.status) {
                    self.apply_status(call_status).await;
                }
                self.ensure_local_media().await;
            }

            RoomEvent::RoomFull { presence } => {
                warn!("Room is full ({} present), leaving", presence);
                self.state.room_full = true;
                self.state.participant_count = presence;
                self.state.incoming_call = false;
                self.engine.end_call().await;
            }

            RoomEvent::Presence(count) => {
                self.state.participant_count = count;
            }

            RoomEvent::Signal(envelope) => {
                if self.state.room_full {
                    return;
                }
                self.engine.handle_signal(envelope).await;
            }

            RoomEvent::CallStatus(record) => {
                if !record.is_newer_than(&self.state.status) {
                    debug!(
                        "Dropping call status {} v{} (have v{})",
                        record.status, record.version, self.state.status.version
                    );
                    return;
                }
                if self.absorb_echo(record) {
                    return;
                }
                self.apply_status(record).await;
            }

            RoomEvent::Closed => {
                warn!("Room connection closed");
                self.room_open = false;
                self.state.participant_count = 0;
            }
        }
    }

    async fn apply_status(&mut self, record: CallStatusRecord) {
        let previous = self.state.status.status;
        self.state.status = record;

        match record.status {
            CallStatus::Ringing => {
                let remote = !record.written_by(&self.local_id);
                let new_episode = previous != CallStatus::Ringing;
                if remote && new_episode && !self.state.is_caller && !self.engine.in_call() {
                    info!("Incoming call");
                    self.state.incoming_call = true;
                    self.state.offer_sent_for_accepted = false;
                }
            }

            CallStatus::Accepted => {
                self.state.incoming_call = false;
                if self.state.is_caller && !self.state.offer_sent_for_accepted {
                    self.state.offer_sent_for_accepted = true;
                    if let Err(e) = self.engine.create_and_send_offer(false).await {
                        self.engine.record_error(format!("Failed to send offer: {e}"));
                    }
                }
            }

            CallStatus::Declined => {
                self.state.incoming_call = false;
                self.state.is_caller = false;
                self.state.offer_sent_for_accepted = false;
            }

            CallStatus::Ended => {
                self.state.incoming_call = false;
                self.state.is_caller = false;
                self.state.offer_sent_for_accepted = false;
                self.engine.end_call().await;
                self.ensure_local_media().await;
            }

            CallStatus::Idle => {}
        }
    }

    /// Keeps the camera preview available while this client is a member.
    async fn ensure_local_media(&mut self) {
        if self.state.room_full {
            return;
        }
        if let Err(e) = self.engine.acquire_media().await {
            self.engine
                .record_error(format!("Camera/microphone permission failed: {e}"));
        }
    }

    fn publish_view(&self) {
        let view = CallView {
            local_stream: self.engine.local_stream(),
            remote_stream: self.engine.remote_stream(),
            media_ready: self.engine.media_ready(),
            in_call: self.engine.in_call(),
            connection_state: self.engine.connection_state(),
            muted: self.engine.is_muted(),
            camera_off: self.engine.is_camera_off(),
            last_error: self.engine.last_error().map(String::from),
            participant_count: self.state.participant_count,
            call_status: self.state.status.status,
            room_full: self.state.room_full,
            incoming_call: self.state.incoming_call,
            is_caller: self.state.is_caller,
            can_call: self.can_call(),
            can_end: self.can_end(),
        };
        self.view_tx.send_replace(view);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
