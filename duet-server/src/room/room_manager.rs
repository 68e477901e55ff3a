use crate::room::{Room, RoomCommand, RoomConfig};
use crate::signaling::SignalingOutput;
use dashmap::DashMap;
use duet_core::RoomName;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<DashMap<RoomName, mpsc::Sender<RoomCommand>>>,
    config: RoomConfig,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomManager {
    pub fn new(config: RoomConfig, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            config,
            signaling,
        }
    }

    /// Sender of the room's actor, spawning the actor on first use.
    pub fn get_room_sender(&self, room: &RoomName) -> mpsc::Sender<RoomCommand> {
        self.rooms
            .entry(room.clone())
            .or_insert_with(|| {
                info!("Creating new room: {}", room);
                let (tx, rx) = mpsc::channel(100);
                let actor = Room::new(room.clone(), self.config.clone(), rx, self.signaling.clone());
                tokio::spawn(actor.run());
                tx
            })
            .clone()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
