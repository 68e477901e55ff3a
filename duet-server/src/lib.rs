mod config;
mod room;
mod signaling;

pub use config::ServerConfig;
pub use room::*;
pub use signaling::*;

use axum::Router;
use axum::routing::get;

/// Shared state handed to every axum handler.
#[derive(Clone)]
pub struct AppState {
    pub signaling: SignalingService,
    pub rooms: RoomManager,
}

impl AppState {
    pub fn new(config: RoomConfig) -> Self {
        let signaling = SignalingService::new();
        let rooms = RoomManager::new(config, std::sync::Arc::new(signaling.clone()));
        Self { signaling, rooms }
    }
}

/// Routes served by the relay.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/rooms/{room}/{client_id}", get(ws_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}
