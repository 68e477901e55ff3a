use crate::engine::EngineConfig;
use crate::media::MediaConstraints;
use anyhow::{Context, Result};
use duet_core::utils::DEFAULT_STUN_SERVERS;
use duet_core::{IceServerConfig, RoomName};
use std::env;
use std::time::Duration;

/// Client settings, read from `DUET_*` environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base WebSocket URL of the relay, e.g. `ws://127.0.0.1:3000`.
    pub server_url: String,
    pub room: RoomName,
    pub extra_stun_urls: Vec<String>,
    /// Delay before the follow-up check of a reconnection attempt.
    pub reconnect_delay: Duration,
    pub constraints: MediaConstraints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:3000".to_owned(),
            room: RoomName::default(),
            extra_stun_urls: Vec::new(),
            reconnect_delay: Duration::from_secs(5),
            constraints: MediaConstraints::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("DUET_SIGNAL_URL") {
            config.server_url = url;
        }
        if let Ok(room) = env::var("DUET_ROOM") {
            config.room = RoomName::from(room);
        }
        if let Ok(urls) = env::var("DUET_EXTRA_STUN_URLS") {
            config.extra_stun_urls = parse_url_list(&urls);
        }
        if let Ok(ms) = env::var("DUET_RECONNECT_DELAY_MS") {
            let ms: u64 = ms
                .parse()
                .with_context(|| format!("DUET_RECONNECT_DELAY_MS is not a number: {ms}"))?;
            config.reconnect_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Relay endpoint for this client in the configured room.
    pub fn room_url(&self, client_id: &duet_core::ClientId) -> String {
        format!(
            "{}/rooms/{}/{}",
            self.server_url.trim_end_matches('/'),
            self.room,
            client_id
        )
    }

    /// One STUN entry: the static defaults followed by the extra urls, with
    /// duplicates removed.
    pub fn ice_servers(&self) -> Vec<IceServerConfig> {
        let mut urls: Vec<String> = Vec::new();
        let all = DEFAULT_STUN_SERVERS
            .iter()
            .map(|s| s.to_string())
            .chain(self.extra_stun_urls.iter().cloned());
        for url in all {
            if !urls.contains(&url) {
                urls.push(url);
            }
        }

        vec![IceServerConfig {
            urls,
            username: None,
            credential: None,
        }]
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            reconnect_delay: self.reconnect_delay,
            constraints: self.constraints.clone(),
        }
    }
}

fn parse_url_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
