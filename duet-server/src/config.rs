use crate::room::RoomConfig;
use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

/// Relay settings, read from `DUET_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub room: RoomConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            room: RoomConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = env::var("DUET_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("DUET_BIND_ADDR is not a socket address: {addr}"))?;
        }
        if let Ok(max) = env::var("DUET_MAX_MEMBERS") {
            config.room.max_members = max
                .parse()
                .with_context(|| format!("DUET_MAX_MEMBERS is not a number: {max}"))?;
        }
        if let Ok(durable) = env::var("DUET_DURABLE_BACKLOG") {
            config.room.durable_backlog = parse_flag(&durable)
                .with_context(|| format!("DUET_DURABLE_BACKLOG is not a boolean: {durable}"))?;
        }
        if let Ok(capacity) = env::var("DUET_BACKLOG_CAPACITY") {
            config.room.backlog_capacity = capacity
                .parse()
                .with_context(|| format!("DUET_BACKLOG_CAPACITY is not a number: {capacity}"))?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
