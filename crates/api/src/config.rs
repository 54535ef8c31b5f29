//! Process configuration read from the environment.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use crate::session::DEFAULT_IDLE_TTL_SECS;

pub const BIND_ADDR_VAR: &str = "STOCKROOM_BIND_ADDR";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const SESSION_IDLE_VAR: &str = "STOCKROOM_SESSION_IDLE_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value:?}")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var} must be a positive number of seconds: {value:?}")]
    InvalidIdleTtl { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Sessions untouched for longer than this are discarded.
    pub session_idle_ttl: Duration,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a closure over a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw = lookup(BIND_ADDR_VAR).unwrap_or_else(|| {
            tracing::info!("{BIND_ADDR_VAR} not set; using {DEFAULT_BIND_ADDR}");
            DEFAULT_BIND_ADDR.to_string()
        });

        let bind_addr = raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: raw.clone(),
            })?;

        let session_idle_ttl = match lookup(SESSION_IDLE_VAR) {
            None => Duration::seconds(i64::from(DEFAULT_IDLE_TTL_SECS)),
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(secs) if secs > 0 => Duration::seconds(i64::from(secs)),
                _ => {
                    return Err(ConfigError::InvalidIdleTtl {
                        var: SESSION_IDLE_VAR,
                        value: raw,
                    });
                }
            },
        };

        Ok(Self {
            bind_addr,
            session_idle_ttl,
        })
    }
}
