// Runtime configuration, read from the environment in the composition root.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use crate::modules::outbox::core::backoff::BackoffPolicy;
use crate::modules::outbox::relay::scheduler::RelayConfig;

#[derive(Debug, Clone)]
pub struct OutboxConfig {
    /// Batch size for each relay poll.
    pub batch_size: usize,
    /// Max publish attempts before marking Failed.
    pub max_attempts: u32,
    /// Initial backoff in milliseconds.
    pub initial_backoff_ms: u64,
    /// Exponential multiplier.
    pub backoff_multiplier: f64,
    /// Relay tick interval in milliseconds.
    pub relay_interval_ms: u64,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            max_attempts: 8,
            initial_backoff_ms: 500,
            backoff_multiplier: 2.0,
            relay_interval_ms: 1_000,
        }
    }
}

impl OutboxConfig {
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            batch_size: self.batch_size,
            interval: Duration::from_millis(self.relay_interval_ms),
            backoff: BackoffPolicy {
                initial_backoff: chrono::Duration::milliseconds(self.initial_backoff_ms as i64),
                multiplier: self.backoff_multiplier,
                max_attempts: self.max_attempts,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    /// Broker produce endpoint; absent means events are logged only.
    pub publisher_url: Option<String>,
    pub outbox: OutboxConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = OutboxConfig::default();
        Ok(Self {
            http_addr: env_or("HTTP_ADDR", "0.0.0.0:8080".parse()?)?,
            publisher_url: std::env::var("PUBLISHER_URL").ok(),
            outbox: OutboxConfig {
                batch_size: env_or("OUTBOX_BATCH_SIZE", defaults.batch_size)?,
                max_attempts: env_or("OUTBOX_MAX_ATTEMPTS", defaults.max_attempts)?,
                initial_backoff_ms: env_or(
                    "OUTBOX_INITIAL_BACKOFF_MS",
                    defaults.initial_backoff_ms,
                )?,
                backoff_multiplier: env_or(
                    "OUTBOX_BACKOFF_MULTIPLIER",
                    defaults.backoff_multiplier,
                )?,
                relay_interval_ms: env_or("OUTBOX_RELAY_INTERVAL_MS", defaults.relay_interval_ms)?,
            },
        })
    }
}

fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {name}: {raw}")),
        Err(_) => Ok(default),
    }
}
