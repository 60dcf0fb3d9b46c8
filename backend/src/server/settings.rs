//! Application settings loaded via OrthoConfig.
//!
//! Values merge from CLI flags, `WALKTALK_*` environment variables and an
//! optional config file. Accessors fall back to the documented defaults.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use walktalk::domain::{DEFAULT_WALK_CAPACITY, WalkCreationConfig, WalkJoinConfig};

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_JOIN_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_JOIN_RETRY_BACKOFF_MS: u64 = 25;
const DEFAULT_SAMPLE_HOST_NAME: &str = "WalkTalk";
const DEFAULT_SAMPLE_HOST_EMAIL: &str = "hello@walktalk.example";

/// Process settings for the WalkTalk server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WALKTALK")]
pub struct AppSettings {
    /// HTTP listen address.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Absent selects the in-memory repository.
    pub database_url: Option<String>,
    /// Connection pool size.
    pub db_max_connections: Option<u32>,
    /// Notification webhook. Absent disables delivery.
    pub webhook_url: Option<String>,
    /// Upper bound on one notification delivery.
    pub notification_timeout_ms: Option<u64>,
    /// Capacity assigned to new walks.
    pub walk_capacity: Option<u32>,
    /// Admission attempts under contention.
    pub join_max_attempts: Option<u32>,
    /// Base backoff between contended attempts.
    pub join_retry_backoff_ms: Option<u64>,
    /// Insert the sample walk when no walks exist.
    #[ortho_config(default = false)]
    pub seed_sample_walk: bool,
    /// Display name of the sample walk host.
    pub sample_host_name: Option<String>,
    /// Email of the sample walk host.
    pub sample_host_email: Option<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Webhook URL, ignoring blank values.
    pub fn webhook_url(&self) -> Option<&str> {
        non_blank(self.webhook_url.as_deref())
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(
            self.notification_timeout_ms
                .unwrap_or(DEFAULT_NOTIFICATION_TIMEOUT_MS),
        )
    }

    /// Walk creation settings for [`walktalk::domain::WalkService`].
    pub fn creation_config(&self) -> WalkCreationConfig {
        WalkCreationConfig {
            capacity: self.walk_capacity.unwrap_or(DEFAULT_WALK_CAPACITY),
        }
    }

    /// Admission settings for [`walktalk::domain::WalkJoinService`].
    pub fn join_config(&self) -> WalkJoinConfig {
        WalkJoinConfig {
            max_attempts: self
                .join_max_attempts
                .unwrap_or(DEFAULT_JOIN_MAX_ATTEMPTS)
                .max(1),
            retry_backoff: Duration::from_millis(
                self.join_retry_backoff_ms
                    .unwrap_or(DEFAULT_JOIN_RETRY_BACKOFF_MS),
            ),
            notification_timeout: self.notification_timeout(),
        }
    }

    pub fn sample_host_name(&self) -> &str {
        non_blank(self.sample_host_name.as_deref()).unwrap_or(DEFAULT_SAMPLE_HOST_NAME)
    }

    pub fn sample_host_email(&self) -> &str {
        non_blank(self.sample_host_email.as_deref()).unwrap_or(DEFAULT_SAMPLE_HOST_EMAIL)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
