//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use walktalk::domain::Walker;
use walktalk::domain::ports::{NoOpNotificationGateway, NotificationGateway};
use walktalk::domain::{WalkCreationConfig, WalkJoinConfig};
use walktalk::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) gateway: Arc<dyn NotificationGateway>,
    pub(crate) creation: WalkCreationConfig,
    pub(crate) joins: WalkJoinConfig,
    pub(crate) sample_host: Option<Walker>,
}

impl ServerConfig {
    /// Configuration with the in-memory repository and no notifications.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            gateway: Arc::new(NoOpNotificationGateway),
            creation: WalkCreationConfig::default(),
            joins: WalkJoinConfig::default(),
            sample_host: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, walks are stored in PostgreSQL instead of in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn NotificationGateway>) -> Self {
        self.gateway = gateway;
        self
    }

    #[must_use]
    pub fn with_creation_config(mut self, creation: WalkCreationConfig) -> Self {
        self.creation = creation;
        self
    }

    #[must_use]
    pub fn with_join_config(mut self, joins: WalkJoinConfig) -> Self {
        self.joins = joins;
        self
    }

    /// Publish the sample walk hosted by `host` at startup when no walks exist.
    #[must_use]
    pub fn with_sample_host(mut self, host: Walker) -> Self {
        self.sample_host = Some(host);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
