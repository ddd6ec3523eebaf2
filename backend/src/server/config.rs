//! HTTP server configuration object.

use std::net::SocketAddr;

use backend::domain::AdminAllowList;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) admins: AdminAllowList,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) webhook_secret: Option<String>,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, admins: AdminAllowList) -> Self {
        Self {
            bind_addr,
            admins,
            db_pool: None,
            webhook_secret: None,
        }
    }

    /// Attach a database connection pool; without one the server falls back
    /// to the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: Option<DbPool>) -> Self {
        self.db_pool = pool;
        self
    }

    /// Attach the webhook shared secret.
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: Option<String>) -> Self {
        self.webhook_secret = secret;
        self
    }
}
