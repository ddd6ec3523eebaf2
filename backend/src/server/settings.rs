//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `WAYMARK_`-prefixed environment variables, or
//! a configuration file, in that precedence order.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use backend::domain::AdminAllowList;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Deployment configuration for the Waymark backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WAYMARK")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Comma-separated client ids granted the admin role at first contact.
    pub admin_client_ids: Option<String>,
    /// Shared secret for webhook delivery signatures; unset disables the
    /// check.
    pub webhook_secret: Option<String>,
}

impl AppSettings {
    /// Parse the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// The configured admin allow-list.
    pub fn admin_allow_list(&self) -> AdminAllowList {
        AdminAllowList::new(
            self.admin_client_ids
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(str::trim),
        )
    }
}
