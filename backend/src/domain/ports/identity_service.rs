//! Driving port for caller identity resolution.

use async_trait::async_trait;

use crate::domain::{ClientId, Error, User};

/// Resolve a caller to a user record, creating one on first contact.
///
/// Every request runs through this port before its domain operation, so the
/// user record exists by the time any other port is consulted.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Return the existing user unchanged, or create one with the signup
    /// bonus and a role fixed from the admin allow-list.
    async fn resolve_or_create(&self, client_id: &ClientId) -> Result<User, Error>;
}
