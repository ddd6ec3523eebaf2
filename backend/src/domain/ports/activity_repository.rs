//! Driven port for the append-only activity trail.

use async_trait::async_trait;

use crate::domain::Activity;

use super::define_port_error;

define_port_error! {
    /// Errors raised by activity repository adapters.
    pub enum ActivityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "activity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "activity repository query failed: {message}",
    }
}

/// Port for appending audit records. Records are never mutated or deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append an audit record.
    async fn append(&self, activity: &Activity) -> Result<(), ActivityRepositoryError>;
}
