//! Driven port for marker persistence.

use async_trait::async_trait;

use crate::domain::{ClientId, Marker, MarkerId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by marker repository adapters.
    pub enum MarkerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "marker repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "marker repository query failed: {message}",
    }
}

/// Result of a confirmation write, carrying the marker as stored afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// The caller was appended and the count incremented.
    Recorded(Marker),
    /// The caller had already confirmed this marker; nothing was written.
    Duplicate(Marker),
}

impl ConfirmOutcome {
    /// The marker as stored after the operation, whichever branch was taken.
    pub fn into_marker(self) -> Marker {
        match self {
            Self::Recorded(marker) | Self::Duplicate(marker) => marker,
        }
    }
}

/// Port for storing markers and recording confirmations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarkerRepository: Send + Sync {
    /// Persist a marker.
    async fn insert(&self, marker: &Marker) -> Result<(), MarkerRepositoryError>;

    /// Fetch a marker by id.
    async fn find_by_id(&self, id: &MarkerId) -> Result<Option<Marker>, MarkerRepositoryError>;

    /// Active markers, optionally filtered to a set of types, capped at
    /// `limit`.
    async fn list_active(
        &self,
        kinds: Option<Vec<String>>,
        limit: i64,
    ) -> Result<Vec<Marker>, MarkerRepositoryError>;

    /// Atomically append `user_id` to the marker's confirmation set and bump
    /// the count, deduplicating per user. Returns `None` when the marker
    /// does not exist.
    async fn add_confirmation(
        &self,
        id: &MarkerId,
        user_id: &ClientId,
    ) -> Result<Option<ConfirmOutcome>, MarkerRepositoryError>;
}
