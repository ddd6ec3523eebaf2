//! Driving ports for marker commands and queries.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ClientId, Comment, Error, Marker, MarkerDraft, MarkerId, Rating};

/// Upper bound on markers returned by a listing query.
pub const MARKER_LIST_LIMIT: i64 = 1_000;
/// Upper bound on comments and ratings loaded for a marker detail view.
pub const MARKER_DETAIL_LIMIT: i64 = 100;

/// Detail view of one marker with its interactions.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDetail {
    pub marker: Marker,
    pub comments: Vec<Comment>,
    /// Arithmetic mean of all rating values; absent when no ratings exist.
    pub rating_avg: Option<f64>,
    /// The caller's own rating, if present.
    pub my_rating: Option<Rating>,
}

/// Driving port for marker mutations.
#[async_trait]
pub trait MarkerCommand: Send + Sync {
    /// Create a pending marker and award the submission points.
    async fn create(&self, created_by: &ClientId, draft: MarkerDraft) -> Result<Marker, Error>;

    /// Confirm a marker, idempotently per caller. Only a first confirmation
    /// increments the count and awards points.
    async fn confirm(&self, id: &MarkerId, user_id: &ClientId) -> Result<Marker, Error>;

    /// Attach a comment and award the comment points.
    async fn comment(
        &self,
        id: &MarkerId,
        user_id: &ClientId,
        text: String,
    ) -> Result<Comment, Error>;

    /// Upsert the caller's rating. Only the first rating of the pair awards
    /// points and records an activity.
    async fn rate(&self, id: &MarkerId, user_id: &ClientId, value: i32) -> Result<Rating, Error>;
}

/// Driving port for marker reads.
#[async_trait]
pub trait MarkerQuery: Send + Sync {
    /// Active markers, optionally filtered to a set of types.
    async fn list(&self, kinds: Option<Vec<String>>) -> Result<Vec<Marker>, Error>;

    /// Detail view for one marker, including the caller's own rating.
    async fn detail(&self, id: &MarkerId, caller: &ClientId) -> Result<MarkerDetail, Error>;
}
