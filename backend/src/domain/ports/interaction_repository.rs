//! Driven ports for marker comments and ratings.

use async_trait::async_trait;

use crate::domain::{Comment, MarkerId, Rating};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "comment repository query failed: {message}",
    }
}

/// Port for storing immutable marker comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a comment.
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// Comments attached to a marker, capped at `limit`.
    async fn list_for_marker(
        &self,
        marker_id: &MarkerId,
        limit: i64,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;
}

define_port_error! {
    /// Errors raised by rating repository adapters.
    pub enum RatingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "rating repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "rating repository query failed: {message}",
    }
}

/// Result of a rating upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingUpsert {
    /// The rating as stored after the operation. On an update this keeps the
    /// original row's id and creation time with the new value.
    pub rating: Rating,
    /// Whether this call created the (marker, user) pair's first rating.
    pub created: bool,
}

/// Port for upserting and reading ratings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Insert `candidate` unless the (marker, user) pair is already rated, in
    /// which case only the value is overwritten in place.
    async fn upsert(&self, candidate: &Rating) -> Result<RatingUpsert, RatingRepositoryError>;

    /// Ratings attached to a marker, capped at `limit`.
    async fn list_for_marker(
        &self,
        marker_id: &MarkerId,
        limit: i64,
    ) -> Result<Vec<Rating>, RatingRepositoryError>;
}
