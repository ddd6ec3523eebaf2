//! Marker domain services: submission, listing, detail, and interactions.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::activity::{
    COMMENT_POINTS, MARKER_CONFIRM_POINTS, MARKER_CREATE_POINTS, RATING_POINTS,
};
use crate::domain::interaction::rating_average;
use crate::domain::ports::{
    ActivityLedger, CommentRepository, CommentRepositoryError, ConfirmOutcome,
    MARKER_DETAIL_LIMIT, MARKER_LIST_LIMIT, MarkerCommand, MarkerDetail, MarkerQuery,
    MarkerRepository, MarkerRepositoryError, RatingRepository, RatingRepositoryError,
};
use crate::domain::{
    ActivityKind, ClientId, Comment, Error, Marker, MarkerDraft, MarkerId, Rating,
};

fn map_marker_error(error: MarkerRepositoryError) -> Error {
    match error {
        MarkerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("marker repository unavailable: {message}"))
        }
        MarkerRepositoryError::Query { message } => {
            Error::internal(format!("marker repository error: {message}"))
        }
    }
}

fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
    }
}

fn map_rating_error(error: RatingRepositoryError) -> Error {
    match error {
        RatingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rating repository unavailable: {message}"))
        }
        RatingRepositoryError::Query { message } => {
            Error::internal(format!("rating repository error: {message}"))
        }
    }
}

fn marker_not_found(id: &MarkerId) -> Error {
    Error::not_found(format!("marker {id} not found"))
}

fn marker_meta(id: &MarkerId) -> serde_json::Value {
    json!({ "markerId": id.to_string() })
}

/// Marker service implementing the command and query driving ports.
#[derive(Clone)]
pub struct MarkersService<M, C, R> {
    markers: Arc<M>,
    comments: Arc<C>,
    ratings: Arc<R>,
    ledger: Arc<dyn ActivityLedger>,
    clock: Arc<dyn Clock>,
}

impl<M, C, R> MarkersService<M, C, R> {
    /// Create the service over the marker, comment, and rating repositories.
    pub fn new(
        markers: Arc<M>,
        comments: Arc<C>,
        ratings: Arc<R>,
        ledger: Arc<dyn ActivityLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            markers,
            comments,
            ratings,
            ledger,
            clock,
        }
    }
}

impl<M, C, R> MarkersService<M, C, R>
where
    M: MarkerRepository,
{
    /// Load the marker or fail with NotFound before any side effect runs.
    async fn require_marker(&self, id: &MarkerId) -> Result<Marker, Error> {
        self.markers
            .find_by_id(id)
            .await
            .map_err(map_marker_error)?
            .ok_or_else(|| marker_not_found(id))
    }
}

#[async_trait]
impl<M, C, R> MarkerCommand for MarkersService<M, C, R>
where
    M: MarkerRepository,
    C: CommentRepository,
    R: RatingRepository,
{
    async fn create(&self, created_by: &ClientId, draft: MarkerDraft) -> Result<Marker, Error> {
        let marker = Marker::new(draft, created_by.clone(), self.clock.utc());
        self.markers
            .insert(&marker)
            .await
            .map_err(map_marker_error)?;
        self.ledger
            .award(
                created_by,
                ActivityKind::CreateMarker,
                MARKER_CREATE_POINTS,
                Some(marker_meta(&marker.id)),
            )
            .await?;
        Ok(marker)
    }

    async fn confirm(&self, id: &MarkerId, user_id: &ClientId) -> Result<Marker, Error> {
        let outcome = self
            .markers
            .add_confirmation(id, user_id)
            .await
            .map_err(map_marker_error)?
            .ok_or_else(|| marker_not_found(id))?;

        match outcome {
            ConfirmOutcome::Recorded(marker) => {
                self.ledger
                    .award(
                        user_id,
                        ActivityKind::Confirm,
                        MARKER_CONFIRM_POINTS,
                        Some(marker_meta(id)),
                    )
                    .await?;
                Ok(marker)
            }
            // Repeat confirmations are a silent no-op: no award, no activity.
            ConfirmOutcome::Duplicate(marker) => Ok(marker),
        }
    }

    async fn comment(
        &self,
        id: &MarkerId,
        user_id: &ClientId,
        text: String,
    ) -> Result<Comment, Error> {
        self.require_marker(id).await?;

        let comment = Comment::new(*id, user_id.clone(), text, self.clock.utc());
        self.comments
            .insert(&comment)
            .await
            .map_err(map_comment_error)?;
        self.ledger
            .award(
                user_id,
                ActivityKind::Comment,
                COMMENT_POINTS,
                Some(marker_meta(id)),
            )
            .await?;
        Ok(comment)
    }

    async fn rate(&self, id: &MarkerId, user_id: &ClientId, value: i32) -> Result<Rating, Error> {
        self.require_marker(id).await?;

        let candidate = Rating::new(*id, user_id.clone(), value, self.clock.utc());
        let upsert = self
            .ratings
            .upsert(&candidate)
            .await
            .map_err(map_rating_error)?;

        if upsert.created {
            self.ledger
                .award(
                    user_id,
                    ActivityKind::Rate,
                    RATING_POINTS,
                    Some(marker_meta(id)),
                )
                .await?;
        }
        Ok(upsert.rating)
    }
}

#[async_trait]
impl<M, C, R> MarkerQuery for MarkersService<M, C, R>
where
    M: MarkerRepository,
    C: CommentRepository,
    R: RatingRepository,
{
    async fn list(&self, kinds: Option<Vec<String>>) -> Result<Vec<Marker>, Error> {
        self.markers
            .list_active(kinds, MARKER_LIST_LIMIT)
            .await
            .map_err(map_marker_error)
    }

    async fn detail(&self, id: &MarkerId, caller: &ClientId) -> Result<MarkerDetail, Error> {
        let marker = self.require_marker(id).await?;

        let comments = self
            .comments
            .list_for_marker(id, MARKER_DETAIL_LIMIT)
            .await
            .map_err(map_comment_error)?;
        let ratings = self
            .ratings
            .list_for_marker(id, MARKER_DETAIL_LIMIT)
            .await
            .map_err(map_rating_error)?;

        let rating_avg = rating_average(&ratings);
        let my_rating = ratings.iter().find(|r| &r.user_id == caller).cloned();

        Ok(MarkerDetail {
            marker,
            comments,
            rating_avg,
            my_rating,
        })
    }
}
