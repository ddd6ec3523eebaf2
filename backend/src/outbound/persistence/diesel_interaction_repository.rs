//! PostgreSQL-backed comment and rating repositories using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, RatingRepository, RatingRepositoryError,
    RatingUpsert,
};
use crate::domain::{Comment, MarkerId, Rating};

use super::diesel_helpers::{StoreFailure, classify_diesel_error, classify_pool_error};
use super::models::{CommentRow, RatingRow};
use super::pool::DbPool;
use super::schema::{comments, ratings};

fn map_comment_failure(failure: StoreFailure) -> CommentRepositoryError {
    match failure {
        StoreFailure::Connection(message) => CommentRepositoryError::connection(message),
        StoreFailure::Query(message) => CommentRepositoryError::query(message),
    }
}

fn map_rating_failure(failure: StoreFailure) -> RatingRepositoryError {
    match failure {
        StoreFailure::Connection(message) => RatingRepositoryError::connection(message),
        StoreFailure::Query(message) => RatingRepositoryError::query(message),
    }
}

/// Diesel-backed implementation of the `CommentRepository` port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_comment_failure(classify_pool_error(e)))?;

        diesel::insert_into(comments::table)
            .values(CommentRow::from(comment))
            .execute(&mut conn)
            .await
            .map_err(|e| map_comment_failure(classify_diesel_error(e)))?;
        Ok(())
    }

    async fn list_for_marker(
        &self,
        marker_id: &MarkerId,
        limit: i64,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_comment_failure(classify_pool_error(e)))?;

        let rows: Vec<CommentRow> = comments::table
            .filter(comments::marker_id.eq(marker_id.as_uuid()))
            .order(comments::created_at.asc())
            .limit(limit)
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_comment_failure(classify_diesel_error(e)))?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}

/// Diesel-backed implementation of the `RatingRepository` port.
///
/// The upsert leans on the `(marker_id, user_id)` unique constraint: an
/// insert conflict turns into an in-place value overwrite, and the stored
/// row keeping its original id tells the two cases apart.
#[derive(Clone)]
pub struct DieselRatingRepository {
    pool: DbPool,
}

impl DieselRatingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for DieselRatingRepository {
    async fn upsert(&self, candidate: &Rating) -> Result<RatingUpsert, RatingRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_rating_failure(classify_pool_error(e)))?;

        let row = RatingRow::from(candidate);
        let stored: RatingRow = diesel::insert_into(ratings::table)
            .values(&row)
            .on_conflict((ratings::marker_id, ratings::user_id))
            .do_update()
            .set(ratings::value.eq(row.value))
            .returning(RatingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| map_rating_failure(classify_diesel_error(e)))?;

        let created = stored.id == row.id;
        Ok(RatingUpsert {
            rating: Rating::from(stored),
            created,
        })
    }

    async fn list_for_marker(
        &self,
        marker_id: &MarkerId,
        limit: i64,
    ) -> Result<Vec<Rating>, RatingRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_rating_failure(classify_pool_error(e)))?;

        let rows: Vec<RatingRow> = ratings::table
            .filter(ratings::marker_id.eq(marker_id.as_uuid()))
            .order(ratings::created_at.asc())
            .limit(limit)
            .select(RatingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_rating_failure(classify_diesel_error(e)))?;

        Ok(rows.into_iter().map(Rating::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::outbound::persistence::pool::PoolError;

    #[rstest]
    fn failures_map_into_their_port_errors() {
        let comment = map_comment_failure(classify_pool_error(PoolError::checkout("refused")));
        assert!(matches!(comment, CommentRepositoryError::Connection { .. }));

        let rating = map_rating_failure(classify_diesel_error(diesel::result::Error::NotFound));
        assert!(matches!(rating, RatingRepositoryError::Query { .. }));
    }
}
