//! PostgreSQL-backed `UserRepository` implementation using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserInsertOutcome, UserRepository, UserRepositoryError};
use crate::domain::{ClientId, User};

use super::diesel_helpers::{StoreFailure, classify_diesel_error, classify_pool_error};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

fn map_failure(failure: StoreFailure) -> UserRepositoryError {
    match failure {
        StoreFailure::Connection(message) => UserRepositoryError::connection(message),
        StoreFailure::Query(message) => UserRepositoryError::query(message),
    }
}

/// Diesel-backed implementation of the `UserRepository` port.
///
/// Single-row updates carry their whole effect in one statement, so each
/// mutation is atomic at row granularity without explicit transactions.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        let row: Option<UserRow> = users::table
            .find(id.as_str())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| map_failure(classify_diesel_error(e)))?;

        Ok(row.map(User::from))
    }

    async fn insert_if_absent(
        &self,
        user: &User,
    ) -> Result<UserInsertOutcome, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        let inserted = diesel::insert_into(users::table)
            .values(UserRow::from(user))
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|e| map_failure(classify_diesel_error(e)))?;

        Ok(if inserted == 0 {
            UserInsertOutcome::AlreadyExists
        } else {
            UserInsertOutcome::Inserted
        })
    }

    async fn increment_points(
        &self,
        id: &ClientId,
        delta: i64,
        now: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        diesel::update(users::table.find(id.as_str()))
            .set((
                users::points.eq(users::points + delta),
                users::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|e| map_failure(classify_diesel_error(e)))?;
        Ok(())
    }

    async fn record_daily_claim(
        &self,
        id: &ClientId,
        claimed_at: DateTime<Utc>,
        points: i64,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        diesel::update(users::table.find(id.as_str()))
            .set((
                users::daily_claimed_at.eq(Some(claimed_at)),
                users::points.eq(users::points + points),
                users::updated_at.eq(claimed_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(|e| map_failure(classify_diesel_error(e)))?;
        Ok(())
    }

    async fn grant_pro(
        &self,
        id: &ClientId,
        pro_until: DateTime<Utc>,
        points_cost: i64,
        now: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        diesel::update(users::table.find(id.as_str()))
            .set((
                users::points.eq(users::points - points_cost),
                users::is_pro.eq(true),
                users::pro_until.eq(Some(pro_until)),
                users::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|e| map_failure(classify_diesel_error(e)))?;
        Ok(())
    }

    async fn top_by_points(&self, limit: i64) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        let rows: Vec<UserRow> = users::table
            .order((users::points.desc(), users::id.asc()))
            .limit(limit)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_failure(classify_diesel_error(e)))?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::outbound::persistence::pool::PoolError;

    #[rstest]
    fn pool_failures_map_to_connection_errors() {
        let error = map_failure(classify_pool_error(PoolError::checkout("refused")));
        assert!(matches!(error, UserRepositoryError::Connection { .. }));
        assert!(error.to_string().contains("refused"));
    }

    #[rstest]
    fn diesel_failures_map_to_query_errors() {
        let error = map_failure(classify_diesel_error(diesel::result::Error::NotFound));
        assert!(matches!(error, UserRepositoryError::Query { .. }));
    }
}
