//! PostgreSQL-backed `ActivityRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::Activity;
use crate::domain::ports::{ActivityRepository, ActivityRepositoryError};

use super::diesel_helpers::{StoreFailure, classify_diesel_error, classify_pool_error};
use super::models::ActivityRow;
use super::pool::DbPool;
use super::schema::activities;

fn map_failure(failure: StoreFailure) -> ActivityRepositoryError {
    match failure {
        StoreFailure::Connection(message) => ActivityRepositoryError::connection(message),
        StoreFailure::Query(message) => ActivityRepositoryError::query(message),
    }
}

/// Diesel-backed implementation of the append-only activity trail.
#[derive(Clone)]
pub struct DieselActivityRepository {
    pool: DbPool,
}

impl DieselActivityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for DieselActivityRepository {
    async fn append(&self, activity: &Activity) -> Result<(), ActivityRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        diesel::insert_into(activities::table)
            .values(ActivityRow::from(activity))
            .execute(&mut conn)
            .await
            .map_err(|e| map_failure(classify_diesel_error(e)))?;
        Ok(())
    }
}
