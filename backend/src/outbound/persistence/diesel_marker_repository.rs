//! PostgreSQL-backed `MarkerRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ConfirmOutcome, MarkerRepository, MarkerRepositoryError};
use crate::domain::{ClientId, Marker, MarkerId, MarkerStatus};

use super::diesel_helpers::{StoreFailure, classify_diesel_error, classify_pool_error};
use super::models::MarkerRow;
use super::pool::DbPool;
use super::schema::markers;

fn map_failure(failure: StoreFailure) -> MarkerRepositoryError {
    match failure {
        StoreFailure::Connection(message) => MarkerRepositoryError::connection(message),
        StoreFailure::Query(message) => MarkerRepositoryError::query(message),
    }
}

/// Diesel-backed implementation of the `MarkerRepository` port.
///
/// The confirmation write is a row-scoped read-modify-write; it runs inside
/// a transaction with `FOR UPDATE` so two concurrent confirmations by the
/// same caller cannot both pass the dedup check.
#[derive(Clone)]
pub struct DieselMarkerRepository {
    pool: DbPool,
}

impl DieselMarkerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarkerRepository for DieselMarkerRepository {
    async fn insert(&self, marker: &Marker) -> Result<(), MarkerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        diesel::insert_into(markers::table)
            .values(MarkerRow::from(marker))
            .execute(&mut conn)
            .await
            .map_err(|e| map_failure(classify_diesel_error(e)))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &MarkerId) -> Result<Option<Marker>, MarkerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        let row: Option<MarkerRow> = markers::table
            .find(id.as_uuid())
            .select(MarkerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| map_failure(classify_diesel_error(e)))?;

        Ok(row.map(Marker::from))
    }

    async fn list_active(
        &self,
        kinds: Option<Vec<String>>,
        limit: i64,
    ) -> Result<Vec<Marker>, MarkerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        let mut query = markers::table
            .filter(markers::status.eq(MarkerStatus::Active.as_str()))
            .into_boxed();
        if let Some(kinds) = kinds {
            query = query.filter(markers::kind.eq_any(kinds));
        }

        let rows: Vec<MarkerRow> = query
            .order(markers::created_at.asc())
            .limit(limit)
            .select(MarkerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_failure(classify_diesel_error(e)))?;

        Ok(rows.into_iter().map(Marker::from).collect())
    }

    async fn add_confirmation(
        &self,
        id: &MarkerId,
        user_id: &ClientId,
    ) -> Result<Option<ConfirmOutcome>, MarkerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_failure(classify_pool_error(e)))?;

        let marker_id = *id.as_uuid();
        let confirmer = user_id.as_str().to_owned();

        let outcome = conn
            .transaction::<Option<ConfirmOutcome>, diesel::result::Error, _>(|conn| {
                async move {
                    let row: Option<MarkerRow> = markers::table
                        .find(marker_id)
                        .for_update()
                        .select(MarkerRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;

                    let Some(row) = row else {
                        return Ok(None);
                    };

                    if row.confirmations_by.iter().any(|by| *by == confirmer) {
                        return Ok(Some(ConfirmOutcome::Duplicate(Marker::from(row))));
                    }

                    let mut confirmations_by = row.confirmations_by.clone();
                    confirmations_by.push(confirmer);

                    let updated: MarkerRow = diesel::update(markers::table.find(marker_id))
                        .set((
                            markers::confirmations.eq(row.confirmations + 1),
                            markers::confirmations_by.eq(confirmations_by),
                        ))
                        .returning(MarkerRow::as_returning())
                        .get_result(conn)
                        .await?;

                    Ok(Some(ConfirmOutcome::Recorded(Marker::from(updated))))
                }
                .scope_boxed()
            })
            .await
            .map_err(|e| map_failure(classify_diesel_error(e)))?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::outbound::persistence::pool::PoolError;

    #[rstest]
    fn failures_map_into_the_port_error() {
        let connection = map_failure(classify_pool_error(PoolError::build("bad url")));
        assert!(matches!(connection, MarkerRepositoryError::Connection { .. }));

        let query = map_failure(classify_diesel_error(diesel::result::Error::NotFound));
        assert!(matches!(query, MarkerRepositoryError::Query { .. }));
    }
}
