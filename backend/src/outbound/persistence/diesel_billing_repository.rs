//! PostgreSQL-backed payment and subscription repositories using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::Value;

use crate::domain::ports::{
    PaymentRepository, PaymentRepositoryError, SubscriptionRepository,
    SubscriptionRepositoryError,
};
use crate::domain::{
    ClientId, Payment, PaymentId, PaymentStatus, Subscription, SubscriptionStatus,
};

use super::diesel_helpers::{StoreFailure, classify_diesel_error, classify_pool_error};
use super::models::{PaymentRow, SubscriptionRow};
use super::pool::DbPool;
use super::schema::{payments, subscriptions};

fn map_payment_failure(failure: StoreFailure) -> PaymentRepositoryError {
    match failure {
        StoreFailure::Connection(message) => PaymentRepositoryError::connection(message),
        StoreFailure::Query(message) => PaymentRepositoryError::query(message),
    }
}

fn map_subscription_failure(failure: StoreFailure) -> SubscriptionRepositoryError {
    match failure {
        StoreFailure::Connection(message) => SubscriptionRepositoryError::connection(message),
        StoreFailure::Query(message) => SubscriptionRepositoryError::query(message),
    }
}

/// Diesel-backed implementation of the `PaymentRepository` port.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_payment_failure(classify_pool_error(e)))?;

        diesel::insert_into(payments::table)
            .values(PaymentRow::from(payment))
            .execute(&mut conn)
            .await
            .map_err(|e| map_payment_failure(classify_diesel_error(e)))?;
        Ok(())
    }

    async fn update_status(
        &self,
        id: &PaymentId,
        status: PaymentStatus,
        meta: Option<Value>,
        now: DateTime<Utc>,
    ) -> Result<bool, PaymentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_payment_failure(classify_pool_error(e)))?;

        let updated = diesel::update(payments::table.find(id.as_uuid()))
            .set((
                payments::status.eq(status.as_str().to_owned()),
                payments::meta.eq(meta),
                payments::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|e| map_payment_failure(classify_diesel_error(e)))?;

        Ok(updated > 0)
    }
}

/// Diesel-backed implementation of the `SubscriptionRepository` port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn insert(
        &self,
        subscription: &Subscription,
    ) -> Result<(), SubscriptionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_subscription_failure(classify_pool_error(e)))?;

        diesel::insert_into(subscriptions::table)
            .values(SubscriptionRow::from(subscription))
            .execute(&mut conn)
            .await
            .map_err(|e| map_subscription_failure(classify_diesel_error(e)))?;
        Ok(())
    }

    async fn find_active_for_user(
        &self,
        user_id: &ClientId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_subscription_failure(classify_pool_error(e)))?;

        // Multiple active subscriptions are possible; the newest wins.
        let row: Option<SubscriptionRow> = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id.as_str()))
            .filter(subscriptions::status.eq(SubscriptionStatus::Active.as_str()))
            .order(subscriptions::created_at.desc())
            .select(SubscriptionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| map_subscription_failure(classify_diesel_error(e)))?;

        Ok(row.map(Subscription::from))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::outbound::persistence::pool::PoolError;

    #[rstest]
    fn failures_map_into_their_port_errors() {
        let payment = map_payment_failure(classify_pool_error(PoolError::checkout("refused")));
        assert!(matches!(payment, PaymentRepositoryError::Connection { .. }));

        let subscription =
            map_subscription_failure(classify_diesel_error(diesel::result::Error::NotFound));
        assert!(matches!(
            subscription,
            SubscriptionRepositoryError::Query { .. }
        ));
    }
}
