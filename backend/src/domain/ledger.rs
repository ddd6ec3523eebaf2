//! Points/activity ledger service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;

use crate::domain::ports::{
    ActivityLedger, ActivityRepository, ActivityRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{Activity, ActivityKind, ClientId, Error};

fn map_activity_error(error: ActivityRepositoryError) -> Error {
    match error {
        ActivityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("activity repository unavailable: {message}"))
        }
        ActivityRepositoryError::Query { message } => {
            Error::internal(format!("activity repository error: {message}"))
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Ledger writing the audit trail and the point balance.
///
/// The append and the increment are two independent single-entity writes; see
/// the [`ActivityLedger`] port docs for the accepted inconsistency window.
#[derive(Clone)]
pub struct PointsLedger<A, U> {
    activities: Arc<A>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<A, U> PointsLedger<A, U> {
    /// Create a new ledger over the given repositories.
    pub fn new(activities: Arc<A>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            activities,
            users,
            clock,
        }
    }
}

impl<A, U> PointsLedger<A, U>
where
    A: ActivityRepository,
    U: UserRepository,
{
    async fn append_record(
        &self,
        user_id: &ClientId,
        kind: ActivityKind,
        points: i64,
        meta: Option<Value>,
    ) -> Result<(), Error> {
        let activity = Activity::new(user_id.clone(), kind, points, meta, self.clock.utc());
        self.activities
            .append(&activity)
            .await
            .map_err(map_activity_error)
    }
}

#[async_trait]
impl<A, U> ActivityLedger for PointsLedger<A, U>
where
    A: ActivityRepository,
    U: UserRepository,
{
    async fn award(
        &self,
        user_id: &ClientId,
        kind: ActivityKind,
        points: i64,
        meta: Option<Value>,
    ) -> Result<(), Error> {
        self.append_record(user_id, kind, points, meta).await?;
        self.users
            .increment_points(user_id, points, self.clock.utc())
            .await
            .map_err(map_user_error)
    }

    async fn append(
        &self,
        user_id: &ClientId,
        kind: ActivityKind,
        points: i64,
        meta: Option<Value>,
    ) -> Result<(), Error> {
        self.append_record(user_id, kind, points, meta).await
    }
}
