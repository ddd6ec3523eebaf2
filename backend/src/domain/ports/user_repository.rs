//! Driven port for user persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ClientId, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Result of an insert-if-absent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInsertOutcome {
    /// The record was created by this call.
    Inserted,
    /// A record with the same id already existed; nothing was written.
    AlreadyExists,
}

/// Port for storing and mutating user records.
///
/// Every mutation here touches exactly one record and must be atomic at that
/// granularity; cross-record consistency (for example with the activity
/// trail) is explicitly not this port's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by client id.
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<User>, UserRepositoryError>;

    /// Insert the record unless one with the same id exists. Concurrent
    /// first contacts therefore race benignly: the loser re-reads.
    async fn insert_if_absent(&self, user: &User)
    -> Result<UserInsertOutcome, UserRepositoryError>;

    /// Atomically add `delta` to the user's point balance.
    async fn increment_points(
        &self,
        id: &ClientId,
        delta: i64,
        now: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError>;

    /// Atomically record a daily claim: set the claim timestamp and add
    /// `points` in one write.
    async fn record_daily_claim(
        &self,
        id: &ClientId,
        claimed_at: DateTime<Utc>,
        points: i64,
    ) -> Result<(), UserRepositoryError>;

    /// Atomically deduct `points_cost` and mark the user pro until
    /// `pro_until` in one write.
    async fn grant_pro(
        &self,
        id: &ClientId,
        pro_until: DateTime<Utc>,
        points_cost: i64,
        now: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError>;

    /// Users ordered by points descending, ties broken by id ascending.
    async fn top_by_points(&self, limit: i64) -> Result<Vec<User>, UserRepositoryError>;
}
