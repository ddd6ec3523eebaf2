//! Driving port for the points/activity ledger.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{ActivityKind, ClientId, Error};

/// Records point-earning events.
///
/// `award` issues two writes (activity append, balance increment) with no
/// shared transaction: a crash between them leaves an activity recorded with
/// no balance change, or vice versa. This inconsistency window is accepted
/// and documented rather than silently repaired.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLedger: Send + Sync {
    /// Append an activity record, then add `points` to the user's balance.
    async fn award(
        &self,
        user_id: &ClientId,
        kind: ActivityKind,
        points: i64,
        meta: Option<Value>,
    ) -> Result<(), Error>;

    /// Append an activity record without touching the balance, for flows
    /// whose balance change already happened atomically elsewhere.
    async fn append(
        &self,
        user_id: &ClientId,
        kind: ActivityKind,
        points: i64,
        meta: Option<Value>,
    ) -> Result<(), Error>;
}
