//! Driving port for user-scoped commands.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ClientId, Error};

/// Result of a daily claim attempt.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyClaimOutcome {
    /// Whether this call granted the daily points.
    pub ok: bool,
    /// The balance after the call.
    pub points: i64,
    /// Timestamp of the most recent successful claim, if any.
    pub daily_claimed_at: Option<DateTime<Utc>>,
}

/// Driving port for the once-per-day point claim.
#[async_trait]
pub trait DailyClaimCommand: Send + Sync {
    /// Grant the fixed daily points iff the last claim's UTC calendar date
    /// differs from today's; otherwise report the current balance unchanged.
    async fn claim_daily(&self, user_id: &ClientId) -> Result<DailyClaimOutcome, Error>;
}
