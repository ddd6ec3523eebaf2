//! Driving port for the leaderboard projection.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ClientId, Error};

/// Number of entries the leaderboard returns.
pub const LEADERBOARD_LIMIT: i64 = 20;

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: ClientId,
    pub name: Option<String>,
    pub score: i64,
}

/// Pure read over user point balances.
#[async_trait]
pub trait LeaderboardQuery: Send + Sync {
    /// Top users by points descending; ties broken by id ascending so the
    /// ordering is reproducible.
    async fn top(&self) -> Result<Vec<LeaderboardEntry>, Error>;
}
