//! Leaderboard projection over user point balances.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::ports::{
    LEADERBOARD_LIMIT, LeaderboardEntry, LeaderboardQuery, UserRepository, UserRepositoryError,
};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Read-only ranked view over user points.
#[derive(Clone)]
pub struct LeaderboardService<U> {
    users: Arc<U>,
}

impl<U> LeaderboardService<U> {
    /// Create the projection over the user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> LeaderboardQuery for LeaderboardService<U>
where
    U: UserRepository,
{
    async fn top(&self) -> Result<Vec<LeaderboardEntry>, Error> {
        let users = self
            .users
            .top_by_points(LEADERBOARD_LIMIT)
            .await
            .map_err(map_repository_error)?;

        Ok(users
            .into_iter()
            .map(|user| LeaderboardEntry {
                id: user.id,
                name: user.name,
                score: user.points,
            })
            .collect())
    }
}
