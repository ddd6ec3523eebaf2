//! Daily claim domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::activity::DAILY_CLAIM_POINTS;
use crate::domain::ports::{
    ActivityLedger, DailyClaimCommand, DailyClaimOutcome, UserRepository, UserRepositoryError,
};
use crate::domain::{ActivityKind, ClientId, Error};

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

/// Once-per-UTC-calendar-day point claim.
#[derive(Clone)]
pub struct DailyClaimService<U> {
    users: Arc<U>,
    ledger: Arc<dyn ActivityLedger>,
    clock: Arc<dyn Clock>,
}

impl<U> DailyClaimService<U> {
    /// Create the service over the user repository and the ledger.
    pub fn new(users: Arc<U>, ledger: Arc<dyn ActivityLedger>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            ledger,
            clock,
        }
    }
}

#[async_trait]
impl<U> DailyClaimCommand for DailyClaimService<U>
where
    U: UserRepository,
{
    async fn claim_daily(&self, user_id: &ClientId) -> Result<DailyClaimOutcome, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::internal("user record missing after identity resolution"))?;

        let now = self.clock.utc();
        if let Some(claimed_at) = user.daily_claimed_at
            && claimed_at.date_naive() == now.date_naive()
        {
            return Ok(DailyClaimOutcome {
                ok: false,
                points: user.points,
                daily_claimed_at: Some(claimed_at),
            });
        }

        // Timestamp and balance move in one single-record write; the audit
        // append below is a separate write and may be lost on a crash.
        self.users
            .record_daily_claim(user_id, now, DAILY_CLAIM_POINTS)
            .await
            .map_err(map_repository_error)?;
        self.ledger
            .append(user_id, ActivityKind::Daily, DAILY_CLAIM_POINTS, None)
            .await?;

        Ok(DailyClaimOutcome {
            ok: true,
            points: user.points + DAILY_CLAIM_POINTS,
            daily_claimed_at: Some(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockActivityLedger, MockUserRepository};
    use crate::domain::{Role, User};

    struct FixtureClock(DateTime<Utc>);

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn service(
        users: MockUserRepository,
        ledger: MockActivityLedger,
        now: DateTime<Utc>,
    ) -> DailyClaimService<MockUserRepository> {
        DailyClaimService::new(
            Arc::new(users),
            Arc::new(ledger),
            Arc::new(FixtureClock(now)),
        )
    }

    fn user_claimed_at(claimed_at: Option<DateTime<Utc>>) -> User {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("timestamp");
        let mut user = User::new(ClientId::new("caller-1"), Role::User, created);
        user.daily_claimed_at = claimed_at;
        user
    }

    #[rstest]
    #[tokio::test]
    async fn first_claim_of_the_day_grants_points() {
        let now = Utc.with_ymd_and_hms(2026, 6, 2, 8, 0, 0).single().expect("timestamp");
        let user = user_claimed_at(None);
        let expected_points = user.points + DAILY_CLAIM_POINTS;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(user)));
        users
            .expect_record_daily_claim()
            .withf(move |_, at, points| *at == now && *points == DAILY_CLAIM_POINTS)
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let mut ledger = MockActivityLedger::new();
        ledger
            .expect_append()
            .withf(|_, kind, points, _| *kind == ActivityKind::Daily && *points == 10)
            .times(1)
            .return_once(|_, _, _, _| Ok(()));
        ledger.expect_award().times(0);

        let outcome = service(users, ledger, now)
            .claim_daily(&ClientId::new("caller-1"))
            .await
            .expect("claim succeeds");

        assert!(outcome.ok);
        assert_eq!(outcome.points, expected_points);
        assert_eq!(outcome.daily_claimed_at, Some(now));
    }

    #[rstest]
    #[tokio::test]
    async fn second_claim_on_the_same_utc_date_is_refused() {
        let earlier = Utc.with_ymd_and_hms(2026, 6, 2, 0, 5, 0).single().expect("timestamp");
        let now = Utc.with_ymd_and_hms(2026, 6, 2, 23, 55, 0).single().expect("timestamp");
        let user = user_claimed_at(Some(earlier));
        let balance = user.points;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(user)));
        users.expect_record_daily_claim().times(0);

        let mut ledger = MockActivityLedger::new();
        ledger.expect_append().times(0);

        let outcome = service(users, ledger, now)
            .claim_daily(&ClientId::new("caller-1"))
            .await
            .expect("refusal is not an error");

        assert!(!outcome.ok);
        assert_eq!(outcome.points, balance);
        assert_eq!(outcome.daily_claimed_at, Some(earlier));
    }

    #[rstest]
    #[tokio::test]
    async fn claim_is_granted_again_after_the_date_rolls_over() {
        let yesterday = Utc.with_ymd_and_hms(2026, 6, 2, 23, 55, 0).single().expect("timestamp");
        let now = Utc.with_ymd_and_hms(2026, 6, 3, 0, 5, 0).single().expect("timestamp");
        let user = user_claimed_at(Some(yesterday));

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(user)));
        users
            .expect_record_daily_claim()
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let mut ledger = MockActivityLedger::new();
        ledger.expect_append().times(1).return_once(|_, _, _, _| Ok(()));

        let outcome = service(users, ledger, now)
            .claim_daily(&ClientId::new("caller-1"))
            .await
            .expect("rollover claim succeeds");

        assert!(outcome.ok);
        assert_eq!(outcome.daily_claimed_at, Some(now));
    }
}
