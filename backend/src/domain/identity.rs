//! Caller identity resolution.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    IdentityService, UserInsertOutcome, UserRepository, UserRepositoryError,
};
use crate::domain::{AdminAllowList, ClientId, Error, User};

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

/// Find-or-create resolver backing every request's identity step.
#[derive(Clone)]
pub struct IdentityResolver<U> {
    users: Arc<U>,
    admins: AdminAllowList,
    clock: Arc<dyn Clock>,
}

impl<U> IdentityResolver<U> {
    /// Create a resolver over the user repository and the configured admin
    /// allow-list.
    pub fn new(users: Arc<U>, admins: AdminAllowList, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            admins,
            clock,
        }
    }
}

#[async_trait]
impl<U> IdentityService for IdentityResolver<U>
where
    U: UserRepository,
{
    async fn resolve_or_create(&self, client_id: &ClientId) -> Result<User, Error> {
        if let Some(user) = self
            .users
            .find_by_id(client_id)
            .await
            .map_err(map_repository_error)?
        {
            return Ok(user);
        }

        let candidate = User::new(
            client_id.clone(),
            self.admins.role_for(client_id),
            self.clock.utc(),
        );

        // Two concurrent first contacts race on the insert; the loser must
        // observe the winner's record rather than fail.
        match self
            .users
            .insert_if_absent(&candidate)
            .await
            .map_err(map_repository_error)?
        {
            UserInsertOutcome::Inserted => Ok(candidate),
            UserInsertOutcome::AlreadyExists => self
                .users
                .find_by_id(client_id)
                .await
                .map_err(map_repository_error)?
                .ok_or_else(|| Error::internal("user record vanished during creation race")),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::Role;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::user::SIGNUP_POINTS;

    struct FixtureClock(DateTime<Utc>);

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 20, 14, 30, 0).single().expect("timestamp")
    }

    fn resolver(
        users: MockUserRepository,
        admins: AdminAllowList,
    ) -> IdentityResolver<MockUserRepository> {
        IdentityResolver::new(Arc::new(users), admins, Arc::new(FixtureClock(fixed_now())))
    }

    #[tokio::test]
    async fn existing_user_is_returned_unchanged() {
        let existing = User::new(ClientId::new("caller-1"), Role::User, fixed_now());
        let returned = existing.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(returned)));
        users.expect_insert_if_absent().times(0);

        let resolver = resolver(users, AdminAllowList::default());
        let user = resolver
            .resolve_or_create(&ClientId::new("caller-1"))
            .await
            .expect("resolve succeeds");

        assert_eq!(user, existing);
    }

    #[rstest]
    #[case("ops-admin", Role::Admin)]
    #[case("caller-1", Role::User)]
    #[tokio::test]
    async fn first_contact_creates_with_signup_points_and_allow_list_role(
        #[case] id: &str,
        #[case] expected_role: Role,
    ) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));
        users
            .expect_insert_if_absent()
            .withf(move |user: &User| user.points == SIGNUP_POINTS)
            .times(1)
            .return_once(|_| Ok(UserInsertOutcome::Inserted));

        let resolver = resolver(users, AdminAllowList::new(["ops-admin"]));
        let user = resolver
            .resolve_or_create(&ClientId::new(id))
            .await
            .expect("create succeeds");

        assert_eq!(user.role, expected_role);
        assert_eq!(user.points, SIGNUP_POINTS);
    }

    #[tokio::test]
    async fn losing_the_creation_race_re_reads_the_winner() {
        let winner = User::new(ClientId::new("caller-1"), Role::User, fixed_now());
        let stored = winner.clone();

        let mut users = MockUserRepository::new();
        let mut find_calls = 0_u32;
        users.expect_find_by_id().times(2).returning(move |_| {
            find_calls += 1;
            if find_calls == 1 {
                Ok(None)
            } else {
                Ok(Some(stored.clone()))
            }
        });
        users
            .expect_insert_if_absent()
            .times(1)
            .return_once(|_| Ok(UserInsertOutcome::AlreadyExists));

        let resolver = resolver(users, AdminAllowList::default());
        let user = resolver
            .resolve_or_create(&ClientId::new("caller-1"))
            .await
            .expect("race loser resolves");

        assert_eq!(user, winner);
    }
}
