//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports describe how the domain expects to interact with the store;
//! driving ports are the use-case traits inbound adapters call. Each trait
//! exposes strongly typed errors so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod activity_ledger;
mod activity_repository;
mod billing_port;
mod billing_repository;
mod identity_service;
mod interaction_repository;
mod leaderboard_query;
mod marker_repository;
mod markers_port;
mod user_repository;
mod users_command;

#[cfg(test)]
pub use activity_ledger::MockActivityLedger;
pub use activity_ledger::ActivityLedger;
#[cfg(test)]
pub use activity_repository::MockActivityRepository;
pub use activity_repository::{ActivityRepository, ActivityRepositoryError};
pub use billing_port::{
    PaymentCommand, PaymentIntent, ProCommand, SubscriptionQuery, SubscriptionView,
};
#[cfg(test)]
pub use billing_repository::{MockPaymentRepository, MockSubscriptionRepository};
pub use billing_repository::{
    PaymentRepository, PaymentRepositoryError, SubscriptionRepository,
    SubscriptionRepositoryError,
};
pub use identity_service::IdentityService;
#[cfg(test)]
pub use interaction_repository::{MockCommentRepository, MockRatingRepository};
pub use interaction_repository::{
    CommentRepository, CommentRepositoryError, RatingRepository, RatingRepositoryError,
    RatingUpsert,
};
pub use leaderboard_query::{LEADERBOARD_LIMIT, LeaderboardEntry, LeaderboardQuery};
#[cfg(test)]
pub use marker_repository::MockMarkerRepository;
pub use marker_repository::{ConfirmOutcome, MarkerRepository, MarkerRepositoryError};
pub use markers_port::{
    MARKER_DETAIL_LIMIT, MARKER_LIST_LIMIT, MarkerCommand, MarkerDetail, MarkerQuery,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserInsertOutcome, UserRepository, UserRepositoryError};
pub use users_command::{DailyClaimCommand, DailyClaimOutcome};
