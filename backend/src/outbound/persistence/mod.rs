//! Diesel/PostgreSQL persistence adapters implementing the driven ports.

use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

mod diesel_activity_repository;
mod diesel_billing_repository;
mod diesel_helpers;
mod diesel_interaction_repository;
mod diesel_marker_repository;
mod diesel_user_repository;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_activity_repository::DieselActivityRepository;
pub use diesel_billing_repository::{DieselPaymentRepository, DieselSubscriptionRepository};
pub use diesel_interaction_repository::{DieselCommentRepository, DieselRatingRepository};
pub use diesel_marker_repository::DieselMarkerRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

/// Embedded schema migrations, applied at startup.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply pending migrations over a blocking wrapper connection.
///
/// # Errors
/// Returns [`PoolError::Build`] when connecting or migrating fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), PoolError> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> Result<(), PoolError> {
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&database_url)
            .map_err(|err| PoolError::build(err.to_string()))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|err| PoolError::build(err.to_string()))
    })
    .await
    .map_err(|err| PoolError::build(err.to_string()))?
}
