//! Shared error classification for the Diesel adapters.

use tracing::debug;

use super::pool::PoolError;

/// Adapter-neutral failure category; each repository maps this into its own
/// port error enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Connection(String),
    Query(String),
}

pub(crate) fn classify_pool_error(error: PoolError) -> StoreFailure {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreFailure::Connection(message)
        }
    }
}

pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> StoreFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection("database connection error".to_owned())
        }
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        _ => StoreFailure::Query("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_errors_classify_as_connection_failures() {
        let failure = classify_pool_error(PoolError::checkout("refused"));
        assert_eq!(failure, StoreFailure::Connection("refused".to_owned()));
    }

    #[rstest]
    fn diesel_not_found_classifies_as_query_failure() {
        let failure = classify_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(failure, StoreFailure::Query("record not found".to_owned()));
    }
}
