//! Driven ports for payment and subscription persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{ClientId, Payment, PaymentId, PaymentStatus, Subscription};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment repository adapters.
    pub enum PaymentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "payment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "payment repository query failed: {message}",
    }
}

/// Port for storing payment intents and applying provider status updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Persist a payment intent.
    async fn insert(&self, payment: &Payment) -> Result<(), PaymentRepositoryError>;

    /// Overwrite status and meta unconditionally. Returns `false` when the
    /// payment does not exist.
    async fn update_status(
        &self,
        id: &PaymentId,
        status: PaymentStatus,
        meta: Option<Value>,
        now: DateTime<Utc>,
    ) -> Result<bool, PaymentRepositoryError>;
}

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "subscription repository query failed: {message}",
    }
}

/// Port for storing subscriptions and reading a user's active one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Persist a subscription.
    async fn insert(&self, subscription: &Subscription)
    -> Result<(), SubscriptionRepositoryError>;

    /// One active subscription for the user, if any exists. With multiple
    /// active subscriptions the choice is adapter-defined.
    async fn find_active_for_user(
        &self,
        user_id: &ClientId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError>;
}
