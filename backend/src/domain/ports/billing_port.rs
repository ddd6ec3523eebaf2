//! Driving ports for payments and the pro subscription.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    ClientId, Error, PaymentId, PaymentPlan, PaymentStatus, SubscriptionKind, User,
};

/// Checkout handle returned to the client after creating a payment intent.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub payment_url: String,
    pub payment_id: PaymentId,
}

/// Driving port for payment intents and provider callbacks.
#[async_trait]
pub trait PaymentCommand: Send + Sync {
    /// Create a payment intent in the `created` state with a mock checkout
    /// link.
    async fn create_payment(
        &self,
        user_id: &ClientId,
        plan: PaymentPlan,
    ) -> Result<PaymentIntent, Error>;

    /// Apply a provider status callback, overwriting status and meta
    /// unconditionally. Fails with NotFound for an unknown payment. The
    /// callback never grants a subscription; that linkage is owned by
    /// product requirements which have not specified it.
    async fn apply_webhook(
        &self,
        payment_id: &PaymentId,
        status: PaymentStatus,
        meta: Option<Value>,
    ) -> Result<(), Error>;
}

/// Driving port for points-based pro activation.
#[async_trait]
pub trait ProCommand: Send + Sync {
    /// Spend the fixed point cost to grant pro for the fixed window. Fails
    /// with InsufficientPoints when the balance cannot cover the cost, and
    /// changes nothing in that case.
    async fn activate_from_points(&self, user_id: &ClientId) -> Result<User, Error>;
}

/// Caller-facing view of the current subscription state.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    pub is_pro: bool,
    pub pro_until: Option<DateTime<Utc>>,
    /// Type of the user's active subscription, absent when none exists.
    #[serde(rename = "type")]
    pub kind: Option<SubscriptionKind>,
}

/// Driving port for subscription reads.
#[async_trait]
pub trait SubscriptionQuery: Send + Sync {
    /// The caller's pro flags plus the type of their active subscription.
    async fn subscription_view(&self, user_id: &ClientId) -> Result<SubscriptionView, Error>;
}
