//! Payments and pro subscriptions.
//!
//! Payment state is driven entirely by the external provider's webhook; the
//! service records whatever status the provider reports without checking
//! transition legality. Subscriptions are never expired by any process in
//! this service: `endAt` is informational only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::ClientId;

/// Point balance consumed by a points-based pro activation.
pub const PRO_ACTIVATION_COST: i64 = 1_000;
/// Length of a pro grant, in days.
pub const PRO_GRANT_DAYS: i64 = 30;
/// Price of the trial plan, in roubles.
pub const TRIAL_PRICE_RUB: i32 = 1;
/// Price of the monthly plan, in roubles.
pub const MONTHLY_PRICE_RUB: i32 = 149;
/// Payment provider identifier recorded on every payment intent.
pub const PAYMENT_PROVIDER: &str = "enot";

/// Stable payment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a payment identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PaymentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Purchasable plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPlan {
    Trial,
    Monthly,
}

impl PaymentPlan {
    /// Fixed price of this plan in roubles.
    pub fn amount_rub(self) -> i32 {
        match self {
            Self::Trial => TRIAL_PRICE_RUB,
            Self::Monthly => MONTHLY_PRICE_RUB,
        }
    }
}

/// Payment lifecycle state.
///
/// The nominal transitions are `created -> pending -> {success, fail}`, but
/// the webhook overwrites the status unconditionally, so unknown provider
/// states are preserved verbatim instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Created,
    Pending,
    Success,
    Fail,
    Other(String),
}

impl PaymentStatus {
    /// Stable string form used on the wire and by the persistence layer.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Fail => "fail",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "created" => Self::Created,
            "pending" => Self::Pending,
            "success" => Self::Success,
            "fail" => Self::Fail,
            _ => Self::Other(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment intent created ahead of the provider checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: ClientId,
    pub provider: String,
    pub external_id: String,
    pub amount_rub: i32,
    #[schema(value_type = String, example = "created")]
    pub status: PaymentStatus,
    pub link_url: Option<String>,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Build a fresh payment intent in the `created` state with a mock
    /// checkout link derived from the generated external id.
    pub fn new(user_id: ClientId, plan: PaymentPlan, now: DateTime<Utc>) -> Self {
        let external_id = Uuid::new_v4().to_string();
        let link_url = format!("https://pay.mock/{external_id}");
        Self {
            id: PaymentId::random(),
            user_id,
            provider: PAYMENT_PROVIDER.to_owned(),
            external_id,
            amount_rub: plan.amount_rub(),
            status: PaymentStatus::Created,
            link_url: Some(link_url),
            meta: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Subscription category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionKind {
    Trial,
    Paid,
    FreeTop,
    Points,
}

impl SubscriptionKind {
    /// Stable string form used by the persistence layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Paid => "paid",
            Self::FreeTop => "free_top",
            Self::Points => "points",
        }
    }

    /// Parse a stored kind.
    pub fn from_stored(raw: &str) -> Option<Self> {
        match raw {
            "trial" => Some(Self::Trial),
            "paid" => Some(Self::Paid),
            "free_top" => Some(Self::FreeTop),
            "points" => Some(Self::Points),
            _ => None,
        }
    }
}

/// Subscription lifecycle state. Nothing in this service transitions a
/// subscription to `expired`; no expiry sweep exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Expired,
}

impl SubscriptionStatus {
    /// Stable string form used by the persistence layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

/// Origin of a subscription grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionSource {
    Enot,
    Points,
    Top10,
}

impl SubscriptionSource {
    /// Stable string form used by the persistence layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enot => "enot",
            Self::Points => "points",
            Self::Top10 => "top10",
        }
    }
}

/// Pro entitlement record. Multiple active subscriptions per user are
/// possible; no mutual exclusion is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: ClientId,
    pub status: SubscriptionStatus,
    #[serde(rename = "type")]
    pub kind: SubscriptionKind,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub source: SubscriptionSource,
    pub price_rub: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Build an active points-sourced subscription covering `[start, end]`.
    pub fn from_points(user_id: ClientId, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: SubscriptionStatus::Active,
            kind: SubscriptionKind::Points,
            start_at,
            end_at,
            source: SubscriptionSource::Points,
            price_rub: None,
            created_at: start_at,
            updated_at: start_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, 18, 45, 0).single().expect("timestamp")
    }

    #[rstest]
    #[case(PaymentPlan::Trial, TRIAL_PRICE_RUB)]
    #[case(PaymentPlan::Monthly, MONTHLY_PRICE_RUB)]
    fn plan_prices_are_fixed(#[case] plan: PaymentPlan, #[case] expected: i32) {
        assert_eq!(plan.amount_rub(), expected);
    }

    #[rstest]
    fn new_payment_is_created_with_mock_link() {
        let payment = Payment::new(ClientId::new("caller-1"), PaymentPlan::Monthly, fixed_now());

        assert_eq!(payment.status, PaymentStatus::Created);
        assert_eq!(payment.provider, PAYMENT_PROVIDER);
        assert_eq!(payment.amount_rub, MONTHLY_PRICE_RUB);
        let link = payment.link_url.as_deref().expect("mock link");
        assert_eq!(link, format!("https://pay.mock/{}", payment.external_id));
    }

    #[rstest]
    #[case("created", PaymentStatus::Created)]
    #[case("success", PaymentStatus::Success)]
    #[case("refunded", PaymentStatus::Other("refunded".to_owned()))]
    fn payment_status_preserves_unknown_provider_states(
        #[case] raw: &str,
        #[case] expected: PaymentStatus,
    ) {
        assert_eq!(PaymentStatus::from(raw.to_owned()), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn points_subscription_spans_the_grant_window() {
        let start = fixed_now();
        let end = start + chrono::Duration::days(PRO_GRANT_DAYS);
        let sub = Subscription::from_points(ClientId::new("caller-1"), start, end);

        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.kind, SubscriptionKind::Points);
        assert_eq!(sub.source, SubscriptionSource::Points);
        assert_eq!(sub.end_at - sub.start_at, chrono::Duration::days(30));

        let value = serde_json::to_value(&sub).expect("serialise");
        assert_eq!(value["type"], "points");
    }
}
