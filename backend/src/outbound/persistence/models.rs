//! Row models and conversions between database rows and domain entities.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    Activity, ClientId, Comment, Location, Marker, MarkerStatus, Payment, PaymentStatus, Rating,
    Role, Subscription, SubscriptionKind, SubscriptionSource, SubscriptionStatus, User,
    UserSettings,
};

use super::schema::{activities, comments, markers, payments, ratings, subscriptions, users};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub is_pro: bool,
    pub pro_until: Option<DateTime<Utc>>,
    pub prefix: Option<String>,
    pub points: i64,
    pub daily_claimed_at: Option<DateTime<Utc>>,
    pub settings: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let settings = serde_json::from_value(row.settings).unwrap_or_else(|err| {
            tracing::warn!(user_id = %row.id, %err, "malformed settings payload, using defaults");
            UserSettings::default()
        });
        Self {
            id: ClientId::new(row.id),
            name: row.name,
            avatar_url: row.avatar_url,
            role: Role::from_stored(&row.role),
            is_pro: row.is_pro,
            pro_until: row.pro_until,
            prefix: row.prefix,
            points: row.points,
            daily_claimed_at: row.daily_claimed_at,
            settings,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_str().to_owned(),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            role: user.role.as_str().to_owned(),
            is_pro: user.is_pro,
            pro_until: user.pro_until,
            prefix: user.prefix.clone(),
            points: user.points,
            daily_claimed_at: user.daily_claimed_at,
            settings: settings_to_value(&user.settings),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Serialise settings for storage; the struct always serialises cleanly, the
/// fallback exists so the write path cannot fail.
pub(crate) fn settings_to_value(settings: &UserSettings) -> Value {
    serde_json::to_value(settings).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = markers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MarkerRow {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub lng: f64,
    pub lat: f64,
    pub created_by: String,
    pub status: String,
    pub confirmations: i32,
    pub confirmations_by: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MarkerRow> for Marker {
    fn from(row: MarkerRow) -> Self {
        Self {
            id: row.id.into(),
            kind: row.kind,
            title: row.title,
            description: row.description,
            location: Location {
                lng: row.lng,
                lat: row.lat,
            },
            created_by: ClientId::new(row.created_by),
            status: MarkerStatus::from_stored(&row.status),
            confirmations: row.confirmations,
            confirmations_by: row.confirmations_by,
            created_at: row.created_at,
        }
    }
}

impl From<&Marker> for MarkerRow {
    fn from(marker: &Marker) -> Self {
        Self {
            id: *marker.id.as_uuid(),
            kind: marker.kind.clone(),
            title: marker.title.clone(),
            description: marker.description.clone(),
            lng: marker.location.lng,
            lat: marker.location.lat,
            created_by: marker.created_by.as_str().to_owned(),
            status: marker.status.as_str().to_owned(),
            confirmations: marker.confirmations,
            confirmations_by: marker.confirmations_by.clone(),
            created_at: marker.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: Uuid,
    pub marker_id: Uuid,
    pub user_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            marker_id: row.marker_id.into(),
            user_id: ClientId::new(row.user_id),
            text: row.body,
            created_at: row.created_at,
        }
    }
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            marker_id: *comment.marker_id.as_uuid(),
            user_id: comment.user_id.as_str().to_owned(),
            body: comment.text.clone(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RatingRow {
    pub id: Uuid,
    pub marker_id: Uuid,
    pub user_id: String,
    pub value: i32,
    pub created_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Self {
            id: row.id,
            marker_id: row.marker_id.into(),
            user_id: ClientId::new(row.user_id),
            value: row.value,
            created_at: row.created_at,
        }
    }
}

impl From<&Rating> for RatingRow {
    fn from(rating: &Rating) -> Self {
        Self {
            id: rating.id,
            marker_id: *rating.marker_id.as_uuid(),
            user_id: rating.user_id.as_str().to_owned(),
            value: rating.value,
            created_at: rating.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityRow {
    pub id: Uuid,
    pub user_id: String,
    pub kind: String,
    pub points: i64,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl From<&Activity> for ActivityRow {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            user_id: activity.user_id.as_str().to_owned(),
            kind: activity.kind.as_str().to_owned(),
            points: activity.points,
            meta: activity.meta.clone(),
            created_at: activity.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubscriptionRow {
    pub id: Uuid,
    pub user_id: String,
    pub status: String,
    pub kind: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub source: String,
    pub price_rub: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        let kind = SubscriptionKind::from_stored(&row.kind).unwrap_or_else(|| {
            tracing::warn!(value = row.kind, "unrecognised subscription type, assuming points");
            SubscriptionKind::Points
        });
        let status = match row.status.as_str() {
            "expired" => SubscriptionStatus::Expired,
            _ => SubscriptionStatus::Active,
        };
        let source = match row.source.as_str() {
            "enot" => SubscriptionSource::Enot,
            "top10" => SubscriptionSource::Top10,
            _ => SubscriptionSource::Points,
        };
        Self {
            id: row.id,
            user_id: ClientId::new(row.user_id),
            status,
            kind,
            start_at: row.start_at,
            end_at: row.end_at,
            source,
            price_rub: row.price_rub,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&Subscription> for SubscriptionRow {
    fn from(subscription: &Subscription) -> Self {
        Self {
            id: subscription.id,
            user_id: subscription.user_id.as_str().to_owned(),
            status: subscription.status.as_str().to_owned(),
            kind: subscription.kind.as_str().to_owned(),
            start_at: subscription.start_at,
            end_at: subscription.end_at,
            source: subscription.source.as_str().to_owned(),
            price_rub: subscription.price_rub,
            created_at: subscription.created_at,
            updated_at: subscription.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub id: Uuid,
    pub user_id: String,
    pub provider: String,
    pub external_id: String,
    pub amount_rub: i32,
    pub status: String,
    pub link_url: Option<String>,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id.into(),
            user_id: ClientId::new(row.user_id),
            provider: row.provider,
            external_id: row.external_id,
            amount_rub: row.amount_rub,
            status: PaymentStatus::from(row.status),
            link_url: row.link_url,
            meta: row.meta,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            user_id: payment.user_id.as_str().to_owned(),
            provider: payment.provider.clone(),
            external_id: payment.external_id.clone(),
            amount_rub: payment.amount_rub,
            status: payment.status.as_str().to_owned(),
            link_url: payment.link_url.clone(),
            meta: payment.meta.clone(),
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::{PaymentPlan, Role};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 3, 3, 3, 3).single().expect("timestamp")
    }

    #[rstest]
    fn user_row_round_trips() {
        let user = User::new(ClientId::new("caller-1"), Role::Admin, fixed_now());
        let row = UserRow::from(&user);
        let restored = User::from(row);

        assert_eq!(restored, user);
    }

    #[rstest]
    fn malformed_settings_fall_back_to_defaults() {
        let user = User::new(ClientId::new("caller-1"), Role::User, fixed_now());
        let mut row = UserRow::from(&user);
        row.settings = json!(["not", "an", "object"]);

        let restored = User::from(row);
        assert_eq!(restored.settings, UserSettings::default());
    }

    #[rstest]
    fn payment_row_preserves_unknown_status() {
        let mut payment = Payment::new(ClientId::new("caller-1"), PaymentPlan::Trial, fixed_now());
        payment.status = PaymentStatus::from("chargeback".to_owned());

        let row = PaymentRow::from(&payment);
        assert_eq!(row.status, "chargeback");
        let restored = Payment::from(row);
        assert_eq!(restored.status, PaymentStatus::Other("chargeback".to_owned()));
    }
}
