//! Marker interactions: comments and ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::marker::MarkerId;
use super::user::ClientId;

/// Comment attached to a marker. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub marker_id: MarkerId,
    pub user_id: ClientId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a fresh comment.
    pub fn new(marker_id: MarkerId, user_id: ClientId, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            marker_id,
            user_id,
            text,
            created_at: now,
        }
    }
}

/// A user's rating of a marker.
///
/// At most one rating exists per (marker, user) pair; re-rating overwrites
/// the value in place. The value range is deliberately not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub marker_id: MarkerId,
    pub user_id: ClientId,
    pub value: i32,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    /// Build a candidate rating for an upsert.
    pub fn new(marker_id: MarkerId, user_id: ClientId, value: i32, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            marker_id,
            user_id,
            value,
            created_at: now,
        }
    }
}

/// Arithmetic mean of rating values; `None` when no ratings exist.
pub fn rating_average(ratings: &[Rating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(r.value)).sum();
    Some(sum as f64 / ratings.len() as f64)
}
