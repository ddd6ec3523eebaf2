//! Append-only audit trail of point-earning events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::ClientId;

/// Points awarded for submitting a marker.
pub const MARKER_CREATE_POINTS: i64 = 5;
/// Points awarded for a first confirmation of a marker.
pub const MARKER_CONFIRM_POINTS: i64 = 2;
/// Points awarded for commenting on a marker.
pub const COMMENT_POINTS: i64 = 1;
/// Points awarded for a first rating of a marker.
pub const RATING_POINTS: i64 = 1;
/// Points granted by the once-per-day claim.
pub const DAILY_CLAIM_POINTS: i64 = 10;

/// Category of point-earning event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    CreateMarker,
    Confirm,
    Comment,
    Rate,
    Daily,
}

impl ActivityKind {
    /// Stable string form used by the persistence layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateMarker => "create_marker",
            Self::Confirm => "confirm",
            Self::Comment => "comment",
            Self::Rate => "rate",
            Self::Daily => "daily",
        }
    }

    /// Parse a stored kind. Unknown values are rejected rather than coerced;
    /// the audit trail must not invent event categories.
    pub fn from_stored(raw: &str) -> Option<Self> {
        match raw {
            "create_marker" => Some(Self::CreateMarker),
            "confirm" => Some(Self::Confirm),
            "comment" => Some(Self::Comment),
            "rate" => Some(Self::Rate),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

/// Immutable record of a point-earning event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub user_id: ClientId,
    pub kind: ActivityKind,
    pub points: i64,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Build a fresh audit record.
    pub fn new(
        user_id: ClientId,
        kind: ActivityKind,
        points: i64,
        meta: Option<Value>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            points,
            meta,
            created_at: now,
        }
    }
}
