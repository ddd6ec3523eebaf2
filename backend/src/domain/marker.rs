//! Marker aggregate: a user-submitted point of interest.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::ClientId;

/// Stable marker identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
pub struct MarkerId(Uuid);

impl MarkerId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a marker identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for MarkerId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Geographic position in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub lng: f64,
    pub lat: f64,
}

/// Moderation state of a marker.
///
/// Markers are created as [`MarkerStatus::Pending`] and the listing query only
/// returns [`MarkerStatus::Active`]. No operation in this service transitions
/// between the two; moderation is owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStatus {
    Pending,
    Active,
    Rejected,
}

impl MarkerStatus {
    /// Stable string form used by the persistence layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }

    /// Parse a stored status, falling back to [`MarkerStatus::Pending`] on
    /// unknown input.
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "active" => Self::Active,
            "rejected" => Self::Rejected,
            other => {
                tracing::warn!(
                    value = other,
                    "unrecognised marker status, defaulting to pending"
                );
                Self::Pending
            }
        }
    }
}

/// User-submitted point of interest.
///
/// ## Invariants
/// - `confirmations` equals the length of `confirmations_by`.
/// - A client id appears in `confirmations_by` at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: MarkerId,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Location,
    pub created_by: ClientId,
    pub status: MarkerStatus,
    pub confirmations: i32,
    pub confirmations_by: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated inputs for creating a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDraft {
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Location,
}

impl Marker {
    /// Build a freshly submitted marker in the pending state.
    pub fn new(draft: MarkerDraft, created_by: ClientId, now: DateTime<Utc>) -> Self {
        Self {
            id: MarkerId::random(),
            kind: draft.kind,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            created_by,
            status: MarkerStatus::Pending,
            confirmations: 0,
            confirmations_by: Vec::new(),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn draft() -> MarkerDraft {
        MarkerDraft {
            kind: "fountain".to_owned(),
            title: "Drinking fountain".to_owned(),
            description: None,
            location: Location { lng: 30.5, lat: 50.4 },
        }
    }

    #[rstest]
    fn new_marker_starts_pending_and_unconfirmed() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).single().expect("timestamp");
        let marker = Marker::new(draft(), ClientId::new("caller-1"), now);

        assert_eq!(marker.status, MarkerStatus::Pending);
        assert_eq!(marker.confirmations, 0);
        assert!(marker.confirmations_by.is_empty());
        assert_eq!(marker.created_by.as_str(), "caller-1");
    }

    #[rstest]
    fn marker_kind_serialises_as_type() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).single().expect("timestamp");
        let marker = Marker::new(draft(), ClientId::new("caller-1"), now);
        let value = serde_json::to_value(&marker).expect("serialise");

        assert_eq!(value["type"], "fountain");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["confirmationsBy"], serde_json::json!([]));
    }

    #[rstest]
    #[case("pending", MarkerStatus::Pending)]
    #[case("active", MarkerStatus::Active)]
    #[case("rejected", MarkerStatus::Rejected)]
    #[case("archived", MarkerStatus::Pending)]
    fn status_parses_stored_values(#[case] raw: &str, #[case] expected: MarkerStatus) {
        assert_eq!(MarkerStatus::from_stored(raw), expected);
    }
}
