//! User aggregate and caller identity.
//!
//! Identity is a caller-supplied opaque client identifier trusted as-is: the
//! service performs no authentication and no format validation on it. Any
//! production deployment must put a verifiable identity layer in front of
//! this boundary rather than inside it.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Points granted to every freshly created user.
pub const SIGNUP_POINTS: i64 = 50;

/// Opaque caller-supplied identifier. Doubles as the user's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "device-3fa85f64")]
pub struct ClientId(String);

impl ClientId {
    /// Wrap a raw client identifier. The value is deliberately not validated.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

/// Role assigned at first contact and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Stable string form used by the persistence layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse a stored role, falling back to [`Role::User`] on unknown input.
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "admin" => Self::Admin,
            "user" => Self::User,
            other => {
                tracing::warn!(value = other, "unrecognised role value, defaulting to user");
                Self::User
            }
        }
    }
}

/// Statically configured set of privileged client identifiers.
///
/// Supplied via configuration at startup; membership fixes the role of a user
/// record at creation time.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList(HashSet<String>);

impl AdminAllowList {
    /// Build the allow-list from configured identifiers, ignoring blanks.
    pub fn new(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(
            ids.into_iter()
                .map(Into::into)
                .filter(|id: &String| !id.is_empty())
                .collect(),
        )
    }

    /// Role a first-contact caller with this identifier receives.
    pub fn role_for(&self, client_id: &ClientId) -> Role {
        if self.0.contains(client_id.as_str()) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Per-user presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub map_style: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            map_style: "classic".to_owned(),
        }
    }
}

/// Application user.
///
/// ## Invariants
/// - One record per client id; never deleted.
/// - `role` is fixed at creation from the admin allow-list.
/// - `points` is expected to stay non-negative but is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: ClientId,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub is_pro: bool,
    pub pro_until: Option<DateTime<Utc>>,
    pub prefix: Option<String>,
    pub points: i64,
    pub daily_claimed_at: Option<DateTime<Utc>>,
    pub settings: UserSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh user record for a first-contact caller.
    pub fn new(id: ClientId, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: None,
            avatar_url: None,
            role,
            is_pro: false,
            pro_until: None,
            prefix: None,
            points: SIGNUP_POINTS,
            daily_claimed_at: None,
            settings: UserSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
