//! Domain entities, ports, and services.
//!
//! Purpose: strongly typed aggregates for the marker, ledger, and billing
//! subsystems plus the services implementing the driving ports. Everything
//! here is transport agnostic; inbound adapters translate to HTTP and
//! outbound adapters implement the driven ports.

pub mod activity;
pub mod billing;
mod billing_service;
pub mod error;
mod identity;
pub mod interaction;
mod leaderboard_service;
mod ledger;
pub mod marker;
mod markers_service;
pub mod ports;
pub mod user;
mod users_service;

pub use self::activity::{Activity, ActivityKind};
pub use self::billing::{
    Payment, PaymentId, PaymentPlan, PaymentStatus, Subscription, SubscriptionKind,
    SubscriptionSource, SubscriptionStatus,
};
pub use self::billing_service::BillingService;
pub use self::error::{Error, ErrorCode};
pub use self::identity::IdentityResolver;
pub use self::interaction::{Comment, Rating};
pub use self::leaderboard_service::LeaderboardService;
pub use self::ledger::PointsLedger;
pub use self::marker::{Location, Marker, MarkerDraft, MarkerId, MarkerStatus};
pub use self::markers_service::MarkersService;
pub use self::user::{AdminAllowList, ClientId, Role, User, UserSettings};
pub use self::users_service::DailyClaimService;
