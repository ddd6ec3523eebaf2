//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DailyClaimCommand, IdentityService, LeaderboardQuery, MarkerCommand, MarkerQuery,
    PaymentCommand, ProCommand, SubscriptionQuery,
};

use super::webhook::WebhookVerifier;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityService>,
    pub daily_claim: Arc<dyn DailyClaimCommand>,
    pub marker_command: Arc<dyn MarkerCommand>,
    pub marker_query: Arc<dyn MarkerQuery>,
    pub leaderboard: Arc<dyn LeaderboardQuery>,
    pub payments: Arc<dyn PaymentCommand>,
    pub pro: Arc<dyn ProCommand>,
    pub subscriptions: Arc<dyn SubscriptionQuery>,
    pub webhook: WebhookVerifier,
}
