//! Wiring of domain services onto concrete adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use backend::domain::ports::ActivityLedger;
use backend::domain::{
    BillingService, DailyClaimService, IdentityResolver, LeaderboardService, MarkersService,
    PointsLedger,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::webhook::WebhookVerifier;
use backend::outbound::memory::MemoryStore;
use backend::outbound::persistence::{
    DbPool, DieselActivityRepository, DieselCommentRepository, DieselMarkerRepository,
    DieselPaymentRepository, DieselRatingRepository, DieselSubscriptionRepository,
    DieselUserRepository,
};

use super::config::ServerConfig;

/// Build the handler state, choosing PostgreSQL adapters when a pool is
/// configured and the in-memory store otherwise.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => build_diesel_state(config, pool),
        None => {
            warn!("no database configured, state lives in memory only");
            build_memory_state(config)
        }
    }
}

fn build_diesel_state(config: &ServerConfig, pool: &DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let markers = Arc::new(DieselMarkerRepository::new(pool.clone()));
    let comments = Arc::new(DieselCommentRepository::new(pool.clone()));
    let ratings = Arc::new(DieselRatingRepository::new(pool.clone()));
    let activities = Arc::new(DieselActivityRepository::new(pool.clone()));
    let payments = Arc::new(DieselPaymentRepository::new(pool.clone()));
    let subscriptions = Arc::new(DieselSubscriptionRepository::new(pool.clone()));

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ledger: Arc<dyn ActivityLedger> =
        Arc::new(PointsLedger::new(activities, users.clone(), clock.clone()));

    let markers_service = Arc::new(MarkersService::new(
        markers,
        comments,
        ratings,
        ledger.clone(),
        clock.clone(),
    ));
    let billing = Arc::new(BillingService::new(
        payments,
        subscriptions,
        users.clone(),
        clock.clone(),
    ));

    HttpState {
        identity: Arc::new(IdentityResolver::new(
            users.clone(),
            config.admins.clone(),
            clock.clone(),
        )),
        daily_claim: Arc::new(DailyClaimService::new(users.clone(), ledger, clock)),
        marker_command: markers_service.clone(),
        marker_query: markers_service,
        leaderboard: Arc::new(LeaderboardService::new(users)),
        payments: billing.clone(),
        pro: billing.clone(),
        subscriptions: billing,
        webhook: WebhookVerifier::new(config.webhook_secret.clone()),
    }
}

fn build_memory_state(config: &ServerConfig) -> HttpState {
    let store = Arc::new(MemoryStore::new());

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ledger: Arc<dyn ActivityLedger> = Arc::new(PointsLedger::new(
        store.clone(),
        store.clone(),
        clock.clone(),
    ));

    let markers_service = Arc::new(MarkersService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        ledger.clone(),
        clock.clone(),
    ));
    let billing = Arc::new(BillingService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
    ));

    HttpState {
        identity: Arc::new(IdentityResolver::new(
            store.clone(),
            config.admins.clone(),
            clock.clone(),
        )),
        daily_claim: Arc::new(DailyClaimService::new(store.clone(), ledger, clock)),
        marker_command: markers_service.clone(),
        marker_query: markers_service,
        leaderboard: Arc::new(LeaderboardService::new(store)),
        payments: billing.clone(),
        pro: billing.clone(),
        subscriptions: billing,
        webhook: WebhookVerifier::new(config.webhook_secret.clone()),
    }
}
