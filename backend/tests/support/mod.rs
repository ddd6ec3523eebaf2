//! Shared fixtures for endpoint tests: an app wired onto the in-memory
//! store with a controllable clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use backend::domain::ports::ActivityLedger;
use backend::domain::{
    AdminAllowList, BillingService, DailyClaimService, IdentityResolver, LeaderboardService,
    MarkersService, PointsLedger,
};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::routes;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::webhook::WebhookVerifier;
use backend::outbound::memory::MemoryStore;

/// Clock whose time the tests can move forward.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = TimeDelta::from_std(delta).expect("delta fits");
        let mut guard = self.0.lock().expect("clock mutex");
        *guard += delta;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock mutex")
    }
}

/// Everything a test needs: the shared store, the clock, and handler state.
pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

pub fn fixed_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).single().expect("timestamp")
}

/// Wire the full service stack onto one in-memory store.
pub fn harness(admins: AdminAllowList, webhook_secret: Option<String>) -> TestHarness {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(MutableClock::new(fixed_start()));

    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let ledger: Arc<dyn ActivityLedger> = Arc::new(PointsLedger::new(
        store.clone(),
        store.clone(),
        dyn_clock.clone(),
    ));

    let markers_service = Arc::new(MarkersService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        ledger.clone(),
        dyn_clock.clone(),
    ));
    let billing = Arc::new(BillingService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        dyn_clock.clone(),
    ));

    let state = HttpState {
        identity: Arc::new(IdentityResolver::new(
            store.clone(),
            admins,
            dyn_clock.clone(),
        )),
        daily_claim: Arc::new(DailyClaimService::new(store.clone(), ledger, dyn_clock)),
        marker_command: markers_service.clone(),
        marker_query: markers_service,
        leaderboard: Arc::new(LeaderboardService::new(store.clone())),
        payments: billing.clone(),
        pro: billing.clone(),
        subscriptions: billing,
        webhook: WebhookVerifier::new(webhook_secret),
    };

    TestHarness {
        store,
        clock,
        state,
    }
}

/// Build the REST app over the given handler state.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
> {
    let health = HealthState::new();
    health.mark_ready();
    App::new()
        .app_data(web::Data::new(health))
        .app_data(web::Data::new(state))
        .configure(routes)
}
