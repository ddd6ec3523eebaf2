//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod identity;
pub mod leaderboard;
pub mod markers;
pub mod payments;
pub mod schemas;
pub mod state;
pub mod subscriptions;
pub mod users;
pub mod webhook;

use actix_web::web;

pub use error::{ApiError, ApiResult};

/// Register every REST endpoint on the given service config.
///
/// Both the server binary and the endpoint tests build their apps through
/// this function so route wiring cannot drift between the two.
pub fn routes(cfg: &mut web::ServiceConfig) {
    let api = web::scope("/api/v1")
        .service(users::current_user)
        .service(users::daily_claim)
        .service(markers::list_markers)
        .service(markers::create_marker)
        .service(markers::marker_detail)
        .service(markers::confirm_marker)
        .service(markers::comment_marker)
        .service(markers::rate_marker)
        .service(leaderboard::leaderboard)
        .service(payments::create_payment)
        .service(payments::payment_webhook)
        .service(subscriptions::activate_pro_from_points)
        .service(subscriptions::current_subscription);

    cfg.service(api).service(health::ready).service(health::live);
}
