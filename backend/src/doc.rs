//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. Swagger
//! UI serves it in debug builds, and `cargo run --bin openapi-dump` exports
//! it for external tooling.

use utoipa::OpenApi;

use crate::domain::ports::{
    DailyClaimOutcome, LeaderboardEntry, MarkerDetail, PaymentIntent, SubscriptionView,
};
use crate::domain::{
    Activity, Comment, Location, Marker, MarkerStatus, PaymentPlan, Rating, Role, Subscription,
    User, UserSettings,
};
use crate::inbound::http::markers::{
    CommentEnvelope, CommentRequest, CreateMarkerRequest, MarkerEnvelope, RateRequest,
    RatingEnvelope,
};
use crate::inbound::http::payments::{CreatePaymentRequest, OkResponse, WebhookPayload};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::subscriptions::ActivationResponse;
use crate::inbound::http::users::UserEnvelope;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Waymark backend API",
        description = "Crowdsourced map markers with a gamified points ledger."
    ),
    paths(
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::daily_claim,
        crate::inbound::http::markers::list_markers,
        crate::inbound::http::markers::create_marker,
        crate::inbound::http::markers::marker_detail,
        crate::inbound::http::markers::confirm_marker,
        crate::inbound::http::markers::comment_marker,
        crate::inbound::http::markers::rate_marker,
        crate::inbound::http::leaderboard::leaderboard,
        crate::inbound::http::payments::create_payment,
        crate::inbound::http::payments::payment_webhook,
        crate::inbound::http::subscriptions::activate_pro_from_points,
        crate::inbound::http::subscriptions::current_subscription,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ActivationResponse,
        Activity,
        Comment,
        CommentEnvelope,
        CommentRequest,
        CreateMarkerRequest,
        CreatePaymentRequest,
        DailyClaimOutcome,
        ErrorSchema,
        LeaderboardEntry,
        Location,
        Marker,
        MarkerDetail,
        MarkerEnvelope,
        MarkerStatus,
        OkResponse,
        PaymentIntent,
        PaymentPlan,
        RateRequest,
        Rating,
        RatingEnvelope,
        Role,
        Subscription,
        SubscriptionView,
        User,
        UserEnvelope,
        UserSettings,
        WebhookPayload,
    )),
    tags(
        (name = "users", description = "Identity resolution and daily claims"),
        (name = "markers", description = "Marker submission and interactions"),
        (name = "leaderboard", description = "Ranked point balances"),
        (name = "payments", description = "Payment intents and provider callbacks"),
        (name = "subscriptions", description = "Pro entitlement"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn document_includes_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/v1/users/me",
            "/api/v1/users/daily-claim",
            "/api/v1/markers",
            "/api/v1/markers/{id}",
            "/api/v1/markers/{id}/confirm",
            "/api/v1/markers/{id}/comment",
            "/api/v1/markers/{id}/rate",
            "/api/v1/leaderboard",
            "/api/v1/payments/create",
            "/api/v1/payments/enot/webhook",
            "/api/v1/pro/activate-from-points",
            "/api/v1/subscriptions/me",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }
}
