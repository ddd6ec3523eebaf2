//! Pro subscription HTTP handlers.
//!
//! ```text
//! POST /api/v1/pro/activate-from-points
//! GET  /api/v1/subscriptions/me
//! ```

use actix_web::{get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::User;
use crate::domain::ports::SubscriptionView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::state::HttpState;

/// Envelope returned after a successful activation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivationResponse {
    pub ok: bool,
    pub user: User,
}

/// Spend points to activate pro for the fixed window.
#[utoipa::path(
    post,
    path = "/api/v1/pro/activate-from-points",
    params(("client_id" = String, Query, description = "Opaque caller identifier")),
    responses(
        (status = 200, description = "Activation applied", body = ActivationResponse),
        (status = 400, description = "Insufficient points", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "activateProFromPoints"
)]
#[post("/pro/activate-from-points")]
pub async fn activate_pro_from_points(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
) -> ApiResult<web::Json<ActivationResponse>> {
    state.identity.resolve_or_create(caller.client_id()).await?;
    let user = state.pro.activate_from_points(caller.client_id()).await?;
    Ok(web::Json(ActivationResponse { ok: true, user }))
}

/// The caller's current subscription view.
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/me",
    params(("client_id" = String, Query, description = "Opaque caller identifier")),
    responses(
        (status = 200, description = "Subscription view", body = SubscriptionView),
        (status = 400, description = "Missing client_id", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "currentSubscription"
)]
#[get("/subscriptions/me")]
pub async fn current_subscription(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
) -> ApiResult<web::Json<SubscriptionView>> {
    state.identity.resolve_or_create(caller.client_id()).await?;
    let view = state
        .subscriptions
        .subscription_view(caller.client_id())
        .await?;
    Ok(web::Json(view))
}
