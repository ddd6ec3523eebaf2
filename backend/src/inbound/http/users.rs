//! User identity and daily claim HTTP handlers.
//!
//! ```text
//! GET  /api/v1/users/me
//! POST /api/v1/users/daily-claim
//! ```

use actix_web::{get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::User;
use crate::domain::ports::DailyClaimOutcome;
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::state::HttpState;

/// Envelope wrapping the resolved user.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: User,
}

/// Resolve the caller, creating a user record on first contact.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    params(("client_id" = String, Query, description = "Opaque caller identifier")),
    responses(
        (status = 200, description = "Resolved user", body = UserEnvelope),
        (status = 400, description = "Missing client_id", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
) -> ApiResult<web::Json<UserEnvelope>> {
    let user = state.identity.resolve_or_create(caller.client_id()).await?;
    Ok(web::Json(UserEnvelope { user }))
}

/// Claim the once-per-day points grant.
#[utoipa::path(
    post,
    path = "/api/v1/users/daily-claim",
    params(("client_id" = String, Query, description = "Opaque caller identifier")),
    responses(
        (status = 200, description = "Claim outcome", body = DailyClaimOutcome),
        (status = 400, description = "Missing client_id", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "dailyClaim"
)]
#[post("/users/daily-claim")]
pub async fn daily_claim(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
) -> ApiResult<web::Json<DailyClaimOutcome>> {
    state.identity.resolve_or_create(caller.client_id()).await?;
    let outcome = state.daily_claim.claim_daily(caller.client_id()).await?;
    Ok(web::Json(outcome))
}
