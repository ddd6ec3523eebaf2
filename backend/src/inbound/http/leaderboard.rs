//! Leaderboard HTTP handler.

use actix_web::{get, web};

use crate::domain::ports::LeaderboardEntry;
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::state::HttpState;

/// Top users by points.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    params(("client_id" = String, Query, description = "Opaque caller identifier")),
    responses(
        (status = 200, description = "Ranked users", body = [LeaderboardEntry]),
        (status = 400, description = "Missing client_id", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["leaderboard"],
    operation_id = "leaderboard"
)]
#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
) -> ApiResult<web::Json<Vec<LeaderboardEntry>>> {
    state.identity.resolve_or_create(caller.client_id()).await?;
    let entries = state.leaderboard.top().await?;
    Ok(web::Json(entries))
}
