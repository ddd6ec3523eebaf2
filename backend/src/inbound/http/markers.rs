//! Marker HTTP handlers.
//!
//! ```text
//! GET  /api/v1/markers
//! POST /api/v1/markers
//! GET  /api/v1/markers/{id}
//! POST /api/v1/markers/{id}/confirm
//! POST /api/v1/markers/{id}/comment
//! POST /api/v1/markers/{id}/rate
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::MarkerDetail;
use crate::domain::{Comment, Error, Location, Marker, MarkerDraft, MarkerId, Rating};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::state::HttpState;

/// Query parameters accepted by the marker listing.
#[derive(Debug, Deserialize)]
pub struct ListMarkersQuery {
    /// Comma-separated set of marker types to keep.
    types: Option<String>,
}

/// Request payload for submitting a marker.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMarkerRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Location,
}

/// Request payload for commenting on a marker.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub text: String,
}

/// Request payload for rating a marker.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RateRequest {
    pub value: i32,
}

/// Envelope wrapping a marker.
#[derive(Debug, Serialize, ToSchema)]
pub struct MarkerEnvelope {
    pub marker: Marker,
}

/// Envelope wrapping a comment.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentEnvelope {
    pub comment: Comment,
}

/// Envelope wrapping a rating.
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingEnvelope {
    pub rating: Rating,
}

/// An id that does not parse cannot name a stored marker, so it surfaces as
/// the same NotFound an unknown-but-well-formed id produces.
fn parse_marker_id(raw: &str) -> Result<MarkerId, Error> {
    MarkerId::parse(raw).map_err(|_| Error::not_found(format!("marker {raw} not found")))
}

fn parse_type_filter(raw: Option<String>) -> Option<Vec<String>> {
    raw.map(|value| value.split(',').map(str::to_owned).collect())
}

/// List active markers, optionally filtered by type.
#[utoipa::path(
    get,
    path = "/api/v1/markers",
    params(
        ("client_id" = String, Query, description = "Opaque caller identifier"),
        ("types" = Option<String>, Query, description = "Comma-separated marker types")
    ),
    responses(
        (status = 200, description = "Active markers", body = [Marker]),
        (status = 400, description = "Missing client_id", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["markers"],
    operation_id = "listMarkers"
)]
#[get("/markers")]
pub async fn list_markers(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
    query: web::Query<ListMarkersQuery>,
) -> ApiResult<web::Json<Vec<Marker>>> {
    state.identity.resolve_or_create(caller.client_id()).await?;
    let kinds = parse_type_filter(query.into_inner().types);
    let markers = state.marker_query.list(kinds).await?;
    Ok(web::Json(markers))
}

/// Submit a marker; it stays pending until moderated elsewhere.
#[utoipa::path(
    post,
    path = "/api/v1/markers",
    params(("client_id" = String, Query, description = "Opaque caller identifier")),
    request_body = CreateMarkerRequest,
    responses(
        (status = 200, description = "Created marker", body = Marker),
        (status = 400, description = "Missing client_id", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["markers"],
    operation_id = "createMarker"
)]
#[post("/markers")]
pub async fn create_marker(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
    payload: web::Json<CreateMarkerRequest>,
) -> ApiResult<web::Json<Marker>> {
    let user = state.identity.resolve_or_create(caller.client_id()).await?;
    let CreateMarkerRequest {
        kind,
        title,
        description,
        location,
    } = payload.into_inner();
    let marker = state
        .marker_command
        .create(
            &user.id,
            MarkerDraft {
                kind,
                title,
                description,
                location,
            },
        )
        .await?;
    Ok(web::Json(marker))
}

/// Marker detail with comments, mean rating, and the caller's own rating.
#[utoipa::path(
    get,
    path = "/api/v1/markers/{id}",
    params(
        ("id" = String, Path, description = "Marker identifier"),
        ("client_id" = String, Query, description = "Opaque caller identifier")
    ),
    responses(
        (status = 200, description = "Marker detail", body = MarkerDetail),
        (status = 404, description = "Unknown marker", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["markers"],
    operation_id = "markerDetail"
)]
#[get("/markers/{id}")]
pub async fn marker_detail(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MarkerDetail>> {
    state.identity.resolve_or_create(caller.client_id()).await?;
    let id = parse_marker_id(&path.into_inner())?;
    let detail = state.marker_query.detail(&id, caller.client_id()).await?;
    Ok(web::Json(detail))
}

/// Confirm a marker; idempotent per caller.
#[utoipa::path(
    post,
    path = "/api/v1/markers/{id}/confirm",
    params(
        ("id" = String, Path, description = "Marker identifier"),
        ("client_id" = String, Query, description = "Opaque caller identifier")
    ),
    responses(
        (status = 200, description = "Marker after confirmation", body = MarkerEnvelope),
        (status = 404, description = "Unknown marker", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["markers"],
    operation_id = "confirmMarker"
)]
#[post("/markers/{id}/confirm")]
pub async fn confirm_marker(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MarkerEnvelope>> {
    state.identity.resolve_or_create(caller.client_id()).await?;
    let id = parse_marker_id(&path.into_inner())?;
    let marker = state
        .marker_command
        .confirm(&id, caller.client_id())
        .await?;
    Ok(web::Json(MarkerEnvelope { marker }))
}

/// Attach a comment to a marker.
#[utoipa::path(
    post,
    path = "/api/v1/markers/{id}/comment",
    params(
        ("id" = String, Path, description = "Marker identifier"),
        ("client_id" = String, Query, description = "Opaque caller identifier")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Created comment", body = CommentEnvelope),
        (status = 404, description = "Unknown marker", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["markers"],
    operation_id = "commentMarker"
)]
#[post("/markers/{id}/comment")]
pub async fn comment_marker(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<CommentEnvelope>> {
    state.identity.resolve_or_create(caller.client_id()).await?;
    let id = parse_marker_id(&path.into_inner())?;
    let comment = state
        .marker_command
        .comment(&id, caller.client_id(), payload.into_inner().text)
        .await?;
    Ok(web::Json(CommentEnvelope { comment }))
}

/// Rate a marker; re-rating overwrites the caller's previous value.
#[utoipa::path(
    post,
    path = "/api/v1/markers/{id}/rate",
    params(
        ("id" = String, Path, description = "Marker identifier"),
        ("client_id" = String, Query, description = "Opaque caller identifier")
    ),
    request_body = RateRequest,
    responses(
        (status = 200, description = "Stored rating", body = RatingEnvelope),
        (status = 404, description = "Unknown marker", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["markers"],
    operation_id = "rateMarker"
)]
#[post("/markers/{id}/rate")]
pub async fn rate_marker(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
    path: web::Path<String>,
    payload: web::Json<RateRequest>,
) -> ApiResult<web::Json<RatingEnvelope>> {
    state.identity.resolve_or_create(caller.client_id()).await?;
    let id = parse_marker_id(&path.into_inner())?;
    let rating = state
        .marker_command
        .rate(&id, caller.client_id(), payload.into_inner().value)
        .await?;
    Ok(web::Json(RatingEnvelope { rating }))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    fn unparseable_marker_ids_read_as_not_found() {
        let error = parse_marker_id("definitely-not-a-uuid").expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("fuel".to_owned()), Some(vec!["fuel".to_owned()]))]
    #[case(
        Some("fuel,water".to_owned()),
        Some(vec!["fuel".to_owned(), "water".to_owned()])
    )]
    fn type_filter_splits_on_commas(
        #[case] raw: Option<String>,
        #[case] expected: Option<Vec<String>>,
    ) {
        assert_eq!(parse_type_filter(raw), expected);
    }
}
