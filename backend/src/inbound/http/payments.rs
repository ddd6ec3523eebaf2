//! Payment HTTP handlers.
//!
//! ```text
//! POST /api/v1/payments/create
//! POST /api/v1/payments/enot/webhook
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::PaymentIntent;
use crate::domain::{Error, PaymentId, PaymentPlan, PaymentStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::state::HttpState;

/// Request payload for creating a payment intent.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub plan: PaymentPlan,
}

/// Provider delivery reporting a payment status change.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub payment_id: String,
    pub status: String,
    /// Correlation hint the provider echoes back; not used by the state
    /// machine.
    #[serde(rename = "client_id")]
    pub client_id: Option<String>,
    pub meta: Option<Value>,
}

/// Acknowledgement envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

/// Create a payment intent and hand back the checkout link.
#[utoipa::path(
    post,
    path = "/api/v1/payments/create",
    params(("client_id" = String, Query, description = "Opaque caller identifier")),
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Checkout handle", body = PaymentIntent),
        (status = 400, description = "Missing client_id", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "createPayment"
)]
#[post("/payments/create")]
pub async fn create_payment(
    state: web::Data<HttpState>,
    caller: CallerIdentity,
    payload: web::Json<CreatePaymentRequest>,
) -> ApiResult<web::Json<PaymentIntent>> {
    let user = state.identity.resolve_or_create(caller.client_id()).await?;
    let intent = state
        .payments
        .create_payment(&user.id, payload.into_inner().plan)
        .await?;
    Ok(web::Json(intent))
}

/// Provider status callback. Carries no caller identity; when a shared
/// secret is configured the delivery signature is checked before the body is
/// even parsed.
#[utoipa::path(
    post,
    path = "/api/v1/payments/enot/webhook",
    request_body = WebhookPayload,
    responses(
        (status = 200, description = "Status applied", body = OkResponse),
        (status = 401, description = "Bad delivery signature", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown payment", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "paymentWebhook"
)]
#[post("/payments/enot/webhook")]
pub async fn payment_webhook(
    state: web::Data<HttpState>,
    request: actix_web::HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<OkResponse>> {
    state.webhook.verify(request.headers(), &body)?;

    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|err| Error::invalid_request(format!("malformed webhook payload: {err}")))?;
    if let Some(client_id) = payload.client_id.as_deref() {
        debug!(client_id, payment_id = %payload.payment_id, "webhook correlation hint");
    }

    let payment_id = PaymentId::parse(&payload.payment_id)
        .map_err(|_| Error::not_found(format!("payment {} not found", payload.payment_id)))?;
    state
        .payments
        .apply_webhook(
            &payment_id,
            PaymentStatus::from(payload.status),
            payload.meta,
        )
        .await?;

    Ok(web::Json(OkResponse { ok: true }))
}
