//! Translation of domain failures into HTTP responses.
//!
//! Handlers return [`ApiResult`]; the [`ApiError`] envelope carries the
//! stable error code, a message, optional structured details, and the
//! request's trace id so clients can quote it back when reporting problems.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error as DomainError, ErrorCode};
use crate::middleware::trace::{TRACE_ID_HEADER, TraceId};

fn http_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::InsufficientPoints => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error envelope returned by every REST endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[schema(example = "marker 3fa85f64 not found")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    fn envelope(code: ErrorCode, message: String, details: Option<Value>) -> Self {
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details,
        }
    }

    /// The envelope's stable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The envelope's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Internal failures go out with a generic message; the trace id is the
    /// handle for finding the real cause in the logs.
    fn redacted(&self) -> Self {
        Self {
            code: self.code,
            message: "Internal server error".to_owned(),
            trace_id: self.trace_id.clone(),
            details: None,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(source: DomainError) -> Self {
        Self::envelope(
            source.code(),
            source.message().to_owned(),
            source.details().cloned(),
        )
    }
}

impl From<actix_web::Error> for ApiError {
    fn from(source: actix_web::Error) -> Self {
        error!(error = %source, "framework error surfaced through the API envelope");
        Self::envelope(
            ErrorCode::InternalError,
            "Internal server error".to_owned(),
            None,
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        http_status(self.code)
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.as_str()));
        }
        if self.code == ErrorCode::InternalError {
            builder.json(self.redacted())
        } else {
            builder.json(self)
        }
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
