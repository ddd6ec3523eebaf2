//! OpenAPI schema wrappers shared across endpoint annotations.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ErrorCode;

/// OpenAPI view of the error envelope returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    #[schema(example = "not_found")]
    pub code: ErrorCode,
    #[schema(example = "marker 3fa85f64 not found")]
    pub message: String,
    #[schema(example = "01986a60-7f6e-7d3a-b2f1-2c963f66afa6")]
    pub trace_id: Option<String>,
    pub details: Option<Value>,
}
