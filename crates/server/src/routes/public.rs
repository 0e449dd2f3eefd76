use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use common::types::VerifyResponse;
use serde::Deserialize;
use service::keys::Verification;
use utoipa::IntoParams;

use crate::state::AppState;

pub const NO_KEY_REASON: &str = "No API key provided";
pub const INVALID_KEY_REASON: &str = "Invalid or expired API key";

pub async fn home() -> &'static str {
    "API Key Server is running!"
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyQuery {
    /// Candidate API key
    pub key: Option<String>,
}

#[utoipa::path(
    get,
    path = "/verify",
    tag = "verify",
    params(VerifyQuery),
    responses(
        (status = 200, description = "Key is valid", body = crate::openapi::VerifyResponseDoc),
        (status = 400, description = "No key supplied", body = crate::openapi::VerifyResponseDoc),
        (status = 401, description = "Unknown key", body = crate::openapi::VerifyResponseDoc)
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    Query(q): Query<VerifyQuery>,
) -> (StatusCode, Json<VerifyResponse>) {
    match state.keys.verify(q.key.as_deref()).await {
        Verification::Valid => (StatusCode::OK, Json(VerifyResponse::valid())),
        Verification::Missing => (StatusCode::BAD_REQUEST, Json(VerifyResponse::invalid(NO_KEY_REASON))),
        Verification::Invalid => (StatusCode::UNAUTHORIZED, Json(VerifyResponse::invalid(INVALID_KEY_REASON))),
    }
}
