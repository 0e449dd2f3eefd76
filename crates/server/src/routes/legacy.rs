//! Credential-in-query key management, mounted only when enabled.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use service::auth::errors::AuthError;
use service::keystore::mask_key;
use tracing::{info, warn};
use utoipa::IntoParams;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LegacyParams {
    /// Admin username
    pub user: Option<String>,
    /// Admin password
    pub pass: Option<String>,
    /// Key to add or remove
    pub key: Option<String>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl LegacyParams {
    /// All three values, key trimmed. Any missing or blank one is a 400.
    fn into_parts(self) -> Result<(String, String, String), AppError> {
        match (non_blank(self.user), non_blank(self.pass), non_blank(self.key)) {
            (Some(user), Some(pass), Some(key)) => Ok((user, pass, key.trim().to_string())),
            _ => Err(AppError::BadRequest("Missing parameters".into())),
        }
    }
}

async fn authorize(state: &AppState, user: &str, pass: &str) -> Result<(), AppError> {
    match state.auth.authenticate(user, pass).await {
        Ok(()) => Ok(()),
        Err(AuthError::Unauthorized) => {
            warn!(event = "legacy_auth_failed", "rejected legacy credentials");
            Err(AppError::Forbidden("Unauthorized"))
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

#[utoipa::path(
    get,
    path = "/add_key",
    tag = "legacy",
    params(LegacyParams),
    responses(
        (status = 200, description = "Added, or already present", body = crate::openapi::LegacyAddedDoc),
        (status = 400, description = "Missing parameters", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Bad credentials", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn add_key(
    State(state): State<AppState>,
    Query(params): Query<LegacyParams>,
) -> Result<Json<Value>, AppError> {
    let (user, pass, key) = params.into_parts()?;
    authorize(&state, &user, &pass).await?;
    if state.keys.add(&key).await? {
        info!(event = "key_add", admin = %user, key = %mask_key(&key), via = "legacy");
        Ok(Json(json!({ "success": true, "added": key })))
    } else {
        Ok(Json(json!({ "message": "Key already exists" })))
    }
}

#[utoipa::path(
    get,
    path = "/remove_key",
    tag = "legacy",
    params(LegacyParams),
    responses(
        (status = 200, description = "Removed", body = crate::openapi::LegacyRemovedDoc),
        (status = 400, description = "Missing parameters", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Bad credentials", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Key not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn remove_key(
    State(state): State<AppState>,
    Query(params): Query<LegacyParams>,
) -> Result<Json<Value>, AppError> {
    let (user, pass, key) = params.into_parts()?;
    authorize(&state, &user, &pass).await?;
    if state.keys.remove(&key).await? {
        info!(event = "key_remove", admin = %user, key = %mask_key(&key), via = "legacy");
        Ok(Json(json!({ "success": true, "removed": key })))
    } else {
        Err(AppError::NotFound("Key not found"))
    }
}
