use axum::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Serialize, ToSchema)]
pub struct VerifyResponseDoc {
    pub valid: bool,
    /// Present only when `valid` is false
    pub reason: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorDoc {
    pub error: String,
}

#[derive(Serialize, ToSchema)]
pub struct LegacyAddedDoc {
    pub success: bool,
    pub added: String,
}

#[derive(Serialize, ToSchema)]
pub struct LegacyRemovedDoc {
    pub success: bool,
    pub removed: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::public::verify,
        crate::routes::legacy::add_key,
        crate::routes::legacy::remove_key,
    ),
    components(schemas(VerifyResponseDoc, ErrorDoc, LegacyAddedDoc, LegacyRemovedDoc)),
    tags(
        (name = "verify", description = "Public key verification"),
        (name = "legacy", description = "Credential-in-query key management (optional)")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
