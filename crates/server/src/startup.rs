use std::future::Future;
use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use service::auth::AdminAuthService;
use service::runtime;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the key store and admin auth from configuration.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let auth = AdminAuthService::from_config(&cfg.admins, &cfg.session)
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let keys = runtime::build_key_service(cfg).await?;
    Ok(AppState {
        keys,
        auth: Arc::new(auth),
        secure_cookie: cfg.session.secure_cookie,
        legacy_endpoints: cfg.server.legacy_endpoints,
    })
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Bind the configured address and run until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    if state.legacy_endpoints {
        info!(event = "legacy_enabled", "credential-in-query endpoints are mounted");
    }
    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(service = "keygate", backend = state.keys.backend(), %addr, "listening");

    serve(listener, build_app(state), shutdown).await?;
    info!(service = "keygate", "server stopped");
    Ok(())
}
