pub mod admin;
pub mod legacy;
pub mod public;

use axum::body::Body;
use axum::http::Request;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::openapi::openapi_json;
use crate::session::require_admin_session;
use crate::state::AppState;

/// Build the full application router: public verification, the admin
/// console, and the legacy endpoints when enabled.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(public::home))
        .route("/verify", get(public::verify))
        .route("/api-docs/openapi.json", get(openapi_json));

    let console = Router::new()
        .route("/admin", get(admin::index))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", get(admin::logout));

    // Session gate runs before the form body is read.
    let mutations = Router::new()
        .route("/admin/add_key", post(admin::add_key))
        .route("/admin/remove_key", post(admin::remove_key))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin_session));

    let mut app: Router<AppState> = public.merge(console).merge(mutations);
    if state.legacy_endpoints {
        app = app
            .route("/add_key", get(legacy::add_key))
            .route("/remove_key", get(legacy::remove_key));
    }

    app.with_state(state).layer(cors).layer(
        TraceLayer::new_for_http()
            // Path only: query strings carry keys and legacy passwords.
            .make_span_with(|req: &Request<Body>| {
                tracing::info_span!("request", method = %req.method(), path = %req.uri().path())
            })
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
