//! Session cookie handling and the gate in front of key mutations.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "admin_session";

/// Authenticated admin, inserted into request extensions by the gate.
#[derive(Clone, Debug)]
pub struct AdminUser(pub String);

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// Cookie value that makes the browser drop the session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookie
}

/// Username of the admin behind the request's session cookie, if valid.
pub fn current_admin(state: &AppState, jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| state.auth.session_user(c.value()))
}

/// Middleware: reject with 403 unless a valid admin session cookie is
/// present. Runs before the handler extracts its payload.
pub async fn require_admin_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user) = current_admin(&state, &jar) else {
        warn!(path = %req.uri().path(), "admin mutation without a valid session");
        return Err(AppError::Forbidden("forbidden"));
    };
    req.extensions_mut().insert(AdminUser(user));
    Ok(next.run(req).await)
}
