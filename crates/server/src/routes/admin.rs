//! Admin console: login/logout and form-driven key mutations.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use service::auth::domain::AdminLogin;
use service::auth::errors::AuthError;
use service::keystore::mask_key;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::session::{self, AdminUser, SESSION_COOKIE};
use crate::state::AppState;
use crate::views::{self, Notice};

const LOGIN_FAILED: &str = "Invalid username or password";

#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeyForm {
    #[serde(default)]
    pub key: String,
}

/// Dashboard for a signed-in admin, login form for everyone else. A stale
/// cookie is dropped on the way.
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(q): Query<NoticeQuery>,
) -> Result<Response, AppError> {
    match session::current_admin(&state, &jar) {
        Some(user) => {
            let keys = state.keys.list_sorted().await?;
            let notice = q.notice.as_deref().and_then(Notice::parse);
            Ok(views::dashboard(&user, &keys, notice).into_response())
        }
        None if jar.get(SESSION_COOKIE).is_some() => {
            Ok((jar.remove(session::removal_cookie()), views::login_page(None)).into_response())
        }
        None => Ok(views::login_page(None).into_response()),
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(input): Form<AdminLogin>,
) -> Result<Response, AppError> {
    match state.auth.login(input).await {
        Ok(s) => {
            info!(event = "admin_login", admin = %s.username, expires_at = %s.expires_at, "admin signed in");
            let jar = jar.add(session::session_cookie(s.token, state.secure_cookie));
            Ok((jar, Redirect::to("/admin")).into_response())
        }
        Err(AuthError::Unauthorized) => {
            warn!(event = "admin_login_failed", "rejected admin login");
            Ok((StatusCode::UNAUTHORIZED, views::login_page(Some(LOGIN_FAILED))).into_response())
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.remove(session::removal_cookie()), Redirect::to("/admin"))
}

pub async fn add_key(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    Form(form): Form<KeyForm>,
) -> Result<Redirect, AppError> {
    let key = form.key.trim();
    if key.is_empty() {
        return Err(AppError::BadRequest("key must not be empty".into()));
    }
    let notice = if state.keys.add(key).await? { Notice::Added } else { Notice::Exists };
    info!(event = "key_add", admin = %admin, key = %mask_key(key), outcome = notice.as_str());
    Ok(Redirect::to(&notice.redirect_target()))
}

pub async fn remove_key(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    Form(form): Form<KeyForm>,
) -> Result<Redirect, AppError> {
    let key = form.key.trim();
    let notice = if !key.is_empty() && state.keys.remove(key).await? {
        Notice::Removed
    } else {
        Notice::Absent
    };
    info!(event = "key_remove", admin = %admin, key = %mask_key(key), outcome = notice.as_str());
    Ok(Redirect::to(&notice.redirect_target()))
}
