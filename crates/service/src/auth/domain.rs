use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login form input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminLogin {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login: the signed token to hand back as a cookie.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub username: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Claims carried inside a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
