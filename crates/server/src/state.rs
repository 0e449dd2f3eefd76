use std::sync::Arc;

use service::auth::AdminAuthService;
use service::keys::KeyService;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub keys: KeyService,
    pub auth: Arc<AdminAuthService>,
    /// Set the `Secure` attribute on the session cookie.
    pub secure_cookie: bool,
    /// Mount the credential-in-query endpoints.
    pub legacy_endpoints: bool,
}
