use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use super::credentials::AdminCredentials;
use super::domain::{AdminLogin, AuthSession};
use super::errors::AuthError;
use super::session::SessionSigner;

/// Admin authentication service independent of web framework
pub struct AdminAuthService {
    credentials: Arc<AdminCredentials>,
    signer: SessionSigner,
}

impl AdminAuthService {
    pub fn new(credentials: AdminCredentials, signer: SessionSigner) -> Self {
        Self { credentials: Arc::new(credentials), signer }
    }

    /// Build from the configured admin table and session settings.
    pub fn from_config(
        admins: &std::collections::BTreeMap<String, String>,
        session: &configs::SessionConfig,
    ) -> Result<Self, AuthError> {
        let credentials = AdminCredentials::from_entries(admins.iter().map(|(u, p)| (u.clone(), p)))?;
        let signer = SessionSigner::new(&session.secret, Duration::from_secs(session.ttl_secs))?;
        info!(admins = credentials.len(), ttl_secs = session.ttl_secs, "admin auth ready");
        Ok(Self::new(credentials, signer))
    }

    /// Check a username/password pair against the credential table. The
    /// argon2 work runs on the blocking pool.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let creds = Arc::clone(&self.credentials);
        let (user, pass) = (username.to_string(), password.to_string());
        let ok = tokio::task::spawn_blocking(move || creds.verify(&user, &pass))
            .await
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        if ok {
            Ok(())
        } else {
            warn!("admin credential check failed");
            Err(AuthError::Unauthorized)
        }
    }

    /// Authenticate and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use service::auth::{AdminAuthService, AdminCredentials, SessionSigner, domain::AdminLogin};
    ///
    /// let creds = AdminCredentials::from_entries([("admin", "hunter2")]).unwrap();
    /// let signer = SessionSigner::new("secret", Duration::from_secs(600)).unwrap();
    /// let svc = AdminAuthService::new(creds, signer);
    /// let session = tokio_test::block_on(svc.login(AdminLogin { username: "admin".into(), password: "hunter2".into() })).unwrap();
    /// assert_eq!(svc.session_user(&session.token).as_deref(), Some("admin"));
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: AdminLogin) -> Result<AuthSession, AuthError> {
        self.authenticate(&input.username, &input.password).await?;
        let (token, expires_at) = self.signer.issue(&input.username)?;
        info!(%expires_at, "admin_login");
        Ok(AuthSession { username: input.username, token, expires_at })
    }

    /// Username carried by a valid, unexpired session token.
    pub fn session_user(&self, token: &str) -> Option<String> {
        self.signer.verify(token).ok().map(|claims| claims.sub)
    }
}
