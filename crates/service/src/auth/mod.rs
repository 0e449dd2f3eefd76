//! Admin authentication: a static credential table checked with argon2 and
//! signed, expiring session tokens.

pub mod credentials;
pub mod domain;
pub mod errors;
pub mod service;
pub mod session;

pub use credentials::AdminCredentials;
pub use service::AdminAuthService;
pub use session::SessionSigner;
