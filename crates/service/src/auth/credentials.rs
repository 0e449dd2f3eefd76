use std::collections::HashMap;

use argon2::{password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString}, Argon2};
use rand::rngs::OsRng;

use super::errors::AuthError;

/// Fixed admin credential table. Passwords are held only as argon2 hashes.
pub struct AdminCredentials {
    hashes: HashMap<String, String>,
    // verified for unknown usernames so both failure paths cost the same
    dummy_hash: String,
}

impl AdminCredentials {
    /// Build the table from `username -> password` pairs. A password that is
    /// already an argon2 PHC string (`$argon2...`) is used as-is; anything
    /// else is treated as plaintext and hashed now.
    pub fn from_entries<I, U, P>(entries: I) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: AsRef<str>,
    {
        let mut hashes = HashMap::new();
        for (user, password) in entries {
            let user = user.into();
            let password = password.as_ref();
            if user.trim().is_empty() || password.is_empty() {
                return Err(AuthError::Config("admin username and password must be non-empty".into()));
            }
            let hash = if password.starts_with("$argon2") {
                PasswordHash::new(password)
                    .map_err(|e| AuthError::Config(format!("invalid argon2 hash for admin `{user}`: {e}")))?;
                password.to_string()
            } else {
                hash_password(password)?
            };
            hashes.insert(user, hash);
        }
        if hashes.is_empty() {
            return Err(AuthError::Config("at least one admin credential is required".into()));
        }
        let dummy_hash = hash_password("keygate-dummy-password")?;
        Ok(Self { hashes, dummy_hash })
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Check a username/password pair. Argon2 verification is constant-time
    /// in the password; unknown users still pay for one verification.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let (hash, known) = match self.hashes.get(username) {
            Some(h) => (h.as_str(), true),
            None => (self.dummy_hash.as_str(), false),
        };
        let matches = PasswordHash::new(hash)
            .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
            .unwrap_or(false);
        known && matches
    }
}

/// Hash a password with argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}
