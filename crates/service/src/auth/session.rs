use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::domain::SessionClaims;
use super::errors::AuthError;

/// Issues and checks HS256 session tokens with a fixed lifetime.
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionSigner {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::Config("session secret must not be empty".into()));
        }
        if ttl.is_zero() {
            return Err(AuthError::Config("session ttl must be positive".into()));
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Sign a token for `username`; returns the token and its expiry.
    pub fn issue(&self, username: &str) -> Result<(String, DateTime<Utc>), AuthError> {
        self.issue_at(username, Utc::now())
    }

    fn issue_at(&self, username: &str, now: DateTime<Utc>) -> Result<(String, DateTime<Utc>), AuthError> {
        let iat = now.timestamp();
        let exp = iat.saturating_add(self.ttl.as_secs().min(i64::MAX as u64) as i64);
        let claims = SessionClaims { sub: username.to_string(), iat, exp };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        let expires_at = Utc.timestamp_opt(exp, 0).single().unwrap_or(now);
        Ok((token, expires_at))
    }

    /// Validate signature and expiry; returns the claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new("test-secret", Duration::from_secs(3600)).unwrap()
    }

    #[test]
    fn issued_token_verifies() -> Result<(), AuthError> {
        let s = signer();
        let (token, expires_at) = s.issue("duong2024")?;
        let claims = s.verify(&token)?;
        assert_eq!(claims.sub, "duong2024");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(expires_at.timestamp(), claims.exp);
        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> Result<(), AuthError> {
        let s = signer();
        let (token, _) = s.issue_at("duong2024", Utc::now() - chrono::Duration::hours(2))?;
        assert!(matches!(s.verify(&token), Err(AuthError::InvalidSession)));
        Ok(())
    }

    #[test]
    fn token_from_other_secret_is_rejected() -> Result<(), AuthError> {
        let other = SessionSigner::new("another-secret", Duration::from_secs(3600))?;
        let (token, _) = other.issue("duong2024")?;
        assert!(matches!(signer().verify(&token), Err(AuthError::InvalidSession)));
        Ok(())
    }

    #[test]
    fn tampered_token_is_rejected() -> Result<(), AuthError> {
        let s = signer();
        let (token, _) = s.issue("duong2024")?;
        // swap in a payload for a different subject, keep the old signature
        let (forged, _) = SessionSigner::new("x", Duration::from_secs(60))?.issue("mallory")?;
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = &forged_payload;
        assert!(s.verify(&parts.join(".")).is_err());
        assert!(s.verify("not-a-token").is_err());
        Ok(())
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(SessionSigner::new(" ", Duration::from_secs(1)), Err(AuthError::Config(_))));
        assert!(matches!(SessionSigner::new("s", Duration::ZERO), Err(AuthError::Config(_))));
    }
}
