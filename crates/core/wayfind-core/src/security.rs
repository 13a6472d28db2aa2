//! Security features: password hashing and bearer-token issuance

use crate::{Result, WayfindError};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString},
    Argon2, PasswordHasher,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Hash a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| WayfindError::other(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against its stored Argon2 hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| WayfindError::auth(format!("Invalid password hash format: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Bearer-token claims: subject email and expiry
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// Issues and resolves signed, time-limited bearer tokens (HS256)
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_days: i64,
}

impl TokenIssuer {
    /// Create an issuer from a shared secret and a token lifetime in days
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_days,
        }
    }

    /// Issue a token for the given subject, expiring after the configured lifetime
    pub fn issue(&self, subject: &str) -> Result<String> {
        let expires_at = chrono::Utc::now() + chrono::Duration::days(self.ttl_days);
        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| WayfindError::auth(format!("Failed to issue token: {}", e)))
    }

    /// Resolve a token back to its subject.
    ///
    /// Fails with an auth error for malformed, tampered, or expired tokens.
    pub fn resolve(&self, token: &str) -> Result<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| WayfindError::auth(format!("Invalid token: {}", e)))?;
        Ok(data.claims.sub)
    }
}
