//! Access and refresh tokens.
//!
//! Access tokens are short-lived HS256 JWTs. Refresh tokens are opaque random
//! strings; the database only ever sees their SHA-256 digest.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shop_core::types::{DbId, Timestamp};
use uuid::Uuid;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// `"staff"` or `"customer"` at issue time.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signing secret and token lifetimes. Built by
/// [`ServerConfig::from_env`](crate::config::ServerConfig::from_env).
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// Expiry instant for a refresh token issued now.
    pub fn refresh_expires_at(&self) -> Timestamp {
        Utc::now() + Duration::days(self.refresh_token_expiry_days)
    }

    /// Sign an access token for `user_id`.
    pub fn issue(&self, user_id: DbId, role: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role: role.to_owned(),
            exp: iat + self.access_ttl_secs(),
            iat,
            jti: Uuid::new_v4().to_string(),
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check signature, algorithm and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
    }
}

/// A freshly minted refresh token. `plaintext` goes to the client, `hash`
/// to `user_sessions`.
#[derive(Debug)]
pub struct RefreshToken {
    pub plaintext: String,
    pub hash: String,
}

impl RefreshToken {
    pub fn generate() -> Self {
        let plaintext = Uuid::new_v4().simple().to_string();
        let hash = hash_refresh_token(&plaintext);
        Self { plaintext, hash }
    }
}

/// Lowercase hex SHA-256 of a presented refresh token.
pub fn hash_refresh_token(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
