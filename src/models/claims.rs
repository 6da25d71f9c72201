//! Bearer token claims.
//!
//! Tokens are issued by the identity provider in front of this service; the
//! server only verifies them.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims of an authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserClaims {
    /// Subject (user login)
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(sub: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
