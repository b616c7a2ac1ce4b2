//! JWT Session Token Service
//!
//! Signs and validates the HS256 session tokens returned by login. The
//! payload wraps the user id only; see [`crate::models::Claims`].

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::models::{Claims, UserContext};

/// Signs and validates session tokens
#[derive(Clone)]
pub struct JwtService {
    secret: String,
    expires_in: Duration,
}

impl JwtService {
    /// Creates a service with the default 24 hour token lifetime
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expires_in: Duration::hours(24),
        }
    }

    pub fn with_expiration(secret: String, expires_in: Duration) -> Self {
        Self { secret, expires_in }
    }

    /// Issues a signed session token for the given user
    pub fn sign(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expires_in).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
    }

    /// Validates a session token and extracts the user context
    pub fn validate(&self, token: &str) -> Result<UserContext, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )?;

        UserContext::from_claims(&data.claims)
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject.into())
    }
}
