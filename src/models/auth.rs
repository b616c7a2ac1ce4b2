//! Authentication Models
//!
//! Session token claims and the per-request user context extracted from them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by a session token
///
/// The payload deliberately wraps nothing but the user id: the token proves
/// prior authentication, all profile data is looked up per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiration, seconds since epoch
    pub exp: i64,
}

/// Authenticated user context available to handlers behind the auth layer
#[derive(Debug, Clone, Copy)]
pub struct UserContext {
    pub user_id: Uuid,
}

impl UserContext {
    pub fn from_claims(claims: &Claims) -> Result<Self, uuid::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
        })
    }
}
