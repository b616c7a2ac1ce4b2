//! Password Hasher
//!
//! bcrypt hashing and verification behind a small injectable component.

use crate::service::ServiceResult;

/// Cost factor applied to new password hashes
pub const DEFAULT_PASSWORD_COST: u32 = 10;

/// One-way salted password hasher
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes a plaintext password with a per-hash random salt.
    pub fn hash(&self, plaintext: &str) -> ServiceResult<String> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// A malformed stored hash yields `false`, not an error: the caller must
    /// see "invalid credentials", never a server failure, and neither input
    /// is ever logged.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        bcrypt::verify(plaintext, hashed).unwrap_or(false)
    }
}
