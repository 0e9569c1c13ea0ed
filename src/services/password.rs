use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier, Version};
use std::fmt;

use crate::errors::InternalError;

/// One-way credential hashing with Argon2id
///
/// Hashes carry their own random salt; a process-level pepper is mixed in as
/// the Argon2 secret parameter so leaked database rows alone are not enough
/// to attack offline. Plaintext never leaves this module.
pub struct PasswordHasher {
    pepper: String,
}

impl PasswordHasher {
    pub fn new(pepper: String) -> Self {
        Self { pepper }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a plaintext password for storage
    pub fn hash(&self, plaintext: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("hash_password", e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// A malformed stored hash verifies as false rather than erroring; the
    /// comparison itself is constant-time inside the argon2 crate.
    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        let Ok(argon2) = self.argon2() else {
            return false;
        };

        argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("pepper", &"<redacted>")
            .finish()
    }
}
