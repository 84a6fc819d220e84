//! Salted one-way password digests (Argon2, PHC-encoded)

use anyhow::{Context, Result};
use rand::RngCore;

const SALT_LEN: usize = 16;

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(plaintext: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    argon2::hash_encoded(plaintext.as_bytes(), &salt, &argon2::Config::default())
        .context("Failed to hash password")
}

/// Check a plaintext password against a stored digest
///
/// A malformed digest never verifies.
pub fn verify_password(digest: &str, plaintext: &str) -> bool {
    match argon2::verify_encoded(digest, plaintext.as_bytes()) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored password digest could not be verified: {}", e);
            false
        }
    }
}
