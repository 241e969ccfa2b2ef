use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::{error, warn};

lazy_static! {
    /// Hash checked when no account matches, so unknown emails cost a full verify.
    static ref DUMMY_HASH: Option<String> = hash_password("dummy-password-for-timing").ok();
}

/// Hashes `plain` with Argon2id and a fresh random salt, returning the PHC string.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            anyhow::anyhow!("password hashing failed: {e}")
        })
}

/// Constant-time check of `plain` against a PHC hash string.
/// A hash that cannot be parsed never matches.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// Runs a full verification against a fixed hash and discards the outcome.
/// Used on login paths that fail before a real hash is available.
pub fn verify_dummy_password(plain: &str) {
    match DUMMY_HASH.as_deref() {
        Some(hash) => {
            verify_password(plain, hash);
        }
        None => warn!("dummy password hash unavailable"),
    }
}
