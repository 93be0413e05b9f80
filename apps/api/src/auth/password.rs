//! Argon2id password hashing. Hashing is CPU-bound, so the async entry points
//! run it on the blocking pool.

use anyhow::anyhow;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;

/// Verified against when the username does not exist, so unknown and known
/// usernames cost the same amount of work.
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_password_sync("resume-critic-dummy-password").unwrap_or_default());

/// Hashes `password` with Argon2id and a fresh random salt, returning a PHC string.
pub async fn hash_password(password: &str) -> anyhow::Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password_sync(&password))
        .await
        .map_err(|e| anyhow!("password hashing task failed: {e}"))?
}

/// Checks a login attempt. `stored_hash` is `None` when no such user exists;
/// the password is then checked against a dummy hash and always rejected.
pub async fn verify_login(password: &str, stored_hash: Option<String>) -> bool {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            verify_password(&password, &DUMMY_HASH);
            false
        }
    })
    .await
    .unwrap_or(false)
}

fn hash_password_sync(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("password hashing failed: {e}"))
}

/// True when `password` matches the stored PHC string. A malformed hash never matches.
fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
