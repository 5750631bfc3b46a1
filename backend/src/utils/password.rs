use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hashes any secret (password or refresh token) into an argon2 PHC string.
pub fn hash_secret(secret: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to hash secret: {}", e))
}

/// Returns `Ok(false)` on mismatch and `Err` only when the stored hash is unusable.
pub fn verify_secret(secret: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid secret hash: {}", e))?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Secret verification error: {}", e)),
    }
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    hash_secret(password)
}

pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    verify_secret(password, hash)
}
