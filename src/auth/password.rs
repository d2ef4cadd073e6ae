//! bcrypt password hashing.
//!
//! Hashing is CPU-bound, so both directions run on tokio's blocking pool.

use crate::errors::AppError;

pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// `false` for a mismatch and for a stored value that is not a bcrypt hash.
pub async fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed)).await?;
    Ok(valid.unwrap_or(false))
}
