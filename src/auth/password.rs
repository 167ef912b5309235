// Password hashing with Argon2id
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};
use crate::errors::{AppError, Result};

/// Argon2id with OWASP parameters: 19 MiB memory, 2 iterations, 1 lane
fn hasher() -> Result<Argon2<'static>> {
    let params = Params::new(19456, 2, 1, Some(32))
        .map_err(|e| AppError::Cryptographic(format!("Failed to create Argon2 params: {}", e)))?;

    Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password, rejecting anything shorter than `min_length`
pub fn hash_password(password: &str, min_length: usize) -> Result<String> {
    if password.is_empty() {
        return Err(AppError::ValidationError("invalid input".to_string()));
    }

    if password.chars().count() < min_length {
        return Err(AppError::ValidationError(format!(
            "password must be at least {} characters",
            min_length
        )));
    }

    let salt = SaltString::generate(&mut OsRng);

    let password_hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Cryptographic(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored PHC hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Cryptographic(format!("Failed to parse password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => {
            tracing::error!("Password verification error: {}", e);
            Err(AppError::Cryptographic(format!("Password verification error: {}", e)))
        }
    }
}
