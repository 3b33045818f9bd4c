//! Password hashing and the password-change policy.
//!
//! Hashing sits behind the `PasswordHasher` trait so `AppState` can carry a
//! cheap-cost hasher in tests. `BcryptHasher` runs bcrypt on the blocking pool.

use async_trait::async_trait;

use crate::errors::AppError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, AppError>;
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError>;
}

pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || {
            bcrypt::hash(password, cost).map_err(|e| AppError::Hashing(e.to_string()))
        })
        .await
        .map_err(|e| AppError::Hashing(format!("Task join error: {e}")))?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || {
            bcrypt::verify(password, &hash).map_err(|e| AppError::Hashing(e.to_string()))
        })
        .await
        .map_err(|e| AppError::Hashing(format!("Task join error: {e}")))?
    }
}

/// Checks a requested new password against the change policy.
///
/// Rejects passwords shorter than six characters or longer than bcrypt's 72
/// bytes. Also rejects a confirmation that does not match and a password equal
/// to the enrollment id, which is the temporary password handed out at registration.
pub fn validate_new_password(
    enrollment_id: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<(), AppError> {
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if new_password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::validation(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    if new_password != confirm_password {
        return Err(AppError::validation("Passwords do not match"));
    }
    if new_password == enrollment_id {
        return Err(AppError::validation(
            "Password cannot be the same as the enrollment id",
        ));
    }
    Ok(())
}
