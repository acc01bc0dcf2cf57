use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use chrono::Utc;
use rand_core::OsRng;

use market_domain::validate::{PASSWORD_LEN, ValidationErrors, check_len};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;

/// Hash a plaintext password with Argon2id and a random salt.
pub fn hash_password(plaintext: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored hash. An unparseable hash
/// verifies as false rather than erroring.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// New-password policy (8–72 characters), reported as a field-scoped error.
pub fn validate_new_password(password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_len(&mut errors, "password", password, PASSWORD_LEN);
    errors.into_result()
}

// ── ChangePassword ───────────────────────────────────────────────────────────

pub struct ChangePasswordInput {
    pub old_password: String,
    pub password: String,
}

pub struct ChangePasswordUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> ChangePasswordUseCase<R> {
    pub async fn execute(
        &self,
        user: &User,
        input: ChangePasswordInput,
    ) -> Result<(), ApiError> {
        if input.old_password.is_empty() || input.password.is_empty() {
            return Err(ApiError::MissingPasswordPair);
        }
        if !verify_password(&input.old_password, &user.password_hash) {
            return Err(ApiError::OldPasswordMismatch);
        }
        validate_new_password(&input.password).map_err(ApiError::Validation)?;

        let hash = hash_password(&input.password)?;
        // Moving the watermark revokes every token issued before this instant.
        self.users.update_password(user.id, &hash, Utc::now()).await
    }
}
