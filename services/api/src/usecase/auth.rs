use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use uuid::Uuid;

use market_auth_types::token::issue_access_token;
use market_domain::validate::{FULL_NAME_LEN, PASSWORD_LEN, ValidationErrors, check_email, check_len};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::usecase::credential::{hash_password, verify_password};

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

pub struct RegisterUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, ApiError> {
        let mut errors = ValidationErrors::default();
        check_email(&mut errors, "email", &input.email);
        check_len(&mut errors, "password", &input.password, PASSWORD_LEN);
        check_len(&mut errors, "full_name", &input.full_name, FULL_NAME_LEN);
        errors.into_result().map_err(ApiError::Validation)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: input.email,
            password_hash: hash_password(&input.password)?,
            full_name: input.full_name,
            room: None,
            phone: None,
            gender: None,
            identity_number: None,
            seller: false,
            admin: false,
            banned: false,
            accept_token_after: now,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub token: String,
    pub expires_at: u64,
}

pub struct LoginUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::LoginFailed)?;

        if user.banned {
            return Err(ApiError::Banned);
        }
        if !verify_password(&input.password, &user.password_hash) {
            return Err(ApiError::LoginFailed);
        }

        let (token, expires_at) = issue_access_token(user.id, now_secs(), &self.jwt_secret)
            .map_err(|e| ApiError::Internal(e.into()))?;
        Ok(LoginOutput {
            user,
            token,
            expires_at,
        })
    }
}
