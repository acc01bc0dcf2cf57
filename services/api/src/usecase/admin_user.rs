use uuid::Uuid;

use market_domain::pagination::PageRequest;
use market_domain::role::{Role, RoleFlags, eligible};
use market_domain::validate::{
    FULL_NAME_LEN, IDENTITY_NUMBER_LEN, PASSWORD_LEN, PHONE_LEN, ROOM_LEN, ValidationErrors,
    check_email, check_gender, check_len,
};

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, UserPatch};
use crate::error::ApiError;
use crate::usecase::credential::hash_password;

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<User>, ApiError> {
        self.users.list(page.clamped()).await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::NotFound("user"))
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub room: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub identity_number: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub banned: Option<bool>,
}

pub struct UpdateProfileUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> UpdateProfileUseCase<R> {
    /// Validate every provided field, collecting all failures; persist only
    /// when the whole batch passes.
    pub async fn execute(
        &self,
        target: &User,
        input: UpdateProfileInput,
    ) -> Result<User, ApiError> {
        let mut errors = ValidationErrors::default();
        if let Some(v) = &input.full_name {
            check_len(&mut errors, "full_name", v, FULL_NAME_LEN);
        }
        if let Some(v) = &input.room {
            check_len(&mut errors, "room", v, ROOM_LEN);
        }
        if let Some(v) = &input.phone {
            check_len(&mut errors, "phone", v, PHONE_LEN);
        }
        if let Some(v) = &input.gender {
            check_gender(&mut errors, "gender", v);
        }
        if let Some(v) = &input.identity_number {
            check_len(&mut errors, "identity_number", v, IDENTITY_NUMBER_LEN);
        }
        if let Some(v) = &input.email {
            check_email(&mut errors, "email", v);
        }
        if let Some(v) = &input.password {
            check_len(&mut errors, "password", v, PASSWORD_LEN);
        }
        errors.into_result().map_err(ApiError::Validation)?;

        let password_hash = match &input.password {
            Some(plaintext) => Some(hash_password(plaintext)?),
            None => None,
        };
        let patch = UserPatch {
            full_name: input.full_name,
            room: input.room,
            phone: input.phone,
            gender: input.gender,
            identity_number: input.identity_number,
            email: input.email,
            password_hash,
            banned: input.banned,
        };
        self.users.apply_patch(target.id, &patch).await
    }
}

// ── SetRoles ─────────────────────────────────────────────────────────────────

pub struct SetRolesUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> SetRolesUseCase<R> {
    /// Apply a requested role set to the target.
    ///
    /// - `roles` missing or not an array → parameter error, no mutation.
    /// - Unknown role names are filtered out, not errors.
    /// - An empty array clears every role; a non-empty array with no
    ///   recognized role leaves the target unchanged.
    /// - Any recognized role failing the eligibility table fails the whole
    ///   operation; no partial role change.
    pub async fn execute(
        &self,
        target: &User,
        roles: Option<&serde_json::Value>,
    ) -> Result<User, ApiError> {
        let requested = roles
            .and_then(|v| v.as_array())
            .ok_or(ApiError::Param("Roles must be an array"))?;

        let recognized: Vec<Role> = requested
            .iter()
            .filter_map(|v| v.as_str())
            .filter_map(Role::parse)
            .collect();

        if recognized.is_empty() && !requested.is_empty() {
            return Ok(target.clone());
        }

        let current = target.role_flags();
        for role in &recognized {
            if !eligible(current, *role) {
                return Err(ApiError::RoleNotEligible(*role));
            }
        }

        self.users
            .set_role_flags(target.id, RoleFlags::from_set(&recognized))
            .await
    }
}
