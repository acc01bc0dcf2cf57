//! Admin user management flows: profile editing and role assignment.

use market_api::error::ApiError;
use market_api::usecase::admin_user::{
    SetRolesUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use market_api::usecase::credential::verify_password;
use market_domain::role::Role;

use crate::helpers::{InMemoryUserRepo, create_user, create_user_with_role};

fn roles(values: &[&str]) -> serde_json::Value {
    serde_json::Value::Array(values.iter().map(|v| (*v).into()).collect())
}

#[tokio::test]
async fn admin_edits_seller_profile_end_to_end() {
    let seller = create_user_with_role("12345678", "seller");
    let repo = InMemoryUserRepo::with(vec![seller.clone()]);
    let uc = UpdateProfileUseCase {
        users: repo.clone(),
    };

    let updated = uc
        .execute(
            &seller,
            UpdateProfileInput {
                full_name: Some("Nguyen Van A".into()),
                room: Some("D222".into()),
                phone: Some("123123123123".into()),
                gender: Some("male".into()),
                identity_number: Some("123456789".into()),
                email: Some("email@email".into()),
                password: Some("12345678".into()),
                banned: Some(true),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.full_name, "Nguyen Van A");
    assert_eq!(updated.room.as_deref(), Some("D222"));
    assert_eq!(updated.phone.as_deref(), Some("123123123123"));
    assert_eq!(updated.gender.as_deref(), Some("male"));
    assert_eq!(updated.identity_number.as_deref(), Some("123456789"));
    assert!(updated.banned);
    // Seller keeps their role through a profile edit.
    assert!(updated.seller);
    // The password was hashed, never stored as provided.
    assert_ne!(updated.password_hash, "12345678");
    assert!(verify_password("12345678", &updated.password_hash));
}

#[tokio::test]
async fn invalid_profile_input_returns_both_errors_and_stores_nothing() {
    let seller = create_user_with_role("12345678", "seller");
    let repo = InMemoryUserRepo::with(vec![seller.clone()]);
    let uc = UpdateProfileUseCase {
        users: repo.clone(),
    };

    let result = uc
        .execute(
            &seller,
            UpdateProfileInput {
                identity_number: Some("12345678".into()),
                full_name: Some("".into()),
                ..Default::default()
            },
        )
        .await;

    match result {
        Err(ApiError::Validation(errors)) => {
            assert_eq!(
                errors.0["identity_number"].message_code,
                "error.model.validation_len_failed"
            );
            assert_eq!(
                errors.0["full_name"].message_code,
                "error.model.validation_len_failed"
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let stored = repo.get(seller.id);
    assert_eq!(stored.full_name, seller.full_name);
    assert_eq!(stored.identity_number, seller.identity_number);
}

#[tokio::test]
async fn set_roles_with_empty_array_clears_roles() {
    let seller = create_user_with_role("12345678", "seller");
    let repo = InMemoryUserRepo::with(vec![seller.clone()]);
    let uc = SetRolesUseCase {
        users: repo.clone(),
    };

    let updated = uc.execute(&seller, Some(&roles(&[]))).await.unwrap();
    assert!(!updated.seller);
    assert!(!updated.admin);
}

#[tokio::test]
async fn set_roles_promotes_seller_to_admin() {
    let seller = create_user_with_role("12345678", "seller");
    let repo = InMemoryUserRepo::with(vec![seller.clone()]);
    let uc = SetRolesUseCase {
        users: repo.clone(),
    };

    let updated = uc.execute(&seller, Some(&roles(&["admin"]))).await.unwrap();
    assert!(updated.admin);
    assert!(!updated.seller);
}

#[tokio::test]
async fn set_roles_fails_atomically_for_ineligible_seller_grant() {
    let admin = create_user_with_role("12345678", "admin");
    let repo = InMemoryUserRepo::with(vec![admin.clone()]);
    let uc = SetRolesUseCase {
        users: repo.clone(),
    };

    let result = uc.execute(&admin, Some(&roles(&["seller", "admin"]))).await;
    match result {
        Err(ApiError::RoleNotEligible(role)) => {
            assert_eq!(role, Role::Seller);
            assert_eq!(
                ApiError::RoleNotEligible(role).to_string(),
                "User is not capable of becoming seller"
            );
        }
        other => panic!("expected eligibility error, got {other:?}"),
    }

    let stored = repo.get(admin.id);
    assert!(stored.admin);
    assert!(!stored.seller);
}

#[tokio::test]
async fn set_roles_ignores_unknown_role_names() {
    let admin = create_user_with_role("12345678", "admin");
    let repo = InMemoryUserRepo::with(vec![admin.clone()]);
    let uc = SetRolesUseCase {
        users: repo.clone(),
    };

    let updated = uc
        .execute(&admin, Some(&roles(&["invalid role"])))
        .await
        .unwrap();
    assert!(updated.admin);
    assert!(!updated.seller);
}

#[tokio::test]
async fn set_roles_requires_an_array() {
    let user = create_user("12345678");
    let repo = InMemoryUserRepo::with(vec![user.clone()]);
    let uc = SetRolesUseCase {
        users: repo.clone(),
    };

    let result = uc.execute(&user, None).await;
    match result {
        Err(ApiError::Param(message)) => assert_eq!(message, "Roles must be an array"),
        other => panic!("expected param error, got {other:?}"),
    }
}
