//! Change-password flow and the session-invalidation watermark.

use std::time::{SystemTime, UNIX_EPOCH};

use market_api::error::ApiError;
use market_api::extract::token_is_stale;
use market_api::usecase::auth::{LoginInput, LoginUseCase};
use market_api::usecase::credential::{
    ChangePasswordInput, ChangePasswordUseCase, verify_password,
};
use market_auth_types::token::{issue_access_token, validate_access_token};

use crate::helpers::{InMemoryUserRepo, create_user_with_role};

const SECRET: &str = "test-secret";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[tokio::test]
async fn password_change_invalidates_previously_issued_tokens() {
    let user = create_user_with_role("12345678", "admin");
    let repo = InMemoryUserRepo::with(vec![user.clone()]);

    // Token issued before the change (well past any same-second ambiguity).
    let (old_token, _) = issue_access_token(user.id, now_secs() - 10, SECRET).unwrap();
    let old_info = validate_access_token(&old_token, SECRET).unwrap();
    assert!(!token_is_stale(&old_info, &repo.get(user.id)));

    ChangePasswordUseCase {
        users: repo.clone(),
    }
    .execute(
        &user,
        ChangePasswordInput {
            old_password: "12345678".into(),
            password: "1234567890".into(),
        },
    )
    .await
    .unwrap();

    // The pre-change token now falls below the watermark.
    let stored = repo.get(user.id);
    assert!(token_is_stale(&old_info, &stored));

    // A token issued after the change is accepted again.
    let (new_token, _) = issue_access_token(
        user.id,
        stored.accept_token_after.timestamp() as u64 + 1,
        SECRET,
    )
    .unwrap();
    let new_info = validate_access_token(&new_token, SECRET).unwrap();
    assert!(!token_is_stale(&new_info, &stored));
}

#[tokio::test]
async fn login_works_with_the_new_password_only() {
    let user = create_user_with_role("12345678", "admin");
    let repo = InMemoryUserRepo::with(vec![user.clone()]);

    ChangePasswordUseCase {
        users: repo.clone(),
    }
    .execute(
        &user,
        ChangePasswordInput {
            old_password: "12345678".into(),
            password: "1234567890".into(),
        },
    )
    .await
    .unwrap();

    let login = LoginUseCase {
        users: repo.clone(),
        jwt_secret: SECRET.into(),
    };

    let result = login
        .execute(LoginInput {
            email: user.email.clone(),
            password: "12345678".into(),
        })
        .await;
    assert!(matches!(result, Err(ApiError::LoginFailed)));

    let output = login
        .execute(LoginInput {
            email: user.email.clone(),
            password: "1234567890".into(),
        })
        .await
        .unwrap();
    assert!(verify_password(
        "1234567890",
        &output.user.password_hash
    ));
    let info = validate_access_token(&output.token, SECRET).unwrap();
    assert_eq!(info.user_id, user.id);
}

#[tokio::test]
async fn stale_old_password_is_rejected_with_401_semantics() {
    let user = create_user_with_role("12345678", "admin");
    let repo = InMemoryUserRepo::with(vec![user.clone()]);

    let result = ChangePasswordUseCase {
        users: repo.clone(),
    }
    .execute(
        &user,
        ChangePasswordInput {
            old_password: "123132313123".into(),
            password: "1234567890".into(),
        },
    )
    .await;

    match result {
        Err(ApiError::OldPasswordMismatch) => {
            assert_eq!(
                ApiError::OldPasswordMismatch.status(),
                axum::http::StatusCode::UNAUTHORIZED
            );
        }
        other => panic!("expected old-password mismatch, got {other:?}"),
    }
    // Credential untouched.
    assert!(verify_password("12345678", &repo.get(user.id).password_hash));
}
