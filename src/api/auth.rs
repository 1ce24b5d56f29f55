// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use super::extract::ApiJson;
use crate::{
    auth::AuthError,
    error::{ApiError, ErrorBody},
    models::{AuthPayload, LoginRequest, RegisterRequest},
    state::AppState,
    storage::{StoredUser, UserRepository},
};

/// Create an account and return a token for it.
///
/// Registration reveals whether an email is taken; login never does.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = AuthPayload),
        (status = 400, description = "Invalid input or email already registered", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthPayload>), ApiError> {
    let request = body.into_inner()?;
    request.validate()?;

    let users = UserRepository::new(&state.db);
    if users.find_by_email(&request.email)?.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let password_hash = state.passwords.hash_async(request.password).await?;
    let user = StoredUser::new(request.name.trim().to_string(), request.email, password_hash);
    // A concurrent registration for the same email loses here with the same 400.
    users.create(&user)?;

    let token = state.tokens.issue(&user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthPayload {
            token,
            user: user.into(),
        }),
    ))
}

/// Exchange email and password for a token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Logged in", body = AuthPayload),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: ApiJson<LoginRequest>,
) -> Result<Json<AuthPayload>, ApiError> {
    let request = body.into_inner()?;
    if request.email.is_empty() || request.password.is_empty() {
        return Err(AuthError::InvalidCredentials.into());
    }

    let user = UserRepository::new(&state.db).find_by_email(&request.email)?;
    // Always run the comparison, against a dummy hash when the email is unknown.
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let valid = state
        .passwords
        .verify_async(request.password, stored_hash)
        .await?;

    let user = match user {
        Some(user) if valid => user,
        _ => {
            tracing::info!("Login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let token = state.tokens.issue(&user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthPayload {
        token,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_state;

    fn ana() -> RegisterRequest {
        RegisterRequest {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password: "secret123".to_string(),
        }
    }

    fn login_as(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let state = test_state();

        let (status, Json(registered)) = register(State(state.clone()), ApiJson::new(ana()))
            .await
            .expect("registration succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(registered.user.name, "Ana");
        assert_eq!(registered.user.email, "ana@x.com");

        let json = serde_json::to_value(&registered).unwrap();
        assert!(json["user"].get("password").is_none());
        assert!(json["user"].get("passwordHash").is_none());

        let t1 = state.tokens.verify(&registered.token).expect("T1 is valid");
        assert_eq!(t1.user_id, registered.user.id);

        let credentials = ApiJson::new(login_as("ana@x.com", "secret123"));
        let Json(logged_in) = login(State(state.clone()), credentials)
            .await
            .expect("login succeeds");
        assert_eq!(logged_in.user, registered.user);
        let t2 = state.tokens.verify(&logged_in.token).expect("T2 is valid");
        assert_eq!(t2.user_id, registered.user.id);
        assert_eq!(t2.email, "ana@x.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_bad_input() {
        let state = test_state();
        register(State(state.clone()), ApiJson::new(ana())).await.unwrap();

        let err = register(State(state.clone()), ApiJson::new(ana())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, ErrorCode::BadUserInput);
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let state = test_state();
        register(State(state.clone()), ApiJson::new(ana())).await.unwrap();

        let upper = RegisterRequest {
            email: "Ana@x.com".to_string(),
            ..ana()
        };
        assert!(register(State(state.clone()), ApiJson::new(upper)).await.is_ok());

        let err = login(State(state), ApiJson::new(login_as("ANA@X.COM", "secret123")))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[tokio::test]
    async fn invalid_registration_writes_nothing() {
        let state = test_state();
        let req = RegisterRequest {
            password: "short".to_string(),
            ..ana()
        };

        let err = register(State(state.clone()), ApiJson::new(req)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadUserInput);
        assert!(UserRepository::new(&state.db)
            .find_by_email("ana@x.com")
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let state = test_state();
        register(State(state.clone()), ApiJson::new(ana())).await.unwrap();

        let unknown = login(State(state.clone()), ApiJson::new(login_as("bob@x.com", "secret123")))
            .await
            .unwrap_err();
        let wrong = login(State(state.clone()), ApiJson::new(login_as("ana@x.com", "wrong-pass")))
            .await
            .unwrap_err();
        let empty = login(State(state), ApiJson::new(login_as("ana@x.com", "")))
            .await
            .unwrap_err();

        for err in [&unknown, &wrong, &empty] {
            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
            assert_eq!(err.code, ErrorCode::Unauthenticated);
            assert_eq!(err.message, unknown.message);
        }
    }
}
