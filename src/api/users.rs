// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};

use crate::{
    auth::{AuthError, Identity},
    error::{ApiError, ErrorBody},
    state::AppState,
    storage::{UserRepository, UserResponse},
};

/// Get the profile of the currently authenticated user.
///
/// A valid token whose user no longer exists is treated as unauthenticated.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody),
    )
)]
pub async fn get_current_user(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let caller = identity.require()?;

    let user = UserRepository::new(&state.db)
        .get(&caller.user_id)?
        .ok_or(AuthError::Unauthenticated)?;
    Ok(Json(user.into()))
}
