// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Category endpoints. Every handler runs the auth gate before any storage
//! access and scopes all queries to the caller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::extract::ApiJson;
use crate::{
    auth::Identity,
    error::{ApiError, ErrorBody},
    models::{CreateCategoryRequest, DeleteResponse, UpdateCategoryRequest},
    state::AppState,
    storage::{CategoryRepository, OwnedRecord, StoredCategory},
};

fn not_found() -> ApiError {
    ApiError::from(StoredCategory::not_found())
}

#[utoipa::path(
    get,
    path = "/v1/categories",
    tag = "Categories",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Newest first", body = [StoredCategory]),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn list_categories(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredCategory>>, ApiError> {
    let user = identity.require()?;
    Ok(Json(CategoryRepository::new(&state.db).list(&user.user_id)?))
}

#[utoipa::path(
    post,
    path = "/v1/categories",
    request_body = CreateCategoryRequest,
    tag = "Categories",
    security(("bearer" = [])),
    responses(
        (status = 201, body = StoredCategory),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn create_category(
    identity: Identity,
    State(state): State<AppState>,
    body: ApiJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<StoredCategory>), ApiError> {
    let user = identity.require()?;
    let fields = body.into_inner()?.into_new_category()?;

    let category = CategoryRepository::new(&state.db).create(&user.user_id, fields)?;
    tracing::info!(user_id = %user.user_id, category_id = %category.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/v1/categories/{category_id}",
    params(("category_id" = String, Path, description = "Category identifier")),
    tag = "Categories",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredCategory),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_category(
    identity: Identity,
    Path(category_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StoredCategory>, ApiError> {
    let user = identity.require()?;
    CategoryRepository::new(&state.db)
        .get(&category_id, &user.user_id)?
        .map(Json)
        .ok_or_else(not_found)
}

#[utoipa::path(
    patch,
    path = "/v1/categories/{category_id}",
    params(("category_id" = String, Path, description = "Category identifier")),
    request_body = UpdateCategoryRequest,
    tag = "Categories",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredCategory),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn update_category(
    identity: Identity,
    Path(category_id): Path<String>,
    State(state): State<AppState>,
    body: ApiJson<UpdateCategoryRequest>,
) -> Result<Json<StoredCategory>, ApiError> {
    let user = identity.require()?;
    let changes = body.into_inner()?.into_changes()?;

    let category =
        CategoryRepository::new(&state.db).update(&category_id, &user.user_id, changes)?;
    tracing::debug!(user_id = %user.user_id, category_id = %category.id, "Category updated");
    Ok(Json(category))
}

/// Delete a category. Refused while any of the caller's transactions use it.
#[utoipa::path(
    delete,
    path = "/v1/categories/{category_id}",
    params(("category_id" = String, Path, description = "Category identifier")),
    tag = "Categories",
    security(("bearer" = [])),
    responses(
        (status = 200, body = DeleteResponse),
        (status = 400, description = "Category still has transactions", body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn delete_category(
    identity: Identity,
    Path(category_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let user = identity.require()?;

    CategoryRepository::new(&state.db).delete(&category_id, &user.user_id)?;
    tracing::info!(user_id = %user.user_id, category_id = %category_id, "Category deleted");
    Ok(Json(DeleteResponse::ok()))
}
