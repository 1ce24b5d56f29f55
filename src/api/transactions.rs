// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints.
//!
//! The request body is fully validated (including `type`) before the
//! repository is called, so a rejected request never touches storage.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::extract::ApiJson;
use crate::{
    auth::Identity,
    error::{ApiError, ErrorBody},
    models::{CreateTransactionRequest, DeleteResponse, UpdateTransactionRequest},
    state::AppState,
    storage::{OwnedRecord, StoredTransaction, TransactionRepository},
};

#[utoipa::path(
    get,
    path = "/v1/transactions",
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Newest first", body = [StoredTransaction]),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn list_transactions(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredTransaction>>, ApiError> {
    let user = identity.require()?;
    Ok(Json(TransactionRepository::new(&state.db).list(&user.user_id)?))
}

/// Record a transaction under one of the caller's categories.
#[utoipa::path(
    post,
    path = "/v1/transactions",
    request_body = CreateTransactionRequest,
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 201, body = StoredTransaction),
        (status = 400, description = "Invalid fields or type", body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    )
)]
pub async fn create_transaction(
    identity: Identity,
    State(state): State<AppState>,
    body: ApiJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<StoredTransaction>), ApiError> {
    let user = identity.require()?;
    let fields = body.into_inner()?.into_new_transaction()?;

    let transaction = TransactionRepository::new(&state.db).create(&user.user_id, fields)?;
    tracing::info!(
        user_id = %user.user_id,
        transaction_id = %transaction.id,
        category_id = %transaction.category_id,
        "Transaction recorded"
    );
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    get,
    path = "/v1/transactions/{transaction_id}",
    params(("transaction_id" = String, Path, description = "Transaction identifier")),
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredTransaction),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_transaction(
    identity: Identity,
    Path(transaction_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StoredTransaction>, ApiError> {
    let user = identity.require()?;
    TransactionRepository::new(&state.db)
        .get(&transaction_id, &user.user_id)?
        .map(Json)
        .ok_or_else(|| StoredTransaction::not_found().into())
}

#[utoipa::path(
    patch,
    path = "/v1/transactions/{transaction_id}",
    params(("transaction_id" = String, Path, description = "Transaction identifier")),
    request_body = UpdateTransactionRequest,
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredTransaction),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, description = "Transaction or category not found", body = ErrorBody)
    )
)]
pub async fn update_transaction(
    identity: Identity,
    Path(transaction_id): Path<String>,
    State(state): State<AppState>,
    body: ApiJson<UpdateTransactionRequest>,
) -> Result<Json<StoredTransaction>, ApiError> {
    let user = identity.require()?;
    let changes = body.into_inner()?.into_changes()?;

    let transaction =
        TransactionRepository::new(&state.db).update(&transaction_id, &user.user_id, changes)?;
    tracing::debug!(
        user_id = %user.user_id,
        transaction_id = %transaction.id,
        "Transaction updated"
    );
    Ok(Json(transaction))
}

#[utoipa::path(
    delete,
    path = "/v1/transactions/{transaction_id}",
    params(("transaction_id" = String, Path, description = "Transaction identifier")),
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 200, body = DeleteResponse),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn delete_transaction(
    identity: Identity,
    Path(transaction_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let user = identity.require()?;

    TransactionRepository::new(&state.db).delete(&transaction_id, &user.user_id)?;
    tracing::info!(
        user_id = %user.user_id,
        transaction_id = %transaction_id,
        "Transaction deleted"
    );
    Ok(Json(DeleteResponse::ok()))
}
