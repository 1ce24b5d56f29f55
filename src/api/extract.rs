// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON request body extractor.
//!
//! [`ApiJson`] never rejects. A body that fails to parse is held as an
//! [`ApiError`] and only surfaces when the handler calls
//! [`ApiJson::into_inner`], which owner-scoped handlers do after the
//! authorization gate. An anonymous caller therefore gets 401 whatever the
//! body looks like, and parse failures use the usual `{error, code}` shape.

use std::convert::Infallible;

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

#[derive(Debug)]
pub struct ApiJson<T>(Result<T, ApiError>);

impl<T> ApiJson<T> {
    /// Wrap an already parsed body.
    pub fn new(value: T) -> Self {
        Self(Ok(value))
    }

    /// The parsed body, or `BAD_USER_INPUT` if it could not be read.
    pub fn into_inner(self) -> Result<T, ApiError> {
        self.0
    }
}

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let parsed = Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| value)
            .map_err(ApiError::from);
        Ok(Self(parsed))
    }
}
