// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request identity extraction and the authorization gate.
//!
//! Every handler takes an [`Identity`], which never rejects a request.
//! Owner-scoped handlers then call [`Identity::require`] before touching
//! storage:
//!
//! ```rust,ignore
//! async fn list_categories(
//!     identity: Identity,
//!     State(state): State<AppState>,
//! ) -> Result<Json<Vec<StoredCategory>>, ApiError> {
//!     let user = identity.require()?;
//!     // user.user_id is now guaranteed present
//! }
//! ```

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthenticatedUser, IdentityContext, TokenService};
use crate::state::AppState;

/// Build the identity context for a request from its headers.
///
/// Only `Authorization: Bearer <token>` is considered. Any other shape, a
/// non-ASCII header, or a token that fails verification yields an anonymous
/// context. The token service is not consulted unless the header is well
/// formed.
pub fn build_context(headers: &HeaderMap, tokens: &TokenService) -> IdentityContext {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty());

    let Some(token) = token else {
        return IdentityContext::anonymous();
    };

    match tokens.verify(token) {
        Some(claims) => IdentityContext::authenticated(AuthenticatedUser::from_claims(claims)),
        None => IdentityContext::anonymous(),
    }
}

/// Authorization gate: the authenticated user, or `Unauthenticated`.
pub fn require_auth(context: &IdentityContext) -> Result<&AuthenticatedUser, AuthError> {
    context.user().ok_or(AuthError::Unauthenticated)
}

/// Extractor for the per-request identity. Never rejects.
#[derive(Debug, Clone)]
pub struct Identity(pub IdentityContext);

impl Identity {
    /// Run the authorization gate on this request's identity.
    pub fn require(&self) -> Result<&AuthenticatedUser, AuthError> {
        require_auth(&self.0)
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Identity(build_context(&parts.headers, &state.tokens)))
    }
}
