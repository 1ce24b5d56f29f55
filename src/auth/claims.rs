// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the per-request identity context.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried inside a signed token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Subject user ID
    pub user_id: String,
    /// Email at the time the token was minted
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Authenticated user information derived from verified claims.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Canonical user ID
    pub user_id: String,

    /// Email from the token
    pub email: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Identity attached to a single request.
///
/// Either fully authenticated or anonymous; a half-populated identity cannot
/// be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityContext {
    user: Option<AuthenticatedUser>,
}

impl IdentityContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: AuthenticatedUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_use_camel_case_on_the_wire() {
        let claims = TokenClaims {
            user_id: "u1".to_string(),
            email: "ana@x.com".to_string(),
            iat: 1,
            exp: 2,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["email"], "ana@x.com");
    }

    #[test]
    fn context_is_all_or_nothing() {
        let anon = IdentityContext::anonymous();
        assert!(anon.is_anonymous());
        assert!(anon.user().is_none());
        assert_eq!(anon, IdentityContext::default());

        let ctx = IdentityContext::authenticated(AuthenticatedUser {
            user_id: "u1".to_string(),
            email: "ana@x.com".to_string(),
        });
        assert!(!ctx.is_anonymous());
        assert_eq!(ctx.user().map(|u| u.user_id.as_str()), Some("u1"));
        assert_eq!(ctx.user().map(|u| u.email.as_str()), Some("ana@x.com"));
    }
}
