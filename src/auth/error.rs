// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

/// Authentication error type. Converted to a response through
/// [`ApiError`](crate::error::ApiError).
///
/// Token verification failures never appear here: a bad token simply
/// produces an anonymous context, and the gate then reports
/// [`AuthError::Unauthenticated`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No identity on an operation that requires one
    #[error("Not authenticated")]
    Unauthenticated,
    /// Unknown email or wrong password; deliberately one message for both
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// Password hashing failed
    #[error("password hashing failed: {0}")]
    Hashing(String),
    /// Token could not be signed
    #[error("token signing failed: {0}")]
    TokenSigning(String),
}
